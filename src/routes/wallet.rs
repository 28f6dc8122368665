//! Wallet API Routes
//!
//! - POST /api/wallet/validate - Check a token without redeeming it
//! - POST /api/wallet/receive - Redeem a token into the wallet
//! - GET /api/wallet/balance - Current wallet balance
//!
//! Called by the seminar agent, not by the frontend directly.

use axum::{
    Router,
    routing::{get, post},
    Json,
    extract::State,
};
use crate::models::{AppState, BalanceResponse, ReceiveResponse, TokenRequest, ValidateResponse};
use tracing::info;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/wallet/validate", post(validate_token))
        .route("/api/wallet/receive", post(receive_token))
        .route("/api/wallet/balance", get(get_balance))
}

async fn validate_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Json<ValidateResponse> {
    info!(token_len = request.token.len(), "Wallet validate request");
    Json(state.wallet.validate(&request.token).await)
}

async fn receive_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Json<ReceiveResponse> {
    info!(token_len = request.token.len(), "Wallet receive request");
    Json(state.wallet.receive(&request.token).await)
}

async fn get_balance(State(state): State<AppState>) -> Json<BalanceResponse> {
    Json(state.wallet.balance().await)
}
