//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/` and `/health` - Status checks
//! - `/api/wallet` - eCash wallet service (validate, receive, balance)
//! - `/api/seminar/runs` - Run the payment-gated seminar agent

pub mod health;
pub mod seminar;
pub mod wallet;

use axum::Router;
use crate::models::AppState;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    // The agent host calls the wallet service from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health::router())
        .merge(wallet::router())
        .merge(seminar::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
