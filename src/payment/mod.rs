// Payment plumbing for the seminar agent (Cashu eCash)
//
// The agent never touches proofs itself: it asks a PaymentBackend to
// validate a token before the run and to receive it afterwards.

pub mod bypass;
pub mod client;
pub mod simulated;

pub use bypass::*;
pub use client::WalletClient;
pub use simulated::SimulatedPayments;

use crate::config::Config;
use crate::models::{ReceiveResponse, ValidateResponse};
use crate::types::AppResult;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait PaymentBackend: Send + Sync {
    /// Check a token without redeeming it
    async fn validate(&self, token: &str) -> AppResult<ValidateResponse>;

    /// Redeem a previously validated token
    async fn receive(&self, token: &str) -> AppResult<ReceiveResponse>;
}

/// Dev mode simulates payments locally; otherwise the wallet service is called.
pub fn backend_for(config: &Config) -> AppResult<Arc<dyn PaymentBackend>> {
    if config.payment.dev_mode {
        Ok(Arc::new(SimulatedPayments::new(&config.wallet.mint_url)))
    } else {
        Ok(Arc::new(WalletClient::new(&config.wallet)?))
    }
}
