//! Payment Gate
//!
//! First node of the seminar graph. Decides whether the run may proceed and,
//! when a real token was presented, hands it on for settlement.

use crate::models::{PaymentClaim, ValidationVerdict};
use crate::payment::{PaymentBackend, TokenBypass};
use std::sync::Arc;
use tracing::{info, warn};

pub struct PaymentGate {
    backend: Arc<dyn PaymentBackend>,
    bypass: Arc<dyn TokenBypass>,
}

impl PaymentGate {
    pub fn new(backend: Arc<dyn PaymentBackend>, bypass: Arc<dyn TokenBypass>) -> Self {
        Self { backend, bypass }
    }

    /// Validate the token WITHOUT redeeming it
    pub async fn validate(&self, claim: Option<&PaymentClaim>) -> ValidationVerdict {
        let claim = match claim.filter(|c| !c.ecash_token.is_empty()) {
            Some(claim) => claim,
            None => {
                info!("[Payment] No payment token provided, skipping validation (free mode)");
                return ValidationVerdict::accepted(None);
            }
        };

        if self.bypass.admits(&claim.ecash_token) {
            info!("[Payment] DEBUG MODE - accepting fake token for testing");
            return ValidationVerdict::accepted(None);
        }

        info!(amount_sats = claim.amount_sats, "[Payment] Validating token");

        match self.backend.validate(&claim.ecash_token).await {
            Ok(response) if response.valid => {
                info!(amount = ?response.amount, mint = ?response.mint, "[Payment] Token accepted");
                ValidationVerdict::accepted(Some(claim.ecash_token.clone()))
            }
            Ok(response) => {
                let reason = response
                    .error
                    .unwrap_or_else(|| "Payment token rejected".to_string());
                warn!(reason = %reason, "[Payment] Token rejected");
                ValidationVerdict::rejected(reason)
            }
            Err(e) => {
                warn!(error = %e, "[Payment] Validation error");
                ValidationVerdict::rejected(e.to_string())
            }
        }
    }
}
