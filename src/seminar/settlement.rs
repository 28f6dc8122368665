//! Payment Settlement
//!
//! Last node of the seminar graph: redeems the token the gate accepted.

use crate::payment::PaymentBackend;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SettlementOutcome {
    /// No token was pending
    NothingToRedeem,
    Redeemed { amount: Option<u64> },
    Failed { error: String },
}

impl SettlementOutcome {
    pub fn redeemed_amount(&self) -> Option<u64> {
        match self {
            SettlementOutcome::Redeemed { amount } => *amount,
            _ => None,
        }
    }
}

pub struct PaymentSettlement {
    backend: Arc<dyn PaymentBackend>,
}

impl PaymentSettlement {
    pub fn new(backend: Arc<dyn PaymentBackend>) -> Self {
        Self { backend }
    }

    /// Redeem the pending token, if any.
    ///
    /// The handle is taken out of `pending` whatever the outcome, so a second
    /// call is a no-op.
    pub async fn settle(&self, pending: &mut Option<String>) -> SettlementOutcome {
        let Some(token) = pending.take() else {
            info!("[Payment] No token to redeem");
            return SettlementOutcome::NothingToRedeem;
        };

        info!("[Payment] Redeeming token...");

        match self.backend.receive(&token).await {
            Ok(response) if response.success => {
                info!(amount = ?response.amount, "[Payment] Token redeemed");
                SettlementOutcome::Redeemed { amount: response.amount }
            }
            Ok(response) => {
                let error = response
                    .error
                    .unwrap_or_else(|| "Redemption rejected".to_string());
                warn!(error = %error, "[Payment] Redemption failed");
                SettlementOutcome::Failed { error }
            }
            Err(e) => {
                warn!(error = %e, "[Payment] Redemption error");
                SettlementOutcome::Failed { error: e.to_string() }
            }
        }
    }
}
