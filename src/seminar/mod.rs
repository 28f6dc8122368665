//! Seminar Agent
//!
//! The payment-gated conversation graph:
//!
//! ```text
//!   Run state
//!      │
//!      ▼
//! ┌──────────────────┐   invalid
//! │ validate_payment │ ──────────────► end
//! └──────────────────┘
//!      │ valid
//!      ▼
//! ┌──────────────────┐
//! │      agent       │  → one model reply
//! └──────────────────┘
//!      │
//!      ▼
//! ┌──────────────────┐
//! │  redeem_payment  │
//! └──────────────────┘
//!      │
//!      ▼
//!     end
//! ```
//!
//! State is threaded through the nodes and returned to the caller; nothing
//! is persisted.

pub mod gate;
pub mod settlement;
pub mod turn;

pub use gate::PaymentGate;
pub use settlement::{PaymentSettlement, SettlementOutcome};
pub use turn::{ConversationTurn, SYSTEM_PROMPT};

use crate::config::Config;
use crate::models::SeminarState;
use crate::types::AppResult;
use tracing::info;

/// Where the graph goes after the payment gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Agent,
    End,
}

pub fn route_after_validation(state: &SeminarState) -> Route {
    if state.payment_validated {
        Route::Agent
    } else {
        Route::End
    }
}

pub struct SeminarGraph {
    gate: PaymentGate,
    turn: ConversationTurn,
    settlement: PaymentSettlement,
}

impl SeminarGraph {
    pub fn new(gate: PaymentGate, turn: ConversationTurn, settlement: PaymentSettlement) -> Self {
        Self {
            gate,
            turn,
            settlement,
        }
    }

    /// Wire the graph from configuration: simulated payments in dev mode,
    /// the wallet service otherwise.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let backend = crate::payment::backend_for(config)?;
        let bypass = crate::payment::bypass_for(&config.payment);
        let llm = crate::llm::create_adapter(&config.llm);

        Ok(Self::new(
            PaymentGate::new(backend.clone(), bypass),
            ConversationTurn::from_config(llm, &config.llm),
            PaymentSettlement::new(backend),
        ))
    }

    /// Run the graph to completion
    pub async fn invoke(&self, mut state: SeminarState) -> AppResult<SeminarState> {
        let run_id = state
            .run_id
            .get_or_insert_with(|| uuid::Uuid::new_v4().to_string())
            .clone();
        info!(run_id = %run_id, messages = state.messages.len(), "Starting seminar run");

        let verdict = self.gate.validate(state.payment.as_ref()).await;
        state.payment_validated = verdict.valid;
        state.payment_token = verdict.token;
        state.payment_error = verdict.reason;
        state.refund = verdict.refund;

        if route_after_validation(&state) == Route::End {
            info!(run_id = %run_id, "[Payment] Validation failed, ending run");
            return Ok(state);
        }

        let reply = self
            .turn
            .respond(&state.messages, state.artifact.as_ref())
            .await?;
        state.messages.push(reply);

        let outcome = self.settlement.settle(&mut state.payment_token).await;
        state.redeemed_amount = outcome.redeemed_amount();

        info!(run_id = %run_id, outcome = ?outcome, "Seminar run complete");
        Ok(state)
    }
}
