//! Wallet Service
//!
//! Backend side of the eCash payment flow. The agent validates a token before
//! a run and redeems it afterwards; both calls land here.
//!
//! - **Dev mode**: every token is accepted, amounts are a best-effort parse
//! - **Production**: tokens are decoded and their proofs summed; received
//!   proofs go to the local [`ProofStore`]. Spent-state is not checked
//!   against the mint.

pub mod store;
pub mod token;

pub use store::{ProofStore, StoredProof};
pub use token::{estimate_amount, Proof, Token, TokenError};

use crate::config::Config;
use crate::models::{BalanceResponse, ReceiveResponse, ValidateResponse};
use crate::payment::TokenBypass;
use std::sync::Arc;
use tracing::{info, warn};

/// Amount reported for bypassed debug tokens
pub const DEBUG_TOKEN_AMOUNT: u64 = 10;
const DEBUG_MINT: &str = "debug";

pub struct Wallet {
    dev_mode: bool,
    mint_url: String,
    store: ProofStore,
    bypass: Arc<dyn TokenBypass>,
}

impl Wallet {
    pub fn new(config: &Config, bypass: Arc<dyn TokenBypass>) -> Self {
        Self::with_parts(
            config.payment.dev_mode,
            config.wallet.mint_url.clone(),
            ProofStore::with_path(&config.wallet.storage_path),
            bypass,
        )
    }

    pub fn with_parts(
        dev_mode: bool,
        mint_url: impl Into<String>,
        store: ProofStore,
        bypass: Arc<dyn TokenBypass>,
    ) -> Self {
        Self {
            dev_mode,
            mint_url: mint_url.into(),
            store,
            bypass,
        }
    }

    /// Validate a token without redeeming it
    pub async fn validate(&self, token: &str) -> ValidateResponse {
        if token.is_empty() {
            return ValidateResponse::invalid("No token provided");
        }

        if self.bypass.admits(token) {
            return ValidateResponse::valid(DEBUG_TOKEN_AMOUNT, DEBUG_MINT);
        }

        if self.dev_mode {
            info!("[Wallet] DEV MODE - accepting token without validation");
            return ValidateResponse::valid(estimate_amount(token), self.mint_url.as_str());
        }

        match Token::deserialize(token).and_then(|t| Ok((t.amount()?, t))) {
            Ok((amount, parsed)) => {
                let mint = parsed.mint().unwrap_or(self.mint_url.as_str());
                ValidateResponse::valid(amount, mint)
            }
            Err(e) => {
                warn!(error = %e, "[Wallet] Validation error");
                ValidateResponse::invalid(e.to_string())
            }
        }
    }

    /// Receive (redeem) a token into the wallet
    pub async fn receive(&self, token: &str) -> ReceiveResponse {
        if token.is_empty() {
            return ReceiveResponse::failure("No token provided");
        }

        if self.bypass.admits(token) {
            return ReceiveResponse::success(DEBUG_TOKEN_AMOUNT);
        }

        if self.dev_mode {
            info!("[Wallet] DEV MODE - simulating token redemption");
            return ReceiveResponse::success(estimate_amount(token));
        }

        match self.store_token(token).await {
            Ok((amount, 0)) if amount > 0 => {
                warn!(amount, "[Wallet] Token already received");
                ReceiveResponse::failure("Token already received")
            }
            Ok((_, added)) => {
                info!(added, "[Wallet] Received {} sats", added);
                ReceiveResponse::success(added)
            }
            Err(e) => {
                warn!(error = %e, "[Wallet] Receive error");
                ReceiveResponse::failure(e.to_string())
            }
        }
    }

    /// Store the token's proofs; returns the token amount and the amount
    /// that was new to the wallet
    async fn store_token(&self, token: &str) -> crate::types::AppResult<(u64, u64)> {
        let parsed = Token::deserialize(token)?;
        let amount = parsed.amount()?;
        let mint = parsed.mint().unwrap_or(self.mint_url.as_str());
        let proofs: Vec<Proof> = parsed.proofs().cloned().collect();

        let added = self.store.add(mint, &proofs).await?;
        Ok((amount, added))
    }

    /// Current wallet balance
    pub async fn balance(&self) -> BalanceResponse {
        if self.dev_mode {
            return BalanceResponse {
                balance: 0,
                mint: None,
                dev_mode: Some(true),
                error: None,
            };
        }

        match self.store.balance().await {
            Ok(balance) => BalanceResponse {
                balance,
                mint: Some(self.mint_url.clone()),
                dev_mode: None,
                error: None,
            },
            Err(e) => {
                warn!(error = %e, "[Wallet] Balance error");
                BalanceResponse {
                    balance: 0,
                    mint: None,
                    dev_mode: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{DebugTokens, NoBypass};
    use crate::wallet::token::tests::sample_token;
    use tempfile::TempDir;

    const MINT: &str = "https://mint.minibits.cash/Bitcoin";

    fn wallet(dev_mode: bool, dir: &TempDir) -> Wallet {
        Wallet::with_parts(dev_mode, MINT, ProofStore::with_path(dir.path()), Arc::new(DebugTokens))
    }

    #[tokio::test]
    async fn test_empty_token_rejected() {
        let dir = TempDir::new().unwrap();
        let wallet = wallet(true, &dir);

        assert_eq!(wallet.validate("").await, ValidateResponse::invalid("No token provided"));
        assert_eq!(wallet.receive("").await, ReceiveResponse::failure("No token provided"));
    }

    #[tokio::test]
    async fn test_debug_tokens_bypass_in_both_modes() {
        let dir = TempDir::new().unwrap();
        for dev_mode in [true, false] {
            let wallet = wallet(dev_mode, &dir);
            assert_eq!(wallet.validate("debug").await, ValidateResponse::valid(10, "debug"));
            assert_eq!(wallet.receive("cashu_debug_42").await, ReceiveResponse::success(10));
        }
    }

    #[tokio::test]
    async fn test_debug_tokens_not_special_without_bypass() {
        let dir = TempDir::new().unwrap();
        let wallet = Wallet::with_parts(false, MINT, ProofStore::with_path(dir.path()), Arc::new(NoBypass));

        let response = wallet.validate("debug").await;
        assert!(!response.valid);
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn test_dev_mode_accepts_unparseable_token() {
        let dir = TempDir::new().unwrap();
        let wallet = wallet(true, &dir);

        assert_eq!(wallet.validate("cashuAbc123").await, ValidateResponse::valid(0, MINT));
        assert_eq!(wallet.receive("cashuAbc123").await, ReceiveResponse::success(0));
    }

    #[tokio::test]
    async fn test_dev_mode_estimates_amount() {
        let dir = TempDir::new().unwrap();
        let wallet = wallet(true, &dir);
        let token = sample_token(&[1, 4, 16]).serialize();

        assert_eq!(wallet.validate(&token).await.amount, Some(21));
        assert_eq!(wallet.receive(&token).await.amount, Some(21));
        // Nothing is stored in dev mode
        assert_eq!(wallet.balance().await.dev_mode, Some(true));
        assert_eq!(wallet.balance().await.balance, 0);
    }

    #[tokio::test]
    async fn test_production_validate() {
        let dir = TempDir::new().unwrap();
        let wallet = wallet(false, &dir);

        let token = sample_token(&[2, 8]).serialize();
        assert_eq!(
            wallet.validate(&token).await,
            ValidateResponse::valid(10, "https://mint.example.com")
        );

        let rejected = wallet.validate("cashuAbc123").await;
        assert!(!rejected.valid);
        assert!(rejected.error.unwrap().contains("base64"));
    }

    #[tokio::test]
    async fn test_production_receive_and_balance() {
        let dir = TempDir::new().unwrap();
        let wallet = wallet(false, &dir);
        let token = sample_token(&[2, 8]).serialize();

        assert_eq!(wallet.receive(&token).await, ReceiveResponse::success(10));
        assert_eq!(
            wallet.balance().await,
            BalanceResponse {
                balance: 10,
                mint: Some(MINT.to_string()),
                dev_mode: None,
                error: None,
            }
        );

        let again = wallet.receive(&token).await;
        assert!(!again.success);
        assert_eq!(again.error.as_deref(), Some("Token already received"));
        assert_eq!(wallet.balance().await.balance, 10);
    }

    #[tokio::test]
    async fn test_production_balance_reports_storage_error() {
        let dir = TempDir::new().unwrap();
        let store = ProofStore::with_path(dir.path());
        tokio::fs::write(store.path(), "{").await.unwrap();
        let wallet = Wallet::with_parts(false, MINT, store, Arc::new(DebugTokens));

        let balance = wallet.balance().await;
        assert_eq!(balance.balance, 0);
        assert!(balance.error.is_some());
    }
}
