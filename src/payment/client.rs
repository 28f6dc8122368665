// HTTP client for the wallet service (/api/wallet/*)

use super::PaymentBackend;
use crate::config::WalletConfig;
use crate::models::{BalanceResponse, ReceiveResponse, TokenRequest, ValidateResponse};
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub struct WalletClient {
    client: Client,
    base_url: String,
}

impl WalletClient {
    pub fn new(config: &WalletConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build wallet client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.service_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/wallet/{}", self.base_url, path)
    }

    async fn post_token<T: DeserializeOwned>(&self, path: &str, token: &str) -> AppResult<T> {
        let url = self.url(path);
        debug!(url = %url, "Calling wallet service");

        let response = self
            .client
            .post(&url)
            .json(&TokenRequest { token: token.to_string() })
            .send()
            .await
            .map_err(|e| AppError::Wallet(format!("Request to {} failed: {}", url, e)))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Wallet(format!("Wallet service returned {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Wallet(format!("Failed to parse wallet response: {}", e)))
    }

    pub async fn balance(&self) -> AppResult<BalanceResponse> {
        let url = self.url("balance");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Wallet(format!("Request to {} failed: {}", url, e)))?;

        Self::decode(response).await
    }
}

#[async_trait]
impl PaymentBackend for WalletClient {
    async fn validate(&self, token: &str) -> AppResult<ValidateResponse> {
        self.post_token("validate", token).await
    }

    async fn receive(&self, token: &str) -> AppResult<ReceiveResponse> {
        self.post_token("receive", token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(url: &str) -> WalletClient {
        WalletClient::new(&WalletConfig {
            service_url: format!("{}/", url),
            mint_url: "https://mint.example.com".to_string(),
            storage_path: "unused".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_validate_posts_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/wallet/validate")
            .match_body(Matcher::Json(serde_json::json!({"token": "cashuAxyz"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"valid":true,"amount":21,"mint":"https://mint.example.com","error":null}"#)
            .create_async()
            .await;

        let response = client_for(&server.url()).validate("cashuAxyz").await.unwrap();

        assert_eq!(response, ValidateResponse::valid(21, "https://mint.example.com"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_receive_failure_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/wallet/receive")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":false,"amount":null,"error":"Token already spent"}"#)
            .create_async()
            .await;

        let response = client_for(&server.url()).receive("cashuAxyz").await.unwrap();

        assert_eq!(response, ReceiveResponse::failure("Token already spent"));
    }

    #[tokio::test]
    async fn test_server_error_is_wallet_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/wallet/validate")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = client_for(&server.url()).validate("cashuAxyz").await.unwrap_err();

        assert!(matches!(err, AppError::Wallet(ref msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_balance() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/wallet/balance")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"balance":0,"dev_mode":true}"#)
            .create_async()
            .await;

        let balance = client_for(&server.url()).balance().await.unwrap();

        assert_eq!(balance.balance, 0);
        assert_eq!(balance.dev_mode, Some(true));
    }
}
