//! Cashu token codec
//!
//! Decodes serialized V3 tokens (`cashuA` + URL-safe base64 JSON) into their
//! proofs so that the wallet can report amounts and store what it receives.
//! Proof signatures are carried, never verified.

use base64::{engine::general_purpose::URL_SAFE, engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

const V3_PREFIX: &str = "cashuA";
const V4_PREFIX: &str = "cashuB";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,

    #[error("not a cashu token")]
    MissingPrefix,

    #[error("unsupported token version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid base64 payload: {0}")]
    Base64(String),

    #[error("invalid token payload: {0}")]
    Json(String),

    #[error("token contains no proofs")]
    NoProofs,

    #[error("token amount overflows")]
    AmountOverflow,
}

/// A single ecash note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub amount: u64,
    /// Keyset id
    #[serde(default)]
    pub id: String,
    pub secret: String,
    #[serde(rename = "C")]
    pub c: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint: Option<String>,
    pub proofs: Vec<Proof>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub token: Vec<TokenEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl Token {
    /// Parse a serialized token string
    pub fn deserialize(raw: &str) -> Result<Self, TokenError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TokenError::Empty);
        }
        if raw.starts_with(V4_PREFIX) {
            return Err(TokenError::UnsupportedVersion("cashuB".to_string()));
        }
        let payload = raw.strip_prefix(V3_PREFIX).ok_or(TokenError::MissingPrefix)?;

        // Accept padded and standard-alphabet encodings produced by older wallets
        let normalized: String = payload
            .trim_end_matches('=')
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                other => other,
            })
            .collect();

        let bytes = URL_SAFE_NO_PAD
            .decode(normalized.as_bytes())
            .map_err(|e| TokenError::Base64(e.to_string()))?;

        let token: Token =
            serde_json::from_slice(&bytes).map_err(|e| TokenError::Json(e.to_string()))?;

        if token.proofs().next().is_none() {
            return Err(TokenError::NoProofs);
        }
        Ok(token)
    }

    /// Serialize as a V3 token string
    pub fn serialize(&self) -> String {
        // Serializing plain structs into a Vec cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        format!("{}{}", V3_PREFIX, URL_SAFE.encode(json))
    }

    pub fn proofs(&self) -> impl Iterator<Item = &Proof> {
        self.token.iter().flat_map(|entry| entry.proofs.iter())
    }

    /// Sum of all proof amounts
    pub fn amount(&self) -> Result<u64, TokenError> {
        self.proofs()
            .try_fold(0u64, |acc, p| acc.checked_add(p.amount))
            .ok_or(TokenError::AmountOverflow)
    }

    /// Mint of the first entry that names one
    pub fn mint(&self) -> Option<&str> {
        self.token.iter().find_map(|entry| entry.mint.as_deref())
    }
}

/// Best-effort amount of a serialized token, 0 when it cannot be parsed
pub fn estimate_amount(raw: &str) -> u64 {
    Token::deserialize(raw)
        .and_then(|token| token.amount())
        .unwrap_or(0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_token(amounts: &[u64]) -> Token {
        Token {
            token: vec![TokenEntry {
                mint: Some("https://mint.example.com".to_string()),
                proofs: amounts
                    .iter()
                    .enumerate()
                    .map(|(i, amount)| Proof {
                        amount: *amount,
                        id: "009a1f293253e41e".to_string(),
                        secret: format!("secret-{}", i),
                        c: "02bc9097997d81afb2cc7346b5e4345a9346bd2a506eb7958598a72f0cf85163ea".to_string(),
                    })
                    .collect(),
            }],
            unit: Some("sat".to_string()),
            memo: None,
        }
    }

    #[test]
    fn test_decode_v3_token() {
        let encoded = sample_token(&[2, 8]).serialize();
        assert!(encoded.starts_with("cashuA"));

        let token = Token::deserialize(&encoded).unwrap();
        assert_eq!(token.amount().unwrap(), 10);
        assert_eq!(token.mint(), Some("https://mint.example.com"));
        assert_eq!(token.unit.as_deref(), Some("sat"));
    }

    #[test]
    fn test_decode_unpadded_and_standard_alphabet() {
        let json = serde_json::to_vec(&sample_token(&[1, 4, 16])).unwrap();

        let unpadded = format!("cashuA{}", URL_SAFE_NO_PAD.encode(&json));
        assert_eq!(estimate_amount(&unpadded), 21);

        let standard = format!(
            "cashuA{}",
            base64::engine::general_purpose::STANDARD.encode(&json)
        );
        assert_eq!(estimate_amount(&standard), 21);
    }

    #[test]
    fn test_estimate_falls_back_to_zero() {
        assert_eq!(estimate_amount(""), 0);
        assert_eq!(estimate_amount("cashuAbc123"), 0);
        assert_eq!(estimate_amount("not a token"), 0);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(Token::deserialize("   "), Err(TokenError::Empty));
        assert_eq!(Token::deserialize("hello"), Err(TokenError::MissingPrefix));
        assert!(matches!(
            Token::deserialize("cashuBo2FteBtodHRwczovL21pbnQ"),
            Err(TokenError::UnsupportedVersion(_))
        ));
        assert!(matches!(Token::deserialize("cashuA!!!"), Err(TokenError::Base64(_))));

        let not_json = format!("cashuA{}", URL_SAFE.encode(b"plain text"));
        assert!(matches!(Token::deserialize(&not_json), Err(TokenError::Json(_))));

        let empty = format!("cashuA{}", URL_SAFE.encode(br#"{"token":[{"proofs":[]}]}"#));
        assert_eq!(Token::deserialize(&empty), Err(TokenError::NoProofs));
    }

    #[test]
    fn test_amount_overflow() {
        let token = sample_token(&[u64::MAX, 1]);
        assert_eq!(token.amount(), Err(TokenError::AmountOverflow));
    }
}
