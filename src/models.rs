use std::sync::Arc;

use crate::seminar::SeminarGraph;
use crate::wallet::Wallet;

#[derive(Clone)]
pub struct AppState {
    pub wallet: Arc<Wallet>,
    pub graph: Arc<SeminarGraph>,
}

// Core models shared with the frontend and the agent pipeline

/// One turn of the conversation.
///
/// Serialized with a `type` tag (`system`, `human`, `ai`); the chat-style
/// role names `user` and `assistant` are accepted on input.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConversationMessage {
    System { content: String },
    #[serde(alias = "user")]
    Human { content: String },
    #[serde(rename = "ai", alias = "assistant")]
    Agent { content: String },
}

impl ConversationMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ConversationMessage::System { content: content.into() }
    }

    pub fn human(content: impl Into<String>) -> Self {
        ConversationMessage::Human { content: content.into() }
    }

    pub fn agent(content: impl Into<String>) -> Self {
        ConversationMessage::Agent { content: content.into() }
    }

    pub fn content(&self) -> &str {
        match self {
            ConversationMessage::System { content }
            | ConversationMessage::Human { content }
            | ConversationMessage::Agent { content } => content,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, ConversationMessage::System { .. })
    }

    pub fn is_human(&self) -> bool {
        matches!(self, ConversationMessage::Human { .. })
    }

    pub fn to_llm_message(&self) -> crate::types::LLMMessage {
        use crate::types::LLMMessage;
        match self {
            ConversationMessage::System { content } => LLMMessage::system(content.as_str()),
            ConversationMessage::Human { content } => LLMMessage::user(content.as_str()),
            ConversationMessage::Agent { content } => LLMMessage::assistant(content.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Text,
    Code,
    Socratic,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Text => write!(f, "text"),
            ArtifactKind::Code => write!(f, "code"),
            ArtifactKind::Socratic => write!(f, "socratic"),
        }
    }
}

/// A single version of an artifact
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArtifactVersion {
    #[serde(default)]
    pub index: usize,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
}

/// Artifact with version history
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Artifact {
    pub id: String,
    pub project_id: String,
    // Signed: clients may send -1 when no version is selected
    #[serde(default)]
    pub current_index: Option<i64>,
    #[serde(default)]
    pub contents: Vec<ArtifactVersion>,
}

impl Artifact {
    /// The version selected by `current_index`, if the index is in bounds
    pub fn current_version(&self) -> Option<&ArtifactVersion> {
        let index = usize::try_from(self.current_index?).ok()?;
        self.contents.get(index)
    }
}

/// Payment information from the client
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PaymentClaim {
    #[serde(default)]
    pub ecash_token: String,
    #[serde(default)]
    pub amount_sats: u64,
}

impl PaymentClaim {
    pub fn new(ecash_token: impl Into<String>, amount_sats: u64) -> Self {
        Self {
            ecash_token: ecash_token.into(),
            amount_sats,
        }
    }
}

/// Outcome of the payment gate
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationVerdict {
    pub valid: bool,
    /// Token to redeem once the conversation turn succeeds
    pub token: Option<String>,
    pub refund: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationVerdict {
    pub fn accepted(token: Option<String>) -> Self {
        Self {
            valid: true,
            token,
            refund: false,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            token: None,
            refund: false,
            reason: Some(reason.into()),
        }
    }
}

/// State threaded through one run of the seminar graph
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SeminarState {
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,

    // Payment bookkeeping
    #[serde(default)]
    pub payment: Option<PaymentClaim>,
    #[serde(default)]
    pub payment_validated: bool,
    #[serde(default)]
    pub payment_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeemed_amount: Option<u64>,

    // Artifact context
    #[serde(default)]
    pub artifact: Option<Artifact>,
    #[serde(default)]
    pub highlighted_text: Option<String>,

    #[serde(default)]
    pub refund: bool,
}

impl SeminarState {
    pub fn new(messages: Vec<ConversationMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_payment(mut self, claim: PaymentClaim) -> Self {
        self.payment = Some(claim);
        self
    }

    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifact = Some(artifact);
        self
    }
}

// API Request/Response types

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub mint: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ValidateResponse {
    pub fn valid(amount: u64, mint: impl Into<String>) -> Self {
        Self {
            valid: true,
            amount: Some(amount),
            mint: Some(mint.into()),
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            amount: None,
            mint: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReceiveResponse {
    pub success: bool,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ReceiveResponse {
    pub fn success(amount: u64) -> Self {
        Self {
            success: true,
            amount: Some(amount),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            amount: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BalanceResponse {
    pub balance: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}
