//! Conversation Turn
//!
//! Builds the prompt for one Socratic dialogue turn and asks the model for a
//! single reply. No retries, no streaming.

use crate::config::LLMConfig;
use crate::llm::LLMAdapter;
use crate::models::{Artifact, ArtifactVersion, ConversationMessage};
use crate::types::{AppResult, LLMRequest};
use std::sync::Arc;
use tracing::{debug, info};

pub const SYSTEM_PROMPT: &str = r#"You are a Socratic dialogue assistant. Your role is to:

1. Help users develop and refine their arguments through thoughtful questioning
2. Assist with writing and editing documents, especially structured arguments
3. Help create and modify artifacts (documents, code, structured seminars)

When helping with Socratic Seminar documents, follow the structure:
- Thesis: A clear, arguable statement
- Supporting Clauses: Arguments with definitions, citations, and narratives
- Refutations: Counter-arguments addressed honestly
- Replies: Responses that strengthen the original argument

Be helpful, thoughtful, and encourage critical thinking."#;

pub struct ConversationTurn {
    llm: Arc<dyn LLMAdapter>,
    model: String,
    temperature: f32,
}

impl ConversationTurn {
    pub fn new(llm: Arc<dyn LLMAdapter>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature,
        }
    }

    pub fn from_config(llm: Arc<dyn LLMAdapter>, config: &LLMConfig) -> Self {
        Self::new(llm, config.model.clone(), config.temperature)
    }

    /// Produce the agent's reply to the conversation so far
    pub async fn respond(
        &self,
        messages: &[ConversationMessage],
        artifact: Option<&Artifact>,
    ) -> AppResult<ConversationMessage> {
        let prompt = prepare_messages(messages, artifact);
        debug!(prompt_messages = prompt.len(), "Prepared seminar prompt");

        let request = LLMRequest {
            model: self.model.clone(),
            messages: prompt.iter().map(ConversationMessage::to_llm_message).collect(),
            max_tokens: None,
            temperature: Some(self.temperature),
        };

        let response = self.llm.create_chat_completion(&request).await?;
        info!(
            response_len = response.content.len(),
            total_tokens = response.usage.total_tokens,
            "Model replied"
        );

        Ok(ConversationMessage::agent(response.content))
    }
}

/// Assemble the message sequence sent to the model.
///
/// The system prompt is prepended unless the conversation already opens with
/// a system message. The current artifact version, when resolvable, is
/// appended to the last message if that message came from the human.
pub fn prepare_messages(
    messages: &[ConversationMessage],
    artifact: Option<&Artifact>,
) -> Vec<ConversationMessage> {
    let mut prompt = Vec::with_capacity(messages.len() + 1);
    if !messages.first().is_some_and(ConversationMessage::is_system) {
        prompt.push(ConversationMessage::system(SYSTEM_PROMPT));
    }
    prompt.extend(messages.iter().cloned());

    if let Some(version) = artifact.and_then(Artifact::current_version) {
        if let Some(ConversationMessage::Human { content }) = prompt.last_mut() {
            content.push_str(&artifact_context(version));
        }
    }

    prompt
}

/// Text block describing an artifact version
pub fn artifact_context(version: &ArtifactVersion) -> String {
    format!(
        "\n\nCurrent artifact ({}):\nTitle: {}\n\n{}",
        version.kind, version.title, version.content
    )
}
