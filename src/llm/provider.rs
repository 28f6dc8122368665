use async_trait::async_trait;
use std::sync::Arc;
use crate::config::LLMConfig;
use crate::types::{LLMRequest, LLMResponse, AppResult};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Build the adapter for the configured endpoint.
///
/// Every supported backend (Ollama, vLLM, OpenAI itself) speaks the
/// OpenAI chat-completions dialect, so the base URL is the only switch.
pub fn create_adapter(config: &LLMConfig) -> Arc<dyn LLMAdapter> {
    Arc::new(crate::llm::openai::OpenAICompatibleAdapter::new(
        &config.api_base,
        &config.api_key,
    ))
}
