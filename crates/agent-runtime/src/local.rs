//! Local LLM Provider
//!
//! Self-hosted OpenAI-compatible servers (Ollama, LM Studio, vLLM, ...). Not
//! every local model supports tool calling, so a request rejected for that
//! reason is retried once without tools.

use agent_core::{
    error::Result,
    message::Message,
    provider::{Completion, LlmProvider, ProviderInfo},
    tool::ToolSchema,
};
use async_trait::async_trait;

use crate::compat::{CompatConfig, OpenAiCompatClient};

/// Ollama's OpenAI-compatible endpoint
pub const LOCAL_DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

/// Local provider
pub struct LocalProvider {
    client: OpenAiCompatClient,
}

impl LocalProvider {
    pub fn new(config: CompatConfig) -> Result<Self> {
        Ok(Self {
            client: OpenAiCompatClient::new(config)?,
        })
    }
}

#[async_trait]
impl LlmProvider for LocalProvider {
    fn info(&self) -> ProviderInfo {
        self.client.info("local")
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.ping().await {
            Ok(ok) => Ok(ok),
            Err(e) => {
                tracing::warn!("Local model server health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn chat_completion(&self, messages: &[Message], tools: &[ToolSchema]) -> Result<Completion> {
        if tools.is_empty() {
            return self.client.chat(messages, None).await;
        }

        match self.client.chat(messages, Some(tools)).await {
            Err(e) if e.signals_tools_unsupported() => {
                tracing::warn!(model = %self.client.model(), error = %e, "Model doesn't support tools, retrying without tools");
                self.client.chat(messages, None).await
            }
            other => other,
        }
    }
}
