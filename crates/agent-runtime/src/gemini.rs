//! Gemini LLM Provider
//!
//! Primary hosted backend, reached through Google's OpenAI-compatible endpoint.
//! Tool specs are always sent.

use agent_core::{
    error::Result,
    message::Message,
    provider::{Completion, LlmProvider, ProviderInfo},
    tool::ToolSchema,
};
use async_trait::async_trait;

use crate::compat::{CompatConfig, OpenAiCompatClient};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini provider
pub struct GeminiProvider {
    client: OpenAiCompatClient,
}

impl GeminiProvider {
    pub fn new(config: CompatConfig) -> Result<Self> {
        Ok(Self {
            client: OpenAiCompatClient::new(config)?,
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn info(&self) -> ProviderInfo {
        self.client.info("gemini")
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.ping().await {
            Ok(ok) => Ok(ok),
            Err(e) => {
                tracing::warn!("Gemini health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn chat_completion(&self, messages: &[Message], tools: &[ToolSchema]) -> Result<Completion> {
        self.client.chat(messages, Some(tools)).await
    }
}
