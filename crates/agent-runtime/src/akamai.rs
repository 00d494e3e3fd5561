//! Akamai Inference Cloud Provider
//!
//! Secondary hosted backend. Same contract as Gemini; only the endpoint,
//! credential and model differ.

use agent_core::{
    error::Result,
    message::Message,
    provider::{Completion, LlmProvider, ProviderInfo},
    tool::ToolSchema,
};
use async_trait::async_trait;

use crate::compat::{CompatConfig, OpenAiCompatClient};

/// Akamai Inference provider
pub struct AkamaiProvider {
    client: OpenAiCompatClient,
}

impl AkamaiProvider {
    pub fn new(config: CompatConfig) -> Result<Self> {
        Ok(Self {
            client: OpenAiCompatClient::new(config)?,
        })
    }
}

#[async_trait]
impl LlmProvider for AkamaiProvider {
    fn info(&self) -> ProviderInfo {
        self.client.info("akamai")
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.ping().await {
            Ok(ok) => Ok(ok),
            Err(e) => {
                tracing::warn!("Akamai Inference health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn chat_completion(&self, messages: &[Message], tools: &[ToolSchema]) -> Result<Completion> {
        self.client.chat(messages, Some(tools)).await
    }
}
