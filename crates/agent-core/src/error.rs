//! Error Types

use std::time::Duration;

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Provider rejected the request or returned an error payload
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unreachable (connection refused, DNS, etc.)
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Provider did not answer within the configured timeout
    #[error("Provider timed out after {0:?}")]
    Timeout(Duration),

    /// Tool validation failed
    #[error("Tool validation error: {0}")]
    ToolValidation(String),

    /// Provider response could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required configuration for the selected provider is absent
    #[error("Missing configuration for {provider} provider: {}", .fields.join(", "))]
    MissingConfig {
        provider: String,
        fields: Vec<String>,
    },

    /// Rate limited or out of quota
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl AgentError {
    /// Whether this error came from talking to the provider
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            AgentError::Provider(_)
                | AgentError::ProviderUnavailable(_)
                | AgentError::Timeout(_)
                | AgentError::RateLimited(_)
                | AgentError::Auth(_)
                | AgentError::Parse(_)
        )
    }

    /// Whether the provider rejected the request because it cannot do tool calling.
    ///
    /// Only explicit rejections count; transport failures never match.
    pub fn signals_tools_unsupported(&self) -> bool {
        match self {
            AgentError::Provider(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("tool") || msg.contains("function")
            }
            _ => false,
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AgentError::ProviderUnavailable(_) | AgentError::Timeout(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            AgentError::RateLimited(_) => "You've made too many requests. Please wait a moment.".into(),
            AgentError::Auth(_) => "The AI service rejected our credentials.".into(),
            AgentError::Config(_) | AgentError::MissingConfig { .. } => {
                "The assistant is not configured correctly.".into()
            }
            _ => "I'm sorry, I encountered an error processing your request.".into(),
        }
    }

    /// Raw error text, but only for quota/rate failures the caller should see
    pub fn exposed_details(&self) -> Option<String> {
        let text = self.to_string();
        if text.contains("429") || text.to_lowercase().contains("quota") {
            Some(text)
        } else {
            None
        }
    }
}
