//! # agent-runtime
//!
//! Runtime providers for the persona agent.
//!
//! ## Providers
//!
//! - **Gemini** (default): Google's hosted models via the OpenAI-compatible endpoint
//! - **Local**: any self-hosted OpenAI-compatible server (Ollama, LM Studio, vLLM)
//! - **Akamai**: Akamai Inference Cloud
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{ProviderSettings, select_provider};
//!
//! let provider = select_provider(&ProviderSettings::from_env()?)?;
//! let agent = AgentBuilder::new()
//!     .provider(provider)
//!     .build()?;
//! ```

pub mod akamai;
pub mod compat;
pub mod gemini;
pub mod local;
pub mod selector;

pub use akamai::AkamaiProvider;
pub use compat::{CompatConfig, OpenAiCompatClient};
pub use gemini::GeminiProvider;
pub use local::LocalProvider;
pub use selector::{ProviderKind, ProviderSettings, select_provider};

// Re-export core types for convenience
pub use agent_core::{Agent, AgentError, LlmProvider, Message, Result, Role, Tool, ToolRegistry};
