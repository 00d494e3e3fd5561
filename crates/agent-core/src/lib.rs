//! # agent-core
//!
//! Provider-agnostic chat orchestration with a fixed tool registry.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  Reasoning  │  │    Tools    │  │   LlmProvider       │  │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Gemini, a local
//! OpenAI-compatible server, or Akamai Inference without changing agent logic.

pub mod provider;
pub mod tool;
pub mod reasoning;
pub mod message;
pub mod error;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::{Completion, FinishReason, LlmProvider, ProviderInfo};
pub use reasoning::{Agent, AgentBuilder, AgentConfig, AgentReply};
pub use tool::{Tool, ToolArguments, ToolCall, ToolResult, ToolRegistry, ToolSchema};
