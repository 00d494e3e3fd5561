//! Reasoning Loop
//!
//! Drives the exchange with the provider: send the conversation, run any tools
//! the provider asks for, feed the results back, and stop on a final answer or
//! when the round-trip cap is hit.
//!
//! ```text
//! AwaitingResponse ──(tool_calls)──▶ ExecutingTools ──▶ AwaitingResponse
//!        │                                  │
//!        └──(stop / anything else)──▶ Done ◀──(cap)
//! ```
//!
//! Tools requested on the final allowed round still run; only the follow-up
//! provider call is skipped.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message};
use crate::provider::{Completion, LlmProvider};
use crate::tool::ToolRegistry;

/// Default cap on provider round-trips per request
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Persona system prompt, prepended to every conversation
    pub system_prompt: String,

    /// Maximum provider round-trips before returning what we have
    pub max_iterations: usize,
}

/// Final answer of one exchange
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AgentReply {
    /// Text returned to the caller
    pub content: String,

    /// Provider round-trips performed
    pub iterations: usize,

    /// The cap ended the loop while the provider still wanted tools
    pub truncated: bool,
}

enum LoopState {
    AwaitingResponse,
    ExecutingTools(Completion),
    Done { content: String, truncated: bool },
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Answer `message` given the prior turns of the conversation
    pub async fn chat(&self, history: Vec<Message>, message: &str) -> Result<AgentReply> {
        let mut conversation = Conversation::start(self.config.system_prompt.clone(), history, message);
        self.run(&mut conversation).await
    }

    /// Run the loop on a prepared conversation, appending every turn to it
    pub async fn run(&self, conversation: &mut Conversation) -> Result<AgentReply> {
        let specs = self.tools.schemas();
        let max_iterations = self.config.max_iterations.max(1);
        let mut iterations = 0;
        let mut state = LoopState::AwaitingResponse;

        loop {
            state = match state {
                LoopState::AwaitingResponse => {
                    iterations += 1;
                    tracing::debug!(iteration = iterations, messages = conversation.len(), "Calling provider");

                    let completion = self
                        .provider
                        .chat_completion(conversation.messages(), &specs)
                        .await?;

                    if completion.wants_tools() {
                        LoopState::ExecutingTools(completion)
                    } else {
                        LoopState::Done {
                            content: completion.message.content,
                            truncated: false,
                        }
                    }
                }
                LoopState::ExecutingTools(completion) => {
                    let content = completion.message.content.clone();
                    let calls = completion.message.tool_calls.clone();
                    conversation.push(completion.message);

                    for call in &calls {
                        tracing::debug!(tool = %call.name, id = %call.id, "Executing tool");
                        let result = self.tools.execute(call).await;
                        conversation.push(Message::tool_result(&result));
                    }

                    if iterations >= max_iterations {
                        tracing::warn!(max_iterations, "Iteration cap reached, returning last response");
                        LoopState::Done {
                            content,
                            truncated: true,
                        }
                    } else {
                        LoopState::AwaitingResponse
                    }
                }
                LoopState::Done { content, truncated } => {
                    return Ok(AgentReply {
                        content,
                        iterations,
                        truncated,
                    });
                }
            };
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get the provider
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig {
                system_prompt: String::new(),
                max_iterations: DEFAULT_MAX_ITERATIONS,
            },
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        if self.config.max_iterations == 0 {
            return Err(AgentError::Config("max_iterations must be at least 1".into()));
        }

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}
