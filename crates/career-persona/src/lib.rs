//! # career-persona
//!
//! Everything that makes the agent *someone*: the persona it speaks as, the
//! tools it uses to capture leads and unanswered questions, and the push
//! channel those tools report through.
//!
//! ```text
//! ┌──────────────┐  system prompt  ┌──────────────┐
//! │   Persona    │────────────────▶│    Agent     │
//! └──────────────┘                 └──────┬───────┘
//!                                         │ tool calls
//!                      ┌──────────────────┴──────────────────┐
//!                      ▼                                     ▼
//!           record_user_details                 record_unknown_question
//!                      └──────────────┬──────────────────────┘
//!                                     ▼
//!                              Notifier (ntfy.sh)
//! ```

pub mod error;
pub mod notify;
pub mod persona;
pub mod svckit;

use std::sync::Arc;

use agent_core::ToolRegistry;

pub use error::{PersonaError, Result};
pub use notify::{Notifier, NotifyConfig, build_notifier};
pub use persona::Persona;

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{RecordUnknownQuestionTool, RecordUserDetailsTool};
}

/// Registry holding the persona tools, in the order they are advertised
pub fn persona_tools(notifier: &Arc<dyn Notifier>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(tools::RecordUserDetailsTool::new(Arc::clone(notifier)));
    registry.register(tools::RecordUnknownQuestionTool::new(Arc::clone(notifier)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use agent_core::{
        AgentBuilder, Completion, FinishReason, LlmProvider, Message, ProviderInfo, Role, ToolCall,
        ToolSchema,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Asks for a contact to be recorded, then answers
    struct LeadProvider {
        replies: Mutex<VecDeque<Completion>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl LeadProvider {
        fn new() -> Self {
            let mut args = agent_core::ToolArguments::new();
            args.insert("email".into(), json!("grace@example.com"));
            args.insert("name".into(), json!("Grace"));
            let request = Completion {
                message: Message::assistant_tool_calls(
                    "",
                    vec![ToolCall::new("call_1", "record_user_details", args)],
                ),
                finish_reason: FinishReason::ToolCalls,
                model: "lead-1".into(),
                usage: None,
            };
            let answer = Completion {
                message: Message::assistant("Thanks Grace, I'll be in touch."),
                finish_reason: FinishReason::Stop,
                model: "lead-1".into(),
                usage: None,
            };
            Self {
                replies: Mutex::new(vec![request, answer].into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for LeadProvider {
        fn info(&self) -> ProviderInfo {
            ProviderInfo {
                name: "lead".into(),
                model: "lead-1".into(),
                base_url: "memory://".into(),
                supports_tools: true,
            }
        }

        async fn chat_completion(&self, messages: &[Message], _tools: &[ToolSchema]) -> agent_core::Result<Completion> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| agent_core::AgentError::Provider("no more replies".into()))
        }
    }

    #[test]
    fn test_persona_tools_order() {
        let notifier: Arc<dyn Notifier> = Arc::new(RecordingNotifier::new());
        let registry = persona_tools(&notifier);
        assert_eq!(registry.names(), vec!["record_user_details", "record_unknown_question"]);
    }

    #[tokio::test]
    async fn test_failed_push_does_not_fail_the_turn() {
        let recorder = Arc::new(RecordingNotifier::failing());
        let notifier: Arc<dyn Notifier> = recorder.clone();
        let provider = Arc::new(LeadProvider::new());

        let agent = AgentBuilder::new()
            .provider(provider.clone())
            .tools(persona_tools(&notifier))
            .system_prompt(Persona::new("Ada", "summary", "").system_prompt())
            .build()
            .unwrap();

        let reply = agent.chat(Vec::new(), "Reach me at grace@example.com").await.unwrap();
        assert_eq!(reply.content, "Thanks Grace, I'll be in touch.");
        assert_eq!(reply.iterations, 2);

        assert_eq!(
            recorder.messages().await,
            vec!["Recording Grace with email grace@example.com and notes not provided"]
        );

        let seen = provider.seen.lock().unwrap();
        let tool_msg = seen[1].last().unwrap();
        assert_eq!(tool_msg.role, Role::Tool);
        assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(tool_msg.content, r#"{"recorded":"ok"}"#);
    }
}
