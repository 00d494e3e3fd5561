//! HTTP Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use agent_core::Message;

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
    pub supports_tools: bool,
    pub provider_reachable: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.agent.provider();
    let info = provider.info();
    let provider_reachable = provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: info.name,
        model: info.model,
        supports_tools: info.supports_tools,
        provider_reachable,
    })
}

/// Main chat endpoint
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let reply = state
        .agent
        .chat(payload.history, &payload.message)
        .await
        .map_err(|e| {
            tracing::error!("Error in chat endpoint: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.user_message(),
                    details: e.exposed_details(),
                }),
            )
        })?;

    if reply.truncated {
        tracing::warn!(iterations = reply.iterations, "Returning truncated reply");
    }

    Ok(Json(ChatResponse {
        response: reply.content,
        truncated: reply.truncated,
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use agent_core::{
        AgentBuilder, AgentError, Completion, FinishReason, LlmProvider, ProviderInfo, Result,
        ToolCall, ToolSchema,
    };
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    struct CannedProvider {
        replies: Mutex<VecDeque<Result<Completion>>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl CannedProvider {
        fn new(replies: Vec<Result<Completion>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn info(&self) -> ProviderInfo {
            ProviderInfo {
                name: "canned".into(),
                model: "canned-1".into(),
                base_url: "memory://".into(),
                supports_tools: true,
            }
        }

        async fn chat_completion(&self, messages: &[Message], _tools: &[ToolSchema]) -> Result<Completion> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AgentError::Provider("no more replies".into())))
        }
    }

    fn completion(message: Message, finish_reason: FinishReason) -> Result<Completion> {
        Ok(Completion {
            message,
            finish_reason,
            model: "canned-1".into(),
            usage: None,
        })
    }

    fn app(provider: Arc<CannedProvider>, max_iterations: usize) -> axum::Router {
        let agent = AgentBuilder::new()
            .provider(provider)
            .system_prompt("You are acting as Ada Lovelace.")
            .max_iterations(max_iterations)
            .build()
            .unwrap();
        crate::app(AppState { agent: Arc::new(agent) })
    }

    async fn post_chat(app: axum::Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_chat_returns_answer() {
        let provider = Arc::new(CannedProvider::new(vec![completion(
            Message::assistant("I have five years..."),
            FinishReason::Stop,
        )]));

        let (status, body) = post_chat(
            app(provider.clone(), 10),
            json!({"message": "What is your experience with distributed systems?", "history": []}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": "I have five years..."}));
        assert_eq!(provider.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_chat_forwards_history() {
        let provider = Arc::new(CannedProvider::new(vec![completion(
            Message::assistant("Sure."),
            FinishReason::Stop,
        )]));

        post_chat(
            app(provider.clone(), 10),
            json!({
                "message": "And before that?",
                "history": [
                    {"role": "user", "content": "Where do you work?"},
                    {"role": "assistant", "content": "At the Analytical Engine project."}
                ]
            }),
        )
        .await;

        let seen = provider.seen.lock().unwrap();
        let roles: Vec<_> = seen[0].iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
    }

    #[tokio::test]
    async fn test_chat_accepts_null_assistant_content() {
        let provider = Arc::new(CannedProvider::new(vec![completion(
            Message::assistant("Happy to help."),
            FinishReason::Stop,
        )]));

        let (status, body) = post_chat(
            app(provider.clone(), 10),
            json!({
                "message": "Thanks!",
                "history": [
                    {"role": "user", "content": "Can I email you?"},
                    {"role": "assistant", "content": null}
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": "Happy to help."}));

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].len(), 4);
        assert_eq!(seen[0][2].content, "");
    }

    #[tokio::test]
    async fn test_truncated_reply_is_flagged() {
        let tool_turn = || {
            completion(
                Message::assistant_tool_calls(
                    "still thinking",
                    vec![ToolCall::new("c", "record_unknown_question", Default::default())],
                ),
                FinishReason::ToolCalls,
            )
        };
        let provider = Arc::new(CannedProvider::new(vec![tool_turn(), tool_turn()]));

        let (status, body) = post_chat(app(provider, 2), json!({"message": "hi"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": "still thinking", "truncated": true}));
    }

    #[tokio::test]
    async fn test_quota_error_exposes_details() {
        let provider = Arc::new(CannedProvider::new(vec![Err(AgentError::RateLimited(
            "HTTP 429: quota exceeded".into(),
        ))]));

        let (status, body) = post_chat(app(provider, 10), json!({"message": "hi"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
        assert!(body["details"].as_str().unwrap().contains("429"));
    }

    #[tokio::test]
    async fn test_other_errors_hide_details() {
        let provider = Arc::new(CannedProvider::new(vec![Err(AgentError::Auth(
            "HTTP 401: bad key".into(),
        ))]));

        let (status, body) = post_chat(app(provider, 10), json!({"message": "hi"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["details"].is_null());
    }

    #[tokio::test]
    async fn test_health_reports_provider() {
        let provider = Arc::new(CannedProvider::new(Vec::new()));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app(provider, 10).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["provider"], "canned");
        assert_eq!(body["supports_tools"], true);
        assert_eq!(body["provider_reachable"], true);
    }
}
