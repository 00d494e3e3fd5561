//! OpenAI-compatible Chat Completions Client
//!
//! Every supported backend speaks the `/chat/completions` wire contract. This
//! module owns the HTTP plumbing and the translation between agent types and
//! the wire JSON; the provider types decide what to send.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{Completion, FinishReason, ProviderInfo},
    tool::{ToolArguments, ToolCall, ToolSchema},
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default provider request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings shared by every OpenAI-compatible backend
#[derive(Clone)]
pub struct CompatConfig {
    /// Base URL, e.g. `http://localhost:11434/v1`
    pub base_url: String,

    /// Bearer credential, if the backend needs one
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for CompatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompatConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Thin client over one `/chat/completions` endpoint
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    config: CompatConfig,
}

impl OpenAiCompatClient {
    pub fn new(config: CompatConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Every provider built on this client sends tool specs
    pub fn info(&self, name: &str) -> ProviderInfo {
        ProviderInfo {
            name: name.into(),
            model: self.config.model.clone(),
            base_url: self.config.base_url.clone(),
            supports_tools: true,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Send one chat completion request. `tools = None` omits the field entirely.
    pub async fn chat(&self, messages: &[Message], tools: Option<&[ToolSchema]>) -> Result<Completion> {
        let payload = ChatRequest {
            model: &self.config.model,
            messages: messages.iter().map(WireMessage::from_message).collect(),
            tools: tools.map(|specs| specs.iter().map(WireTool::from_schema).collect()),
        };

        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            tools = payload.tools.as_ref().map_or(0, Vec::len),
            "Sending chat completion"
        );

        let response = self
            .authorize(self.http.post(self.url("chat/completions")))
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        decode_completion(&body, &self.config.model)
    }

    /// `GET /models` as a reachability probe
    pub async fn ping(&self) -> Result<bool> {
        let response = self
            .authorize(self.http.get(self.url("models")))
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        Ok(response.status().is_success())
    }

    fn transport_error(&self, err: &reqwest::Error) -> AgentError {
        if err.is_timeout() {
            AgentError::Timeout(self.config.timeout)
        } else {
            AgentError::ProviderUnavailable(err.to_string())
        }
    }
}

fn status_error(status: StatusCode, body: &str) -> AgentError {
    let detail = format!("HTTP {}: {}", status.as_u16(), body.trim());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AgentError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => AgentError::RateLimited(detail),
        _ => AgentError::Provider(detail),
    }
}

fn decode_completion(body: &str, requested_model: &str) -> Result<Completion> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| AgentError::Parse(format!("Malformed chat completion: {e}")))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AgentError::Parse("No choices in API response".into()))?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(WireToolCallIn::into_tool_call)
        .collect::<Result<Vec<_>>>()?;

    let finish_reason = FinishReason::from_wire(choice.finish_reason.as_deref().unwrap_or("stop"));

    Ok(Completion {
        message: Message::assistant_tool_calls(choice.message.content.unwrap_or_default(), tool_calls),
        finish_reason,
        model: parsed.model.unwrap_or_else(|| requested_model.to_string()),
        usage: parsed.usage.map(|u| agent_core::provider::TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
    })
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool<'a>>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCallOut<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

impl<'a> WireMessage<'a> {
    fn from_message(message: &'a Message) -> Self {
        // Tool-call turns without text are sent with `content: null`
        let content = if message.role == Role::Assistant
            && message.has_tool_calls()
            && message.content.is_empty()
        {
            None
        } else {
            Some(message.content.as_str())
        };

        Self {
            role: message.role.as_str(),
            content,
            tool_calls: message.tool_calls.iter().map(WireToolCallOut::from_call).collect(),
            tool_call_id: message.tool_call_id.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct WireToolCallOut<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionOut<'a>,
}

#[derive(Serialize)]
struct WireFunctionOut<'a> {
    name: &'a str,
    /// JSON-encoded argument object
    arguments: String,
}

impl<'a> WireToolCallOut<'a> {
    fn from_call(call: &'a ToolCall) -> Self {
        Self {
            id: &call.id,
            kind: "function",
            function: WireFunctionOut {
                name: &call.name,
                arguments: Value::Object(call.arguments.clone()).to_string(),
            },
        }
    }
}

#[derive(Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionSpec<'a>,
}

#[derive(Serialize)]
struct WireFunctionSpec<'a> {
    name: &'a str,
    description: &'a str,
    parameters: Value,
}

impl<'a> WireTool<'a> {
    fn from_schema(schema: &'a ToolSchema) -> Self {
        Self {
            kind: "function",
            function: WireFunctionSpec {
                name: &schema.name,
                description: &schema.description,
                parameters: schema.parameters_json_schema(),
            },
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    finish_reason: Option<String>,
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCallIn>>,
}

#[derive(Deserialize)]
struct WireToolCallIn {
    #[serde(default)]
    id: Option<String>,
    function: WireFunctionIn,
}

#[derive(Deserialize)]
struct WireFunctionIn {
    name: String,
    #[serde(default)]
    arguments: Value,
}

impl WireToolCallIn {
    fn into_tool_call(self) -> Result<ToolCall> {
        let arguments = decode_arguments(&self.function.name, self.function.arguments)?;
        Ok(match self.id.filter(|id| !id.is_empty()) {
            Some(id) => ToolCall::new(id, self.function.name, arguments),
            None => ToolCall::with_generated_id(self.function.name, arguments),
        })
    }
}

/// Arguments normally arrive JSON-encoded in a string; some local servers send
/// the object directly.
fn decode_arguments(tool: &str, raw: Value) -> Result<ToolArguments> {
    let value = match raw {
        Value::Null => return Ok(ToolArguments::new()),
        Value::String(s) if s.trim().is_empty() => return Ok(ToolArguments::new()),
        Value::String(s) => serde_json::from_str(&s)
            .map_err(|e| AgentError::Parse(format!("Bad arguments for tool '{tool}': {e}")))?,
        other => other,
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(AgentError::Parse(format!(
            "Arguments for tool '{tool}' are not an object: {other}"
        ))),
    }
}

#[derive(Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}
