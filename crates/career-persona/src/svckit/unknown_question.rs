//! Unanswered Question Tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
    tool::ParameterSchema,
};

use crate::notify::{Notifier, push_best_effort};

pub const RECORD_UNKNOWN_QUESTION: &str = "record_unknown_question";

/// Tool for recording questions the persona couldn't answer
pub struct RecordUnknownQuestionTool {
    notifier: Arc<dyn Notifier>,
}

impl RecordUnknownQuestionTool {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl Tool for RecordUnknownQuestionTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: RECORD_UNKNOWN_QUESTION.into(),
            description: "Always use this tool to record any question that couldn't be answered as you didn't know the answer".into(),
            parameters: vec![
                ParameterSchema::string("question", "The question that couldn't be answered").required(),
            ],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let question = call.str_arg("question").unwrap_or_default();

        push_best_effort(self.notifier.as_ref(), &format!("Recording {question}")).await;

        Ok(ToolResult::new(RECORD_UNKNOWN_QUESTION, json!({ "recorded": "ok" })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;

    #[tokio::test]
    async fn test_records_question() {
        let notifier = Arc::new(RecordingNotifier::new());
        let tool = RecordUnknownQuestionTool::new(notifier.clone());

        let args = json!({ "question": "Do you speak Klingon?" });
        let call = ToolCall::new("q1", RECORD_UNKNOWN_QUESTION, args.as_object().cloned().unwrap());
        let result = tool.execute(&call).await.unwrap();

        assert_eq!(result.content, json!({ "recorded": "ok" }));
        assert_eq!(notifier.messages().await, vec!["Recording Do you speak Klingon?"]);
    }

    #[test]
    fn test_schema() {
        let tool = RecordUnknownQuestionTool::new(Arc::new(RecordingNotifier::new()));
        let schema = tool.schema().parameters_json_schema();
        assert_eq!(schema["required"], json!(["question"]));
    }
}
