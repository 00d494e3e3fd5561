//! Contact Capture Tool
//!
//! Records that a visitor wants to get in touch and left an email address.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
    tool::ParameterSchema,
};

use crate::notify::{Notifier, push_best_effort};

pub const RECORD_USER_DETAILS: &str = "record_user_details";

/// Tool for recording a visitor's contact details
pub struct RecordUserDetailsTool {
    notifier: Arc<dyn Notifier>,
}

impl RecordUserDetailsTool {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl Tool for RecordUserDetailsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: RECORD_USER_DETAILS.into(),
            description: "Use this tool to record that a user is interested in being in touch and provided an email address".into(),
            parameters: vec![
                ParameterSchema::string("email", "The email address of this user").required(),
                ParameterSchema::string("name", "The user's name, if they provided it"),
                ParameterSchema::string(
                    "notes",
                    "Any additional information about the conversation that's worth recording to give context",
                ),
            ],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let email = call.str_arg("email").unwrap_or_default();
        let name = call.str_arg("name").unwrap_or("Name not provided");
        let notes = call.str_arg("notes").unwrap_or("not provided");

        push_best_effort(
            self.notifier.as_ref(),
            &format!("Recording {name} with email {email} and notes {notes}"),
        )
        .await;

        Ok(ToolResult::new(RECORD_USER_DETAILS, json!({ "recorded": "ok" })))
    }
}
