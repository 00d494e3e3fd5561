//! In-process notifiers

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::Notifier;
use crate::error::{PersonaError, Result};

/// Used when no ntfy topic is configured: the message only reaches the log
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn push(&self, text: &str) -> Result<()> {
        tracing::warn!(message = text, "NTFY_TOPIC not set, push notification not sent");
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Keeps pushed messages in memory (for development/testing)
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every push fails (messages are still recorded)
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn messages(&self) -> Vec<String> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn push(&self, text: &str) -> Result<()> {
        self.messages.lock().await.push(text.to_string());
        if self.fail {
            return Err(PersonaError::Notify("sink unreachable".into()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
