//! Push Notifications
//!
//! One-way, best-effort channel the tools use to tell the site owner that
//! something happened in a conversation.

mod ntfy;
mod recording;

pub use ntfy::{NTFY_BASE_URL, NtfyNotifier};
pub use recording::{LogNotifier, RecordingNotifier};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Notification sink (Strategy pattern)
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Push a plain-text message
    async fn push(&self, text: &str) -> Result<()>;

    /// Sink name, for logs
    fn name(&self) -> &str;
}

/// Notification settings
#[derive(Clone, Debug)]
pub struct NotifyConfig {
    /// `NTFY_TOPIC`; `None` disables pushes
    pub topic: Option<String>,

    /// `NTFY_BASE_URL`
    pub base_url: String,

    /// Per-push timeout
    pub timeout: Duration,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            topic: None,
            base_url: NTFY_BASE_URL.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl NotifyConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            topic: get("NTFY_TOPIC"),
            base_url: get("NTFY_BASE_URL").unwrap_or_else(|| NTFY_BASE_URL.into()),
            ..Default::default()
        }
    }
}

/// Build the notifier for `config`: ntfy when a topic is set, log-only otherwise
pub fn build_notifier(config: &NotifyConfig) -> Result<Arc<dyn Notifier>> {
    match &config.topic {
        Some(topic) => Ok(Arc::new(NtfyNotifier::new(&config.base_url, topic, config.timeout)?)),
        None => Ok(Arc::new(LogNotifier)),
    }
}

/// Push without letting a delivery failure reach the caller
pub async fn push_best_effort(notifier: &dyn Notifier, text: &str) {
    if let Err(e) = notifier.push(text).await {
        tracing::warn!(sink = notifier.name(), error = %e, "Push notification not delivered");
    }
}
