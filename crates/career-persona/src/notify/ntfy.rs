//! ntfy.sh notifier

use std::time::Duration;

use async_trait::async_trait;

use super::Notifier;
use crate::error::{PersonaError, Result};

pub const NTFY_BASE_URL: &str = "https://ntfy.sh";

/// Posts plain text to `{base_url}/{topic}`
pub struct NtfyNotifier {
    http: reqwest::Client,
    url: String,
}

impl NtfyNotifier {
    pub fn new(base_url: &str, topic: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PersonaError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            url: format!("{}/{}", base_url.trim_end_matches('/'), topic),
        })
    }
}

#[async_trait]
impl Notifier for NtfyNotifier {
    async fn push(&self, text: &str) -> Result<()> {
        let response = self
            .http
            .post(&self.url)
            .body(text.as_bytes().to_vec())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(PersonaError::Notify(format!("ntfy returned HTTP {}", status.as_u16())))
        }
    }

    fn name(&self) -> &str {
        "ntfy"
    }
}
