//! Provider Selection
//!
//! Turns startup configuration into exactly one provider instance. Selection is
//! pure: no network I/O happens here, and missing required settings fail fast.

use std::sync::Arc;
use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    provider::LlmProvider,
};

use crate::akamai::AkamaiProvider;
use crate::compat::{CompatConfig, DEFAULT_TIMEOUT};
use crate::gemini::{GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL, GeminiProvider};
use crate::local::{LOCAL_DEFAULT_BASE_URL, LocalProvider};

/// Which backend to talk to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Local,
    Akamai,
}

impl ProviderKind {
    /// Parse the `AI_PROVIDER` discriminator. Absent or unknown values select Gemini.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("local") => Self::Local,
            Some("akamai") => Self::Akamai,
            Some("gemini") | None => Self::Gemini,
            Some(other) => {
                tracing::warn!(provider = other, "Unknown AI_PROVIDER, defaulting to gemini");
                Self::Gemini
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Local => "local",
            Self::Akamai => "akamai",
        }
    }
}

/// Raw provider settings, collected once at startup
#[derive(Clone, Default)]
pub struct ProviderSettings {
    /// `AI_PROVIDER`
    pub provider: Option<String>,
    /// `AI_MODEL`
    pub model: Option<String>,
    /// `GOOGLE_API_KEY`
    pub google_api_key: Option<String>,
    /// `GEMINI_BASE_URL`
    pub gemini_base_url: Option<String>,
    /// `LOCAL_AI_BASE_URL`
    pub local_base_url: Option<String>,
    /// `LOCAL_AI_API_KEY`
    pub local_api_key: Option<String>,
    /// `AKAMAI_INFERENCE_API_KEY`
    pub akamai_api_key: Option<String>,
    /// `AKAMAI_INFERENCE_BASE_URL`
    pub akamai_base_url: Option<String>,
    /// `AI_TIMEOUT_SECS`
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("ProviderSettings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("google_api_key", &redact(&self.google_api_key))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("local_base_url", &self.local_base_url)
            .field("local_api_key", &redact(&self.local_api_key))
            .field("akamai_api_key", &redact(&self.akamai_api_key))
            .field("akamai_base_url", &self.akamai_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderSettings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Blank values count as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout = get("AI_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .ok_or_else(|| AgentError::Config(format!("AI_TIMEOUT_SECS must be a positive integer, got '{raw}'")))
            })
            .transpose()?;

        Ok(Self {
            provider: get("AI_PROVIDER"),
            model: get("AI_MODEL"),
            google_api_key: get("GOOGLE_API_KEY"),
            gemini_base_url: get("GEMINI_BASE_URL"),
            local_base_url: get("LOCAL_AI_BASE_URL"),
            local_api_key: get("LOCAL_AI_API_KEY"),
            akamai_api_key: get("AKAMAI_INFERENCE_API_KEY"),
            akamai_base_url: get("AKAMAI_INFERENCE_BASE_URL"),
            timeout,
        })
    }

    pub fn kind(&self) -> ProviderKind {
        ProviderKind::parse(self.provider.as_deref())
    }

    fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}

fn require(kind: ProviderKind, fields: &[(&str, &Option<String>)]) -> Result<()> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| (*name).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AgentError::MissingConfig {
            provider: kind.as_str().into(),
            fields: missing,
        })
    }
}

/// Build the provider the settings ask for.
///
/// Called once at startup; the returned instance is shared for the life of the
/// process.
pub fn select_provider(settings: &ProviderSettings) -> Result<Arc<dyn LlmProvider>> {
    let kind = settings.kind();
    let timeout = settings.timeout();

    let provider: Arc<dyn LlmProvider> = match kind {
        ProviderKind::Local => {
            require(kind, &[("AI_MODEL", &settings.model)])?;
            let base_url = settings
                .local_base_url
                .clone()
                .unwrap_or_else(|| LOCAL_DEFAULT_BASE_URL.into());
            Arc::new(LocalProvider::new(CompatConfig {
                base_url,
                api_key: settings.local_api_key.clone(),
                model: settings.model.clone().unwrap_or_default(),
                timeout,
            })?)
        }
        ProviderKind::Akamai => {
            require(
                kind,
                &[
                    ("AKAMAI_INFERENCE_API_KEY", &settings.akamai_api_key),
                    ("AKAMAI_INFERENCE_BASE_URL", &settings.akamai_base_url),
                    ("AI_MODEL", &settings.model),
                ],
            )?;
            Arc::new(AkamaiProvider::new(CompatConfig {
                base_url: settings.akamai_base_url.clone().unwrap_or_default(),
                api_key: settings.akamai_api_key.clone(),
                model: settings.model.clone().unwrap_or_default(),
                timeout,
            })?)
        }
        ProviderKind::Gemini => {
            require(kind, &[("GOOGLE_API_KEY", &settings.google_api_key)])?;
            Arc::new(GeminiProvider::new(CompatConfig {
                base_url: settings
                    .gemini_base_url
                    .clone()
                    .unwrap_or_else(|| GEMINI_BASE_URL.into()),
                api_key: settings.google_api_key.clone(),
                model: settings
                    .model
                    .clone()
                    .unwrap_or_else(|| GEMINI_DEFAULT_MODEL.into()),
                timeout,
            })?)
        }
    };

    let info = provider.info();
    tracing::info!(provider = %info.name, model = %info.model, base_url = %info.base_url, "Selected AI provider");

    Ok(provider)
}
