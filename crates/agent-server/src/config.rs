//! Startup Configuration
//!
//! Read once from the environment (after `.env` is loaded) and passed down
//! explicitly. Nothing below `main` reads the environment.

use std::path::PathBuf;

use anyhow::{Context, bail};

use agent_core::reasoning::DEFAULT_MAX_ITERATIONS;
use agent_runtime::ProviderSettings;
use career_persona::NotifyConfig;

#[derive(Debug)]
pub struct AppConfig {
    /// Provider discriminator, endpoints and credentials
    pub provider: ProviderSettings,

    /// Push notification sink
    pub notify: NotifyConfig,

    /// Name the agent speaks as
    pub persona_name: String,

    /// Directory holding `summary.txt` and `profile.txt`
    pub persona_dir: PathBuf,

    /// Provider round-trip cap per chat request
    pub max_iterations: usize,

    /// Listen address
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = ProviderSettings::from_lookup(&lookup).context("invalid provider settings")?;

        let Some(persona_name) = get("PERSONA_NAME") else {
            bail!("PERSONA_NAME environment variable is required");
        };

        let max_iterations = match get("AGENT_MAX_ITERATIONS") {
            Some(raw) => {
                let value: usize = raw
                    .parse()
                    .with_context(|| format!("AGENT_MAX_ITERATIONS must be a number, got '{raw}'"))?;
                if value == 0 {
                    bail!("AGENT_MAX_ITERATIONS must be at least 1");
                }
                value
            }
            None => DEFAULT_MAX_ITERATIONS,
        };

        Ok(Self {
            provider,
            notify: NotifyConfig::from_lookup(&lookup),
            persona_name,
            persona_dir: get("PERSONA_DIR").map_or_else(|| PathBuf::from("me"), PathBuf::from),
            max_iterations,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
        })
    }
}
