//! Error Types for the Career Persona

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PersonaError>;

#[derive(Error, Debug)]
pub enum PersonaError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No summary file found in {0}")]
    MissingSummary(PathBuf),

    #[error("Notification failed: {0}")]
    Notify(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
