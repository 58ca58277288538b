use std::path::PathBuf;
use thiserror::Error;

/// Domain errors raised by the QA tools
#[derive(Debug, Error)]
pub enum QaError {
    /// Route could not be reached before the navigation timeout
    #[error("failed to navigate to {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// In-page script returned something other than the expected shape
    #[error("unexpected result from `{script}` script: {source}")]
    ScriptResult {
        script: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Element addressed by probe index is gone from the DOM
    #[error("probed element {0} is no longer attached")]
    Detached(usize),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("browser error: {0}")]
    Browser(String),
}
