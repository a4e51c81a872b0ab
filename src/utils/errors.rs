use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Pattern matched '{path}' but field '{field}' could not be extracted: {reason}")]
    PatternExtraction {
        path: String,
        field: &'static str,
        reason: String,
    },

    #[error("Failed to read sidecar file '{}': {source}", path.display())]
    SidecarRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{}': {reason}", path.display())]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl Error {
    pub fn extraction(path: &str, field: &'static str, reason: impl Into<String>) -> Self {
        Error::PatternExtraction {
            path: path.to_string(),
            field,
            reason: reason.into(),
        }
    }

    pub fn config_parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::ConfigParse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
