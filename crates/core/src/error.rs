use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum TrayError {
    #[error("config error: {0}")]
    Config(String),

    /// A counter or sensor file could not be opened or read.
    #[error("cannot read '{}': {reason}", path.display())]
    Source { path: PathBuf, reason: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TrayError {
    /// Wrap an I/O failure on a named counter source.
    pub fn source(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Source {
            path:   path.into(),
            reason: err.to_string(),
        }
    }
}

pub type Result<T, E = TrayError> = std::result::Result<T, E>;
