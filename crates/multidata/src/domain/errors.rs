//! Domain-specific errors.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems found while parsing a configuration string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid clause '{clause}': expected at least 3 comma-separated fields")]
    TooFewFields { clause: String },
    #[error("invalid range expression '{expr}': {reason}")]
    InvalidRange { expr: String, reason: String },
    #[error("range '{spec}' has no upper bound; indices must be concrete before extraction")]
    UnboundedRange { spec: String },
    #[error("unsupported orientation '{0}', expected row or column")]
    UnsupportedOrientation(String),
    #[error("invalid label mode '{0}', expected 0, 1 or 2")]
    InvalidLabelMode(String),
    #[error("invalid skip_head '{0}', expected a non-negative integer")]
    InvalidSkipHead(String),
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },
    #[error("invalid option '{0}'")]
    InvalidOption(String),
}

/// Reload was requested but no session record exists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{} not found and no configuration string was provided", path.display())]
pub struct MissingSessionError {
    pub path: PathBuf,
}
