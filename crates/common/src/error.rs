//! Error types shared across Reframe crates.
//!
//! Conditions that are part of normal editing (layout not ready yet, a
//! layer skipped for one frame) are not errors and never reach this type.
//! It covers I/O at the edges: loading frames, writing renders, submitting
//! clips, and reading configuration.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ReframeError {
    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ReframeResult<T> = Result<T, ReframeError>;

impl ReframeError {
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ReframeError::render("surface gone").to_string(),
            "Render error: surface gone"
        );
        assert_eq!(
            ReframeError::config("unknown layout 'x'").to_string(),
            "Configuration error: unknown layout 'x'"
        );
        assert_eq!(
            ReframeError::FileNotFound {
                path: PathBuf::from("/tmp/frame.png")
            }
            .to_string(),
            "File not found: /tmp/frame.png"
        );
    }

    #[test]
    fn test_json_error_converts() {
        fn parse() -> ReframeResult<serde_json::Value> {
            Ok(serde_json::from_str("{not json")?)
        }
        assert!(matches!(parse(), Err(ReframeError::Json(_))));
    }
}
