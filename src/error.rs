//! Error types for the episode organizer.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the episode organizer.
#[derive(Error, Debug)]
pub enum Error {
    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Cannot read file metadata for {path}: {source}")]
    FileUnreadable {
        path: String,
        source: std::io::Error,
    },

    // External tool errors
    #[error("{tool} failed: {detail}")]
    ToolFailed { tool: &'static str, detail: String },

    #[error("Probe failed for {0}")]
    ProbeFailed(String),

    // Pipeline errors
    #[error("Episode {0} has no video file to merge")]
    MissingVideo(u32),

    #[error("Title recognition failed: {0}")]
    RecognitionFailed(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Create an external-tool error.
    pub fn tool<S: Into<String>>(tool: &'static str, detail: S) -> Self {
        Error::ToolFailed {
            tool,
            detail: detail.into(),
        }
    }
}
