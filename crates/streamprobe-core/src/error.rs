//! Error types for the stream test harness

use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, Error>;

/// Harness error types
///
/// None of these are fatal: the log and the player stay usable
/// after any single failure.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors
    #[error("Invalid stream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // Settings store errors
    #[error("Settings store failed for key '{key}'")]
    Store {
        key: String,
        #[source]
        source: std::io::Error,
    },

    // Player collaborator errors
    #[error("Player error: {0}")]
    Player(String),

    #[error("No stream URL has been set")]
    NoUrlSet,

    // Network errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a player error from a collaborator message
    pub fn player(msg: impl Into<String>) -> Self {
        Error::Player(msg.into())
    }
}
