//! Core types for the stream test harness

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one harness session
///
/// Generated once per process lifetime and attached to every
/// relayed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of a logged playback event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Play,
    Pause,
    Stop,
    Live,
    SetUrl,
    Error,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Play => write!(f, "Play"),
            EventKind::Pause => write!(f, "Pause"),
            EventKind::Stop => write!(f, "Stop"),
            EventKind::Live => write!(f, "Live"),
            EventKind::SetUrl => write!(f, "Set Url"),
            EventKind::Error => write!(f, "Error"),
        }
    }
}

/// A single logged playback event, immutable once recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Local wall-clock time, formatted `MM/DD/YY HH:MM:SS`
    pub timestamp: String,
    /// Short label for the event
    pub kind: EventKind,
    /// Free-text detail, empty allowed
    pub description: String,
    /// Session this event belongs to
    pub session_id: SessionId,
}

/// Player collaborator status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    #[default]
    Unknown,
    Ready,
    Failed,
}

impl std::fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerStatus::Unknown => write!(f, "unknown"),
            PlayerStatus::Ready => write!(f, "ready"),
            PlayerStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Discrete notification pushed by the player collaborator
///
/// Replaces key-path/notification observation with an explicit
/// channel subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerNotice {
    /// Player or item status changed; failures carry the
    /// collaborator's localized message when it has one
    StatusChanged {
        status: PlayerStatus,
        message: Option<String>,
    },
    /// The player appended an entry to its internal error log
    ErrorLogEntry(String),
    /// Playback could not continue to the end of the stream
    FailedToPlayToEnd(String),
}
