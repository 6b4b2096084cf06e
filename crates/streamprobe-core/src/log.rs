//! Append-only playback event log
//!
//! Every user action and player status transition becomes one
//! timestamped row. The log grows monotonically for the lifetime of
//! the session; events are never edited, removed, or reordered.

use crate::types::{Event, EventKind, SessionId};
use chrono::Local;

/// Wall-clock format used for every recorded event: `MM/DD/YY HH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%y %H:%M:%S";

/// Format the current local time for an event row
pub fn format_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Ordered, append-only sequence of playback events
#[derive(Debug)]
pub struct EventLog {
    session_id: SessionId,
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log for a fresh session
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            events: Vec::new(),
        }
    }

    /// Session identifier attached to every event
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Record an event with the current local timestamp
    ///
    /// Accepts any kind/description, including empty descriptions.
    /// Infallible; returns a reference to the appended event so the
    /// caller can relay it.
    pub fn record(&mut self, kind: EventKind, description: impl Into<String>) -> &Event {
        let event = Event {
            timestamp: format_now(),
            kind,
            description: description.into(),
            session_id: self.session_id,
        };
        self.events.push(event);
        // Just pushed, so the log is non-empty
        self.events.last().unwrap()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event at `index`, oldest first
    pub fn event(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// Events in insertion order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Rendered display row: timestamp followed by the event text
    pub fn render_row(&self, index: usize) -> Option<String> {
        self.events
            .get(index)
            .map(|e| format!("{} {}", e.timestamp, event_text(e)))
    }
}

/// Full event text for a row: the kind label, plus the description
/// when one was given
pub fn event_text(event: &Event) -> String {
    if event.description.is_empty() {
        event.kind.to_string()
    } else {
        format!("{}: {}", event.kind, event.description)
    }
}
