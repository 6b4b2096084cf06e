//! Streamprobe Core - Stream Test Harness Library
//!
//! This crate provides the core of a streaming-URL test harness:
//! - An append-only, timestamped playback event log
//! - Best-effort event relay to a remote collector
//! - A player façade trait for the external playback collaborator
//! - An injected key-value store for the last-used stream URL
//! - A harness session tying user actions and player notices together
//!
//! Media decoding, rendering, and adaptive bitrate logic are owned
//! entirely by the player collaborator and are out of scope here.

pub mod error;
pub mod log;
pub mod player;
pub mod reporter;
pub mod session;
pub mod store;
pub mod types;

pub use error::{Error, Result};
pub use log::{event_text, EventLog, TIMESTAMP_FORMAT};
pub use player::PlayerFacade;
pub use reporter::{EventReporter, RelayPayload};
pub use session::HarnessSession;
pub use store::{JsonFileStore, MemoryStore, SettingsStore, LAST_URL_KEY};
pub use types::{Event, EventKind, PlayerNotice, PlayerStatus, SessionId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
