//! Harness session - orchestrator for one test run
//!
//! Coordinates:
//! - User actions (set URL, play, pause, stop, live)
//! - Player status notices
//! - Event log appends and display refresh
//! - Best-effort relay to the collector
//!
//! The session is the log's only writer. User commands and player
//! notices are both handled on the session's single execution
//! context, so an append and its refresh signal are always ordered
//! relative to any display read.

use crate::log::{event_text, EventLog};
use crate::player::PlayerFacade;
use crate::reporter::EventReporter;
use crate::store::{SettingsStore, LAST_URL_KEY};
use crate::types::{EventKind, PlayerNotice, PlayerStatus, SessionId};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Stream test harness session
pub struct HarnessSession<P: PlayerFacade, S: SettingsStore> {
    /// Unique session ID, attached to every relayed event
    id: SessionId,
    /// Append-only event log, owned exclusively by this session
    log: EventLog,
    /// External player collaborator
    player: P,
    /// Injected key-value store for the last-used URL
    store: S,
    /// Optional fire-and-forget relay to a remote collector
    reporter: Option<EventReporter>,
    /// Stream address currently under test
    current_url: Option<Url>,
    /// Refresh generation, bumped on every append
    refresh_tx: watch::Sender<u64>,
}

impl<P: PlayerFacade, S: SettingsStore> HarnessSession<P, S> {
    /// Create a session, reading the persisted URL from the store
    ///
    /// `collector` enables event relaying when set; `None` keeps the
    /// log local.
    pub fn new(player: P, store: S, collector: Option<Url>) -> Self {
        let id = SessionId::new();
        let current_url = store
            .get(LAST_URL_KEY)
            .and_then(|text| Url::parse(&text).ok());

        if let Some(url) = &current_url {
            info!(url = %url, "Restored last-used stream URL");
        }

        let (refresh_tx, _) = watch::channel(0);

        Self {
            id,
            log: EventLog::new(id),
            player,
            store,
            reporter: collector.map(EventReporter::new),
            current_url,
            refresh_tx,
        }
    }

    /// Get session ID
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Stream URL the session would play next, persisted or user-set
    pub fn current_url(&self) -> Option<&Url> {
        self.current_url.as_ref()
    }

    /// Subscribe to display refresh signals
    ///
    /// The generation counter bumps on every append; a renderer
    /// re-reads the full row set whenever it changes.
    pub fn subscribe_refresh(&self) -> watch::Receiver<u64> {
        self.refresh_tx.subscribe()
    }

    /// Append an event, relay it, and signal the display
    ///
    /// Never fails and never blocks on the relay.
    fn record(&mut self, kind: EventKind, description: impl Into<String>) {
        let event = self.log.record(kind, description);
        if let Some(reporter) = &self.reporter {
            reporter.relay(event);
        }
        self.refresh_tx.send_modify(|generation| *generation += 1);
    }

    /// Set the stream URL under test
    ///
    /// On success the URL is persisted, recorded, and handed to the
    /// player. Malformed input records an Error event and leaves the
    /// persisted value untouched.
    #[instrument(skip(self))]
    pub async fn set_url(&mut self, text: &str) {
        let url = match Url::parse(text) {
            Ok(url) => url,
            Err(err) => {
                warn!(input = text, error = %err, "Rejected malformed stream URL");
                self.record(EventKind::Error, format!("invalid URL '{text}': {err}"));
                return;
            }
        };

        if let Err(err) = self.store.set(LAST_URL_KEY, text) {
            // Persistence is best-effort; the session keeps the URL
            warn!(error = %err, "Failed to persist stream URL");
        }

        self.current_url = Some(url.clone());
        self.record(EventKind::SetUrl, text);

        if let Err(err) = self.player.set_source(&url).await {
            self.record(EventKind::Error, err.to_string());
        }
    }

    /// Start or resume playback
    ///
    /// Re-arms the player from the current URL when it has no item,
    /// so stop/play and pause/play sequences both work.
    #[instrument(skip(self))]
    pub async fn play(&mut self) {
        if !self.player.has_source() {
            let Some(url) = self.current_url.clone() else {
                self.record(EventKind::Error, "no stream URL has been set");
                return;
            };
            if let Err(err) = self.player.set_source(&url).await {
                self.record(EventKind::Error, err.to_string());
                return;
            }
        }

        self.record(EventKind::Play, "");
        if let Err(err) = self.player.play().await {
            self.record(EventKind::Error, err.to_string());
        }
    }

    /// Pause playback, keeping the item armed
    #[instrument(skip(self))]
    pub async fn pause(&mut self) {
        self.record(EventKind::Pause, "");
        if let Err(err) = self.player.pause().await {
            self.record(EventKind::Error, err.to_string());
        }
    }

    /// Stop playback by destroying the current item
    #[instrument(skip(self))]
    pub async fn stop(&mut self) {
        self.record(EventKind::Stop, "");
        if let Err(err) = self.player.stop().await {
            self.record(EventKind::Error, err.to_string());
        }
    }

    /// Jump to the live edge of the stream
    #[instrument(skip(self))]
    pub async fn live(&mut self) {
        self.record(EventKind::Live, "");
        if let Err(err) = self.player.seek_to_live_edge().await {
            self.record(EventKind::Error, err.to_string());
        }
    }

    /// Handle a notice pushed by the player collaborator
    ///
    /// Failures become Error events; a ready status is traced only.
    pub fn handle_notice(&mut self, notice: PlayerNotice) {
        match notice {
            PlayerNotice::StatusChanged { status, message } => match status {
                PlayerStatus::Failed => {
                    let description = message
                        .unwrap_or_else(|| "player reported failed status".to_string());
                    self.record(EventKind::Error, description);
                }
                PlayerStatus::Ready => {
                    info!("Player ready");
                }
                PlayerStatus::Unknown => {
                    debug!("Player status unknown");
                }
            },
            PlayerNotice::ErrorLogEntry(entry) => {
                self.record(EventKind::Error, entry);
            }
            PlayerNotice::FailedToPlayToEnd(message) => {
                self.record(EventKind::Error, message);
            }
        }
    }

    /// Number of rows available to the display
    pub fn row_count(&self) -> usize {
        self.log.len()
    }

    /// Rendered row for the display: timestamp plus event text
    pub fn render_row(&self, index: usize) -> Option<String> {
        self.log.render_row(index)
    }

    /// Full event text for a selected row
    pub fn event_text(&self, index: usize) -> Option<String> {
        self.log.event(index).map(event_text)
    }

    /// The underlying log, read-only
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Snapshot of the player collaborator's own error log
    pub fn player_error_log(&self) -> Vec<String> {
        self.player.error_log()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::Result;
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    /// Scripted player that records the calls it receives
    #[derive(Default)]
    struct FakePlayer {
        source: Option<Url>,
        calls: Vec<&'static str>,
        fail_next: bool,
    }

    #[async_trait]
    impl PlayerFacade for FakePlayer {
        async fn set_source(&mut self, url: &Url) -> Result<()> {
            self.calls.push("set_source");
            if self.fail_next {
                return Err(crate::Error::player("could not load item"));
            }
            self.source = Some(url.clone());
            Ok(())
        }

        async fn play(&mut self) -> Result<()> {
            self.calls.push("play");
            Ok(())
        }

        async fn pause(&mut self) -> Result<()> {
            self.calls.push("pause");
            Ok(())
        }

        async fn stop(&mut self) -> Result<()> {
            self.calls.push("stop");
            self.source = None;
            Ok(())
        }

        async fn seek_to_live_edge(&mut self) -> Result<()> {
            self.calls.push("seek_to_live_edge");
            Ok(())
        }

        fn has_source(&self) -> bool {
            self.source.is_some()
        }

        fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PlayerNotice> {
            let (_tx, rx) = mpsc::unbounded_channel();
            rx
        }

        fn error_log(&self) -> Vec<String> {
            Vec::new()
        }
    }

    fn new_session() -> HarnessSession<FakePlayer, MemoryStore> {
        HarnessSession::new(FakePlayer::default(), MemoryStore::new(), None)
    }

    #[tokio::test]
    async fn test_set_url_records_and_persists() {
        let mut session = new_session();
        session.set_url("https://example.com/stream.m3u8").await;

        assert_eq!(session.row_count(), 1);
        let row = session.render_row(0).unwrap();
        assert!(row.contains("Set Url"));
        assert!(row.contains("https://example.com/stream.m3u8"));
        assert_eq!(
            session.store.get(LAST_URL_KEY).as_deref(),
            Some("https://example.com/stream.m3u8")
        );
        assert_eq!(session.player.calls, vec!["set_source"]);
    }

    #[tokio::test]
    async fn test_malformed_url_records_error_without_persisting() {
        let mut session = new_session();
        session.set_url("not a url at all").await;

        assert_eq!(session.row_count(), 1);
        assert_eq!(session.log().event(0).unwrap().kind, EventKind::Error);
        assert_eq!(session.store.get(LAST_URL_KEY), None);
        assert!(session.player.calls.is_empty());
    }

    #[tokio::test]
    async fn test_play_rearms_player_after_stop() {
        let mut session = new_session();
        session.set_url("https://example.com/stream.m3u8").await;
        session.stop().await;
        session.play().await;

        assert_eq!(
            session.player.calls,
            vec!["set_source", "stop", "set_source", "play"]
        );
    }

    #[tokio::test]
    async fn test_play_without_url_records_error() {
        let mut session = new_session();
        session.play().await;

        assert_eq!(session.row_count(), 1);
        assert_eq!(session.log().event(0).unwrap().kind, EventKind::Error);
        assert!(session.player.calls.is_empty());
    }

    #[tokio::test]
    async fn test_user_actions_append_in_order() {
        let mut session = new_session();
        session.set_url("https://example.com/stream.m3u8").await;
        session.play().await;
        session.pause().await;
        session.live().await;
        session.stop().await;

        let kinds: Vec<_> = session.log().events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::SetUrl,
                EventKind::Play,
                EventKind::Pause,
                EventKind::Live,
                EventKind::Stop,
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_status_becomes_error_event() {
        let mut session = new_session();
        session.handle_notice(PlayerNotice::StatusChanged {
            status: PlayerStatus::Failed,
            message: Some("the stream could not be decoded".to_string()),
        });

        assert_eq!(session.row_count(), 1);
        let row = session.render_row(0).unwrap();
        assert!(row.contains("Error"));
        assert!(row.contains("the stream could not be decoded"));
    }

    #[tokio::test]
    async fn test_ready_status_is_not_logged() {
        let mut session = new_session();
        session.handle_notice(PlayerNotice::StatusChanged {
            status: PlayerStatus::Ready,
            message: None,
        });

        assert_eq!(session.row_count(), 0);
    }

    #[tokio::test]
    async fn test_error_log_entry_becomes_error_event() {
        let mut session = new_session();
        session.handle_notice(PlayerNotice::ErrorLogEntry(
            "segment 42 returned 404".to_string(),
        ));
        session.handle_notice(PlayerNotice::FailedToPlayToEnd(
            "connection reset".to_string(),
        ));

        assert_eq!(session.row_count(), 2);
        assert!(session.event_text(0).unwrap().contains("segment 42 returned 404"));
        assert!(session.event_text(1).unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_set_source_failure_is_recorded_not_raised() {
        let mut session = HarnessSession::new(
            FakePlayer {
                fail_next: true,
                ..Default::default()
            },
            MemoryStore::new(),
            None,
        );
        session.set_url("https://example.com/stream.m3u8").await;

        // Set Url first, then the player failure
        assert_eq!(session.row_count(), 2);
        assert_eq!(session.log().event(0).unwrap().kind, EventKind::SetUrl);
        assert_eq!(session.log().event(1).unwrap().kind, EventKind::Error);
    }

    #[tokio::test]
    async fn test_refresh_generation_bumps_per_append() {
        let mut session = new_session();
        let refresh = session.subscribe_refresh();
        assert_eq!(*refresh.borrow(), 0);

        session.play().await; // Error: no URL set
        assert_eq!(*refresh.borrow(), 1);

        session.set_url("https://example.com/stream.m3u8").await;
        assert_eq!(*refresh.borrow(), 2);
    }

    #[tokio::test]
    async fn test_restored_url_surfaces_without_reentry() {
        let mut store = MemoryStore::new();
        store.set(LAST_URL_KEY, "https://example.com/stream.m3u8").unwrap();

        let session = HarnessSession::new(FakePlayer::default(), store, None);
        assert_eq!(
            session.current_url().map(Url::as_str),
            Some("https://example.com/stream.m3u8")
        );
        // Restoring does not append to the log
        assert_eq!(session.row_count(), 0);
    }

    #[tokio::test]
    async fn test_session_ids_differ_across_sessions() {
        let a = new_session();
        let b = new_session();
        assert_ne!(a.id(), b.id());
    }
}
