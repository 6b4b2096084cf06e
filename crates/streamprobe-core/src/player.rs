//! Player façade - the opaque playback collaborator
//!
//! The harness never decodes or renders media itself; it drives an
//! external player through this trait and consumes the discrete
//! notices the player pushes back. Status observation is an explicit
//! channel subscription rather than property watching: the player
//! sends its current status on subscribe and every change afterwards.

use crate::types::PlayerNotice;
use crate::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

/// External media player collaborator
#[async_trait]
pub trait PlayerFacade: Send {
    /// Load or replace the current playback item
    async fn set_source(&mut self, url: &Url) -> Result<()>;

    /// Begin or resume playback of the current item
    async fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the current item armed
    async fn pause(&mut self) -> Result<()>;

    /// Destroy the current item (the player has no native stop)
    async fn stop(&mut self) -> Result<()>;

    /// Jump to the live edge of the stream
    async fn seek_to_live_edge(&mut self) -> Result<()>;

    /// Whether an item is currently armed
    fn has_source(&self) -> bool;

    /// Register for status and error notices
    ///
    /// The player pushes its current status immediately, then every
    /// subsequent change. Notices may originate off the harness's
    /// execution context; the session funnels them back in.
    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PlayerNotice>;

    /// Snapshot of the player's internal error log
    fn error_log(&self) -> Vec<String>;
}
