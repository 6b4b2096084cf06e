//! Headless probe implementation of the player façade
//!
//! Stands in for a real media player so the harness runs without a
//! decoder: "playing" a stream means fetching its manifest and
//! reporting reachability through status notices. Probe requests run
//! detached, so command handling never waits on the network.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::{Arc, Mutex};
use streamprobe_core::{Error, PlayerFacade, PlayerNotice, PlayerStatus, Result};
use tokio::sync::mpsc;
use tracing::debug;
use url::Url;

/// Shared state written by detached probe tasks
#[derive(Default)]
struct ProbeState {
    last_status: PlayerStatus,
    errors: Vec<String>,
}

/// HTTP-probe player: verifies stream reachability instead of decoding
pub struct HttpProbePlayer {
    client: Client,
    source: Option<Url>,
    notice_tx: Option<mpsc::UnboundedSender<PlayerNotice>>,
    state: Arc<Mutex<ProbeState>>,
}

impl HttpProbePlayer {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            source: None,
            notice_tx: None,
            state: Arc::new(Mutex::new(ProbeState::default())),
        }
    }

    /// Fetch the manifest once, pushing the outcome as a status notice
    fn spawn_probe(&self, url: Url) {
        let client = self.client.clone();
        let notice_tx = self.notice_tx.clone();
        let state = self.state.clone();

        tokio::spawn(async move {
            let notice = match client.get(url.clone()).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(url = %url, status = %response.status(), "Stream reachable");
                    PlayerNotice::StatusChanged {
                        status: PlayerStatus::Ready,
                        message: None,
                    }
                }
                Ok(response) => {
                    let message = format!(
                        "manifest request for {url} returned {}",
                        response.status()
                    );
                    PlayerNotice::StatusChanged {
                        status: PlayerStatus::Failed,
                        message: Some(message),
                    }
                }
                Err(err) => PlayerNotice::StatusChanged {
                    status: PlayerStatus::Failed,
                    message: Some(format!("manifest request for {url} failed: {err}")),
                },
            };

            {
                let mut state = state.lock().unwrap();
                if let PlayerNotice::StatusChanged { status, message } = &notice {
                    state.last_status = *status;
                    if let Some(message) = message {
                        state.errors.push(message.clone());
                    }
                }
            }

            if let Some(tx) = notice_tx {
                let _ = tx.send(notice);
            }
        });
    }
}

impl Default for HttpProbePlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerFacade for HttpProbePlayer {
    async fn set_source(&mut self, url: &Url) -> Result<()> {
        self.source = Some(url.clone());
        self.spawn_probe(url.clone());
        Ok(())
    }

    async fn play(&mut self) -> Result<()> {
        let url = self.source.clone().ok_or(Error::NoUrlSet)?;
        self.spawn_probe(url);
        Ok(())
    }

    async fn pause(&mut self) -> Result<()> {
        // Nothing to decode, so nothing to pause
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.source = None;
        Ok(())
    }

    async fn seek_to_live_edge(&mut self) -> Result<()> {
        // The live edge of a probe is a fresh manifest fetch
        let url = self.source.clone().ok_or(Error::NoUrlSet)?;
        self.spawn_probe(url);
        Ok(())
    }

    fn has_source(&self) -> bool {
        self.source.is_some()
    }

    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PlayerNotice> {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(PlayerNotice::StatusChanged {
            status: self.state.lock().unwrap().last_status,
            message: None,
        });
        self.notice_tx = Some(tx);
        rx
    }

    fn error_log(&self) -> Vec<String> {
        self.state.lock().unwrap().errors.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response
    async fn serve_once(response: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf).await;
            stream.write_all(response.as_bytes()).await.unwrap();
        });

        Url::parse(&format!("http://{addr}/stream.m3u8")).unwrap()
    }

    #[tokio::test]
    async fn test_reachable_stream_reports_ready() {
        let url = serve_once("HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n").await;

        let mut player = HttpProbePlayer::new();
        let mut notices = player.subscribe();
        // Initial status push
        assert_eq!(
            notices.recv().await,
            Some(PlayerNotice::StatusChanged {
                status: PlayerStatus::Unknown,
                message: None,
            })
        );

        player.set_source(&url).await.unwrap();
        assert_eq!(
            notices.recv().await,
            Some(PlayerNotice::StatusChanged {
                status: PlayerStatus::Ready,
                message: None,
            })
        );
        assert!(player.error_log().is_empty());
    }

    #[tokio::test]
    async fn test_missing_stream_reports_failed() {
        let url = serve_once("HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\n\r\n").await;

        let mut player = HttpProbePlayer::new();
        let mut notices = player.subscribe();
        let _ = notices.recv().await; // initial status

        player.set_source(&url).await.unwrap();
        match notices.recv().await {
            Some(PlayerNotice::StatusChanged {
                status: PlayerStatus::Failed,
                message: Some(message),
            }) => assert!(message.contains("404")),
            other => panic!("expected failed status, got {other:?}"),
        }
        assert_eq!(player.error_log().len(), 1);
    }

    #[tokio::test]
    async fn test_play_without_source_errors() {
        let mut player = HttpProbePlayer::new();
        assert!(player.play().await.is_err());
    }

    #[tokio::test]
    async fn test_stop_disarms_source() {
        let url = Url::parse("http://127.0.0.1:1/stream.m3u8").unwrap();
        let mut player = HttpProbePlayer::new();

        player.set_source(&url).await.unwrap();
        assert!(player.has_source());

        player.stop().await.unwrap();
        assert!(!player.has_source());
    }
}
