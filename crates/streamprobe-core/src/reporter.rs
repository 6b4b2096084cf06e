//! Best-effort event relay to a remote collector
//!
//! Each recorded event is mirrored to a collector endpoint as a
//! single fire-and-forget POST. Requests are not queued, ordered,
//! retried, or rate-limited; any number may be in flight at once and
//! none of them block log growth. Failures go to the diagnostic
//! channel only and are never recorded as log events themselves.

use crate::types::Event;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

/// Wire payload for the collector
///
/// Key casing matches the collector's expected JSON exactly.
#[derive(Debug, Clone, Serialize)]
pub struct RelayPayload {
    #[serde(rename = "sessionID")]
    pub session_id: String,
    pub event: String,
    pub description: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
}

impl RelayPayload {
    pub fn from_event(event: &Event) -> Self {
        Self {
            session_id: event.session_id.to_string(),
            event: event.kind.to_string(),
            description: event.description.clone(),
            time_stamp: event.timestamp.clone(),
        }
    }
}

/// Fire-and-forget relay of log events to a fixed collector URL
pub struct EventReporter {
    endpoint: Url,
    client: Client,
}

impl EventReporter {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Relay one event as a detached task
    ///
    /// Returns immediately; the request is allowed to complete or
    /// fail silently at any later time. Must be called from within a
    /// tokio runtime.
    pub fn relay(&self, event: &Event) {
        let payload = RelayPayload::from_event(event);
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        tokio::spawn(async move {
            match client.post(endpoint.clone()).json(&payload).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        debug!(event = %payload.event, %status, "Event relayed");
                    } else {
                        warn!(event = %payload.event, %status, "Collector rejected event");
                    }
                }
                Err(err) => {
                    warn!(event = %payload.event, error = %err, "Event relay failed");
                }
            }
        });
    }
}
