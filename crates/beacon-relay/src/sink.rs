//! Spreadsheet sink delivery for telemetry records.

use beacon_core::{BeaconConfig, TelemetryRecord};
use tracing::{debug, warn};

use crate::transport::Transport;

/// How far a record got. Informational only: nothing is retried or queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkDelivery {
    /// The sink answered 2xx.
    Confirmed,
    /// Sent in unverifiable mode; outcome unknown.
    Attempted,
    /// Both modes failed; the record is dropped.
    Lost,
}

/// Posts telemetry records to the spreadsheet backend.
pub struct SheetsSink<T: Transport> {
    transport: T,
    url: String,
}

impl<T: Transport> SheetsSink<T> {
    pub fn new(transport: T, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    /// Sink at the configured `GOOGLE_SCRIPT_URL`, `None` when it is unset.
    pub fn from_config(transport: T, config: &BeaconConfig) -> Option<Self> {
        config
            .sheets_url
            .as_ref()
            .map(|url| Self::new(transport, url.as_str()))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn deliver(&self, record: &TelemetryRecord) -> SinkDelivery {
        let payload = record.to_json();

        match self.transport.send_verified(&self.url, &payload).await {
            Ok(response) if response.is_success() => {
                debug!("Record '{}' stored by sink", record.action);
                return SinkDelivery::Confirmed;
            }
            Ok(response) => warn!("Sink answered {}, retrying unverified", response.status),
            Err(e) => warn!("Sink request failed: {}, retrying unverified", e),
        }

        match self.transport.send_unverified(&self.url, &payload).await {
            Ok(_) => SinkDelivery::Attempted,
            Err(e) => {
                warn!("Record '{}' lost: {}", record.action, e);
                SinkDelivery::Lost
            }
        }
    }
}
