//! Shared application state.

use beacon_core::BeaconConfig;
use beacon_relay::{build_http_client, TransportError};

/// Shared application state accessible from all route handlers.
///
/// Immutable after startup; the forwarding path keeps no per-request state.
pub struct AppState {
    pub config: BeaconConfig,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: BeaconConfig) -> Result<Self, TransportError> {
        let http = build_http_client(config.request_timeout)?;
        Ok(Self { config, http })
    }
}
