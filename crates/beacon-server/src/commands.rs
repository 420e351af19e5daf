//! One-shot client commands run against the configured endpoints.

use anyhow::Result;

use beacon_core::{BeaconConfig, SessionId, TelemetryRecord};
use beacon_relay::{
    ChatSession, HttpTransport, RelayClient, RelayEndpoints, RelayOutcome, SheetsSink,
    SinkDelivery,
};

/// Send one chat message through the relay chain in a fresh session.
pub async fn chat(config: &BeaconConfig, message: &str) -> Result<RelayOutcome> {
    let transport = HttpTransport::new(config.request_timeout)?;
    let client = RelayClient::new(transport, RelayEndpoints::from_config(config));
    let mut session = ChatSession::new(SessionId::generate());
    Ok(client.send_message(&mut session, message).await?)
}

/// Post a bare record for `action` to the sink. `None` when no sink is
/// configured.
pub async fn track(config: &BeaconConfig, action: &str) -> Result<Option<SinkDelivery>> {
    let transport = HttpTransport::new(config.request_timeout)?;
    let Some(sink) = SheetsSink::from_config(transport, config) else {
        return Ok(None);
    };

    let mut record = TelemetryRecord::new(action);
    record.session_id = SessionId::generate().to_string();
    Ok(Some(sink.deliver(&record).await))
}
