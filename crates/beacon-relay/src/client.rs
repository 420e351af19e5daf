//! Chat relay client with verified → unverifiable fallback.

use beacon_core::{Error, Result};
use tracing::{info, warn};

use crate::transport::Transport;
use crate::types::{ChatPayload, ChatSession, RelayEndpoints, RelayOutcome, TransportState};

/// Sends chat messages through the primary endpoint, switching a session to
/// the secondary endpoint when the primary turns out not to exist.
pub struct RelayClient<T: Transport> {
    transport: T,
    endpoints: RelayEndpoints,
}

impl<T: Transport> RelayClient<T> {
    pub fn new(transport: T, endpoints: RelayEndpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &RelayEndpoints {
        &self.endpoints
    }

    /// Send one chat message for `session`.
    ///
    /// Taking the session by `&mut` keeps a single request in flight per
    /// session. Blank messages are rejected before any network call.
    pub async fn send_message(
        &self,
        session: &mut ChatSession,
        text: &str,
    ) -> Result<RelayOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let payload = ChatPayload::new(&session.id, text).to_json();
        let outcome = self.relay(&mut session.transport, &payload).await;
        info!(session = %session.id, ?outcome, "Chat message relayed");
        Ok(outcome)
    }

    /// Deliver an arbitrary payload using `state` to pick the endpoint.
    pub async fn relay(
        &self,
        state: &mut TransportState,
        payload: &serde_json::Value,
    ) -> RelayOutcome {
        if let Some(outcome) = self.attempt_verified(state, payload).await {
            return outcome;
        }
        self.attempt_unverified(state, payload).await
    }

    async fn attempt_verified(
        &self,
        state: &mut TransportState,
        payload: &serde_json::Value,
    ) -> Option<RelayOutcome> {
        let url = state.active_endpoint(&self.endpoints);
        match self.transport.send_verified(url, payload).await {
            Ok(response) if response.is_success() => Some(verified_outcome(response.reply())),
            Ok(response) if response.is_not_found() && state.using_primary => {
                warn!(
                    "Primary endpoint {} not found (404), switching to {}",
                    url, self.endpoints.secondary
                );
                state.using_primary = false;

                let secondary = &self.endpoints.secondary;
                match self.transport.send_verified(secondary, payload).await {
                    Ok(retry) if retry.is_success() => Some(verified_outcome(retry.reply())),
                    Ok(retry) => {
                        warn!("Secondary endpoint {} answered {}", secondary, retry.status);
                        None
                    }
                    Err(e) => {
                        warn!("Secondary endpoint {} failed: {}", secondary, e);
                        None
                    }
                }
            }
            Ok(response) => {
                warn!("Verified send to {} answered {}, falling back", url, response.status);
                None
            }
            Err(e) => {
                warn!("Verified send to {} failed: {}, falling back", url, e);
                None
            }
        }
    }

    async fn attempt_unverified(
        &self,
        state: &mut TransportState,
        payload: &serde_json::Value,
    ) -> RelayOutcome {
        state.using_fallback_transport = true;
        let url = state.active_endpoint(&self.endpoints);
        match self.transport.send_unverified(url, payload).await {
            Ok(_) => RelayOutcome::SentUnverified,
            Err(e) => {
                warn!("Unverifiable send to {} failed: {}", url, e);
                RelayOutcome::Unreachable
            }
        }
    }
}

fn verified_outcome(reply: Option<String>) -> RelayOutcome {
    match reply {
        Some(text) => RelayOutcome::Replied(text),
        None => RelayOutcome::Acknowledged,
    }
}
