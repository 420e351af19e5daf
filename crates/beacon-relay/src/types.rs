//! Relay types: endpoints, per-session transport state, delivery outcomes.

use beacon_core::{BeaconConfig, SessionId};
use serde::{Deserialize, Serialize};

/// Field of the upstream reply that carries the bot's answer.
pub const REPLY_FIELD: &str = "output";

pub const ACK_TEXT: &str = "✅ Message envoyé — réponse indisponible.";
pub const UNVERIFIED_TEXT: &str =
    "✅ Message envoyé (mode restreint). La réponse serveur n'a pas pu être récupérée.";
pub const FAILURE_TEXT: &str = "عذراً، لا يمكن الاتصال بالخادم.\n\
    Impossible de se connecter au serveur.\n\
    Unable to connect to server.";

/// Chat message as sent upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    pub action: String,
    pub session_id: String,
    pub chat_input: String,
}

impl ChatPayload {
    pub fn new(session_id: &SessionId, text: &str) -> Self {
        Self {
            action: "sendMessage".into(),
            session_id: session_id.to_string(),
            chat_input: text.to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Primary (local forwarding path) and secondary (direct webhook) targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEndpoints {
    pub primary: String,
    pub secondary: String,
}

impl RelayEndpoints {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Local forwarding path first, the webhook itself second.
    pub fn from_config(config: &BeaconConfig) -> Self {
        Self::new(&config.relay_primary_url, &config.webhook_url)
    }
}

/// Fallback state for one logical session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportState {
    /// Cleared for good once the primary endpoint answers 404.
    pub using_primary: bool,
    /// Set once a send had to use unverifiable delivery.
    pub using_fallback_transport: bool,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            using_primary: true,
            using_fallback_transport: false,
        }
    }
}

impl TransportState {
    pub fn active_endpoint<'a>(&self, endpoints: &'a RelayEndpoints) -> &'a str {
        if self.using_primary {
            &endpoints.primary
        } else {
            &endpoints.secondary
        }
    }
}

/// One chat client: its identifier and its own fallback state.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: SessionId,
    pub transport: TransportState,
}

impl ChatSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            transport: TransportState::default(),
        }
    }
}

/// Response of a verified send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl VerifiedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Body parsed as JSON, if it is JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// The reply text, if the body carries a non-empty reply field.
    pub fn reply(&self) -> Option<String> {
        match self.json()?.get(REPLY_FIELD)? {
            serde_json::Value::Null | serde_json::Value::Bool(false) => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// An unverifiable send went out; nothing is known about its fate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unverified;

/// What the chat user gets to see for one send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Verified delivery with a reply.
    Replied(String),
    /// Verified delivery, no usable reply.
    Acknowledged,
    /// Unverifiable delivery did not fail.
    SentUnverified,
    /// Both tiers failed.
    Unreachable,
}

impl RelayOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Replied(reply) => reply,
            Self::Acknowledged => ACK_TEXT,
            Self::SentUnverified => UNVERIFIED_TEXT,
            Self::Unreachable => FAILURE_TEXT,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Replied(_) | Self::Acknowledged)
    }
}
