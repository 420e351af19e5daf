//! Cookie consent — accept/decline state and record gating.

use beacon_core::record::NOT_PROVIDED;
use beacon_core::{Error, Result, TelemetryRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const ACTION_ACCEPTED: &str = "Cookie Accepted";
pub const ACTION_DECLINED: &str = "Cookie Declined";
pub const ACTION_OFFER_INTEREST: &str = "Offer Interest";

/// Records produced by the gate itself, admitted in every state.
const CONSENT_EVENTS: [&str; 3] = [ACTION_ACCEPTED, ACTION_DECLINED, ACTION_OFFER_INTEREST];

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Loose shape check: something@something.tld, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Visitor's consent decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ConsentState {
    /// Banner shown, no decision yet.
    Pending,
    Accepted {
        /// RFC 3339 consent time.
        at: String,
    },
    Declined,
}

/// Identity captured from the consent banner or an offer form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorIdentity {
    pub email: String,
    pub name: String,
    pub phone: String,
    pub category: String,
}

/// Gates telemetry records on the visitor's consent decision.
#[derive(Debug, Clone)]
pub struct ConsentGate {
    state: ConsentState,
    identity: VisitorIdentity,
}

impl Default for ConsentGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsentGate {
    pub fn new() -> Self {
        Self {
            state: ConsentState::Pending,
            identity: VisitorIdentity::default(),
        }
    }

    /// Restore a previously stored decision.
    pub fn restore(state: ConsentState, identity: VisitorIdentity) -> Self {
        Self { state, identity }
    }

    pub fn state(&self) -> &ConsentState {
        &self.state
    }

    pub fn identity(&self) -> &VisitorIdentity {
        &self.identity
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.state, ConsentState::Accepted { .. })
    }

    /// Accept cookies. The email is optional but must be well-formed if given.
    pub fn accept(&mut self, email: &str) -> Result<TelemetryRecord> {
        let email = email.trim();
        if !email.is_empty() && !is_valid_email(email) {
            return Err(Error::InvalidEmail(email.to_string()));
        }

        let at = chrono::Utc::now().to_rfc3339();
        info!("Cookie consent accepted at {}", at);
        self.state = ConsentState::Accepted { at };
        if !email.is_empty() {
            self.identity.email = email.to_string();
        }

        Ok(self.event_record(ACTION_ACCEPTED, email, "", "", ""))
    }

    /// Decline cookies. The decline itself is still recorded, without identity.
    pub fn decline(&mut self) -> TelemetryRecord {
        info!("Cookie consent declined");
        self.state = ConsentState::Declined;
        self.identity = VisitorIdentity::default();
        self.event_record(ACTION_DECLINED, "", "", "", "")
    }

    /// Register interest in an offer. Requires a valid email.
    pub fn offer_interest(
        &mut self,
        category: &str,
        email: &str,
        name: &str,
        phone: &str,
    ) -> Result<TelemetryRecord> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(Error::InvalidEmail(email.to_string()));
        }

        self.identity = VisitorIdentity {
            email: email.to_string(),
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            category: category.to_string(),
        };
        info!("Offer interest registered: {}", category);

        Ok(self.event_record(ACTION_OFFER_INTEREST, email, name, phone, category))
    }

    /// Decide whether a collected record may be sent onward.
    ///
    /// Pending drops the record; declined strips identity and marks it
    /// as non-consented; accepted passes it through. Consent events pass
    /// unchanged whatever the state.
    pub fn admit(&self, mut record: TelemetryRecord) -> Option<TelemetryRecord> {
        if CONSENT_EVENTS.contains(&record.action.as_str()) {
            return Some(record);
        }

        match self.state {
            ConsentState::Pending => None,
            ConsentState::Declined => {
                record.strip_identity();
                record.cookies_accepted = false;
                Some(record)
            }
            ConsentState::Accepted { .. } => {
                record.cookies_accepted = true;
                Some(record)
            }
        }
    }

    fn event_record(
        &self,
        action: &str,
        email: &str,
        name: &str,
        phone: &str,
        category: &str,
    ) -> TelemetryRecord {
        let mut record =
            TelemetryRecord::new(action).with_identity(email, name, phone, category);
        record.cookies_accepted = self.is_accepted();
        record
    }
}
