//! Environment-driven configuration.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_WEBHOOK_URL: &str = "http://localhost:5678/webhook/chat";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "*";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path the forwarding server listens on for chat relays.
pub const CHAT_PATH: &str = "/api/chat";

/// Top-level Beacon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeaconConfig {
    /// HTTP server port.
    pub port: u16,
    /// Upstream webhook every `/api/chat` request is forwarded to.
    pub webhook_url: String,
    /// Allowed cross-origin source, `*` for any.
    pub allowed_origin: String,
    /// Root of the bundled front-end (`index.html` lives here).
    pub static_dir: PathBuf,
    /// Spreadsheet sink endpoint. `None` disables telemetry delivery.
    pub sheets_url: Option<String>,
    /// Primary relay endpoint used by chat clients (the local forwarding path).
    pub relay_primary_url: String,
    /// Per-call timeout for outbound requests.
    pub request_timeout: Duration,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl BeaconConfig {
    /// Create configuration from the process environment and defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", DEFAULT_PORT);
        let timeout_secs: u64 = parse_or(&lookup, "RELAY_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);

        let webhook_url = string_or(&lookup, "N8N_WEBHOOK_URL", DEFAULT_WEBHOOK_URL);
        let allowed_origin = string_or(&lookup, "ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN);
        let static_dir = PathBuf::from(string_or(&lookup, "STATIC_DIR", DEFAULT_STATIC_DIR));
        let relay_primary_url = string_or(
            &lookup,
            "RELAY_PRIMARY_URL",
            &format!("http://127.0.0.1:{}{}", port, CHAT_PATH),
        );
        let sheets_url = non_empty(&lookup, "GOOGLE_SCRIPT_URL");
        if sheets_url.is_none() {
            info!("GOOGLE_SCRIPT_URL not set, telemetry delivery disabled");
        }

        Self {
            port,
            webhook_url,
            allowed_origin,
            static_dir,
            sheets_url,
            relay_primary_url,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Whether any origin may call the server.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origin == "*"
    }

    /// Whether a request carrying `Origin: origin` may be served.
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.allows_any_origin() || origin == self.allowed_origin
    }

    /// Entry document served for unmatched paths.
    pub fn index_file(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match non_empty(lookup, key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        None => default,
    }
}
