//! Beacon Core — configuration, error types, telemetry record schema,
//! session identifiers.

pub mod config;
pub mod error;
pub mod record;
pub mod session;

pub use config::BeaconConfig;
pub use error::{Error, Result};
pub use record::TelemetryRecord;
pub use session::SessionId;
