//! Visitor tracking — environment and behavior collection, cookie consent.
//!
//! The collector turns a visitor environment plus behavior counters into a
//! flat `TelemetryRecord`; the consent gate decides whether a record may be
//! sent onward and emits the consent-event records themselves.

pub mod collector;
pub mod consent;

pub use collector::{BehaviorTracker, Collector, VisitorEnvironment};
pub use consent::{is_valid_email, ConsentGate, ConsentState};
