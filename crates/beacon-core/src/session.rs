//! Client session identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque per-client identifier, `session_<unix-millis>_<9 base-36 chars>`.
///
/// Generated once and then persisted by the client; the upstream
/// conversational system keys its per-session context on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let random = uuid::Uuid::new_v4().as_u128();
        Self(format!("session_{}_{}", millis, base36_suffix(random)))
    }

    /// Reuse a stored identifier, generating one if none was stored.
    pub fn restore_or_generate(stored: Option<&str>) -> Self {
        match stored.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => Self(id.to_string()),
            None => Self::generate(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

fn base36_suffix(mut value: u128) -> String {
    let mut out = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        out.push(BASE36[(value % 36) as usize] as char);
        value /= 36;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_shape() {
        let id = SessionId::generate();
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn test_restore_keeps_stored_id() {
        let id = SessionId::restore_or_generate(Some("session_1_abc"));
        assert_eq!(id.as_str(), "session_1_abc");

        let fresh = SessionId::restore_or_generate(Some("  "));
        assert!(fresh.as_str().starts_with("session_"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = SessionId::from("s1".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"s1\"");
    }
}
