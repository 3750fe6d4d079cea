//! Payload of the capability's "status changed" signal.
//!
//! The payment capability broadcasts a signal whenever the viewer's
//! entitlement to one or more locks changes:
//!
//! ```json
//! {"state":"unlocked","locks":{"10-min":"unlocked","booking-fee":"locked"}}
//! ```
//!
//! The top-level `state` is informational only; consumers must look at
//! the entry for their own lock id. Entries for other locks, and the
//! top-level `state`, may carry any JSON value. Only a missing or
//! non-object `locks` makes a signal malformed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-lock state carried by a status signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockState {
    Locked,
    Unlocked,
    Other(String),
}

impl From<String> for LockState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "locked" => LockState::Locked,
            "unlocked" => LockState::Unlocked,
            _ => LockState::Other(value),
        }
    }
}

impl From<&Value> for LockState {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(state) => LockState::from(state.clone()),
            other => LockState::Other(other.to_string()),
        }
    }
}

/// Decoded status-changed signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChangedPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    pub locks: Map<String, Value>,
}

/// The signal did not have the expected shape.
#[derive(Debug, thiserror::Error)]
#[error("malformed status signal: {0}")]
pub struct MalformedSignal(#[from] serde_json::Error);

impl StatusChangedPayload {
    /// A signal reporting `state` for a single lock.
    pub fn single(lock_id: &str, state: &str) -> Self {
        let mut locks = Map::new();
        locks.insert(lock_id.to_string(), Value::String(state.to_string()));
        Self {
            state: Some(Value::String(state.to_string())),
            locks,
        }
    }

    /// Decode a raw signal detail.
    pub fn decode(detail: &Value) -> Result<Self, MalformedSignal> {
        Ok(Self::deserialize(detail)?)
    }

    /// State reported for `lock_id`, if the signal mentions it.
    pub fn lock_state(&self, lock_id: &str) -> Option<LockState> {
        self.locks.get(lock_id).map(LockState::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_lock_states() {
        let payload = StatusChangedPayload::decode(&json!({
            "state": "unlocked",
            "locks": {"10-min": "unlocked", "booking-fee": "locked", "x": "pending"}
        }))
        .unwrap();
        assert_eq!(payload.lock_state("10-min"), Some(LockState::Unlocked));
        assert_eq!(payload.lock_state("booking-fee"), Some(LockState::Locked));
        assert_eq!(
            payload.lock_state("x"),
            Some(LockState::Other("pending".to_string()))
        );
        assert_eq!(payload.lock_state("missing"), None);
    }

    #[test]
    fn test_malformed_signals_are_rejected() {
        assert!(StatusChangedPayload::decode(&json!({"state": "unlocked"})).is_err());
        assert!(StatusChangedPayload::decode(&json!("unlocked")).is_err());
        assert!(StatusChangedPayload::decode(&json!({"locks": ["10-min"]})).is_err());
        assert!(StatusChangedPayload::decode(&json!({"locks": {}})).is_ok());
    }

    #[test]
    fn test_unrelated_fields_do_not_poison_the_signal() {
        let payload = StatusChangedPayload::decode(&json!({
            "state": 2,
            "locks": {"10-min": "unlocked", "other": {"expiry": 1}, "n": 1}
        }))
        .unwrap();
        assert_eq!(payload.lock_state("10-min"), Some(LockState::Unlocked));
        assert_eq!(
            payload.lock_state("n"),
            Some(LockState::Other("1".to_string()))
        );
        assert!(matches!(payload.lock_state("other"), Some(LockState::Other(_))));
    }
}
