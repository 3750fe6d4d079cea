//! Event type definitions.
//!
//! Signals arrive from the host untyped: the payment capability dispatches
//! a JSON `detail` object and nothing guarantees its shape. The bus carries
//! the raw value; each listener decodes it and drops what it cannot use.

use paylock_sdk::objects::{MalformedSignal, StatusChangedPayload};

/// A "payment status changed" signal as dispatched by the capability.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSignal {
    pub detail: serde_json::Value,
}

impl StatusSignal {
    pub fn new(detail: serde_json::Value) -> Self {
        Self { detail }
    }

    /// Decode the detail into the expected payload shape.
    pub fn decode(&self) -> Result<StatusChangedPayload, MalformedSignal> {
        StatusChangedPayload::decode(&self.detail)
    }
}

impl From<StatusChangedPayload> for StatusSignal {
    fn from(payload: StatusChangedPayload) -> Self {
        Self {
            detail: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
        }
    }
}
