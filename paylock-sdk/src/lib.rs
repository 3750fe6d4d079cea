//! Shared types for paylock.
//!
//! Everything the orchestrator exchanges with the host page lives here:
//! the item catalog, checkout configuration objects handed to the payment
//! capability, status-change signal payloads, and deep-link builders.

pub mod config;
pub mod links;
pub mod objects;
