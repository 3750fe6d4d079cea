//! Orchestrator tuning.
//!
//! The storefront catalog itself is a `paylock_sdk::config::StorefrontConfig`;
//! this module only holds timings and modes of the flow machinery.

use std::time::Duration;

use crate::utils::retry::RetryPolicy;

/// How long a completion subscription waits for a matching signal.
pub const DEFAULT_COMPLETION_WINDOW: Duration = Duration::from_secs(5 * 60);

/// What a subscription does after reporting an unlock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListenerMode {
    /// Cancel after the first unlock.
    #[default]
    Once,
    /// Keep reporting until cancelled or expired (multi-item surfaces).
    KeepListening,
}

/// Timings of the payment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Polling policy of the readiness detector.
    pub readiness: RetryPolicy,
    /// Lifetime of a completion subscription.
    pub completion_window: Duration,
    pub listener_mode: ListenerMode,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            readiness: RetryPolicy::default(),
            completion_window: DEFAULT_COMPLETION_WINDOW,
            listener_mode: ListenerMode::Once,
        }
    }
}
