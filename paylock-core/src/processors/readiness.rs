//! Capability Readiness Detector.
//!
//! The payment capability is injected by a third-party script that may load
//! late or never. The detector probes the host at a fixed interval for a
//! bounded number of attempts and resolves either way; it never fails.
//!
//! - Once the capability has been seen, later calls resolve immediately.
//! - After an `Unready` run, the next call starts a fresh polling run.
//! - A shutdown signal stops polling between two probes.

use std::sync::{Arc, OnceLock};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::access::AccessCache;
use crate::host::{CapabilitySet, HostEnvironment};
use crate::utils::retry::RetryPolicy;

/// Outcome of a readiness run.
#[derive(Debug, Clone)]
pub enum Readiness {
    Ready(CapabilitySet),
    /// The capability did not appear within the policy's attempts.
    Unready { attempts: u32 },
    /// Polling was stopped by the shutdown signal.
    Cancelled,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready(_))
    }
}

/// Polls the host environment for the payment capability.
///
/// Cloning is cheap; all clones share the cached capability set.
#[derive(Clone)]
pub struct ReadinessDetector {
    env: Arc<dyn HostEnvironment>,
    access: AccessCache,
    ready: Arc<OnceLock<CapabilitySet>>,
}

impl ReadinessDetector {
    pub fn new(env: Arc<dyn HostEnvironment>, access: AccessCache) -> Self {
        Self {
            env,
            access,
            ready: Arc::new(OnceLock::new()),
        }
    }

    /// The capability set, if a previous run found it.
    pub fn capabilities(&self) -> Option<CapabilitySet> {
        self.ready.get().cloned()
    }

    /// Wait until the capability is present, for at most
    /// `policy.max_attempts` probes spaced `policy.interval` apart.
    pub async fn await_ready(
        &self,
        policy: RetryPolicy,
        shutdown_rx: &mut watch::Receiver<bool>,
    ) -> Readiness {
        if let Some(capabilities) = self.ready.get() {
            return Readiness::Ready(capabilities.clone());
        }

        for attempt in 1..=policy.max_attempts {
            if *shutdown_rx.borrow() {
                debug!(attempt, "Readiness polling cancelled");
                return Readiness::Cancelled;
            }

            if let Some(handle) = self.env.capability() {
                let capabilities = self
                    .ready
                    .get_or_init(|| CapabilitySet::detect(handle))
                    .clone();
                info!(
                    attempt,
                    checkout_modal = capabilities.has_checkout_modal(),
                    access_check = capabilities.has_access_check(),
                    "Payment capability ready"
                );
                return Readiness::Ready(capabilities);
            }

            if attempt == policy.max_attempts {
                break;
            }

            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        debug!(attempt, "Readiness polling cancelled");
                        return Readiness::Cancelled;
                    }
                }

                _ = tokio::time::sleep(policy.interval) => {}
            }
        }

        warn!(
            attempts = policy.max_attempts,
            "Payment capability failed to load after maximum retries"
        );
        Readiness::Unready {
            attempts: policy.max_attempts,
        }
    }

    /// [`await_ready`](Self::await_ready), then refresh the access status
    /// of `item_id` if the capability is ready.
    pub async fn await_ready_for(
        &self,
        item_id: &str,
        policy: RetryPolicy,
        shutdown_rx: &mut watch::Receiver<bool>,
    ) -> Readiness {
        let readiness = self.await_ready(policy, shutdown_rx).await;
        if let Readiness::Ready(capabilities) = &readiness {
            if *shutdown_rx.borrow() {
                return Readiness::Cancelled;
            }
            self.access.refresh(item_id, capabilities).await;
        }
        readiness
    }
}
