//! Access State Cache.
//!
//! Remembers, per item id, whether the viewer already holds an entitlement.
//! The map lives in a `watch` channel so any number of surfaces can read the
//! last known value synchronously and await changes. Writes only ever touch
//! one key.

use compact_str::CompactString;
use kanau::processor::Processor;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::host::{AccessCheckError, CapabilitySet};

/// Whether the viewer holds an entitlement for an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AccessStatus {
    /// Never checked, or reset after the selection changed.
    #[default]
    Unknown,
    Locked,
    Unlocked,
}

type AccessMap = HashMap<CompactString, AccessStatus>;

/// Shared per-item access status.
///
/// Cloning is cheap; all clones observe the same map.
#[derive(Clone)]
pub struct AccessCache {
    tx: Arc<watch::Sender<AccessMap>>,
}

/// Receives notifications when any entry of an [`AccessCache`] changes.
pub struct AccessWatcher {
    rx: watch::Receiver<AccessMap>,
}

impl AccessCache {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(AccessMap::new());
        Self { tx: Arc::new(tx) }
    }

    /// Last known status. Never performs I/O.
    pub fn get(&self, item_id: &str) -> AccessStatus {
        self.tx.borrow().get(item_id).copied().unwrap_or_default()
    }

    /// Record `status` for `item_id`, notifying watchers if it changed.
    pub fn set(&self, item_id: &str, status: AccessStatus) {
        if status == AccessStatus::Unknown {
            self.reset(item_id);
            return;
        }
        self.tx.send_if_modified(|map| {
            let previous = map.insert(CompactString::from(item_id), status);
            previous != Some(status)
        });
    }

    /// Forget what is known about `item_id`.
    pub fn reset(&self, item_id: &str) {
        self.tx.send_if_modified(|map| map.remove(item_id).is_some());
    }

    /// Query the capability for `item_id` and store the result.
    ///
    /// Never fails: an unanswerable query is logged and recorded as
    /// [`AccessStatus::Locked`].
    pub async fn refresh(&self, item_id: &str, capabilities: &CapabilitySet) -> AccessStatus {
        let query = RefreshAccess {
            item_id: CompactString::from(item_id),
            capabilities: capabilities.clone(),
        };
        match self.process(query).await {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }

    pub fn subscribe(&self) -> AccessWatcher {
        AccessWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for AccessCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessWatcher {
    /// Last known status of `item_id`.
    pub fn get(&self, item_id: &str) -> AccessStatus {
        self.rx.borrow().get(item_id).copied().unwrap_or_default()
    }

    /// Wait until any entry changes.
    ///
    /// Returns `Err` once every [`AccessCache`] clone has been dropped.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.rx.changed().await
    }

    /// Wait until `item_id` reaches `status`.
    pub async fn wait_for(
        &mut self,
        item_id: &str,
        status: AccessStatus,
    ) -> Result<(), watch::error::RecvError> {
        self.rx
            .wait_for(|map| map.get(item_id).copied().unwrap_or_default() == status)
            .await
            .map(|_| ())
    }
}

#[derive(Debug, Clone)]
/// Re-check one item against the capability and store the answer.
pub struct RefreshAccess {
    pub item_id: CompactString,
    pub capabilities: CapabilitySet,
}

impl Processor<RefreshAccess> for AccessCache {
    type Output = AccessStatus;
    type Error = Infallible;
    #[tracing::instrument(skip_all, fields(item_id = %query.item_id), name = "AccessCache:refresh")]
    async fn process(&self, query: RefreshAccess) -> Result<AccessStatus, Infallible> {
        let status = match query.capabilities.check_access(&query.item_id).await {
            Ok(status) => status,
            Err(AccessCheckError::Degraded) => {
                warn!("Payment capability has no access check, treating as locked");
                AccessStatus::Locked
            }
            Err(e) => {
                error!(error = %e, "Access check failed, treating as locked");
                AccessStatus::Locked
            }
        };
        debug!(?status, "Access status refreshed");
        self.set(&query.item_id, status);
        Ok(status)
    }
}
