//! The externally injected payment capability.
//!
//! The host page may or may not carry a payment capability object, and a
//! capability may expose any subset of its known entry points. Feature
//! detection happens once, in [`CapabilitySet::detect`]; the rest of the
//! crate only talks to the canonical methods of the resulting set.

use async_trait::async_trait;
use paylock_sdk::objects::CheckoutConfig;
use std::sync::Arc;
use thiserror::Error;

use crate::access::AccessStatus;

/// Errors reported by the payment capability itself.
#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    /// The capability does not expose this entry point.
    #[error("entry point `{0}` is not exposed by the payment capability")]
    Unsupported(&'static str),

    /// The entry point exists but the call failed.
    #[error("payment capability call failed: {0}")]
    Call(String),
}

/// Which optional entry points a capability exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryPoints {
    /// Opens the provider's checkout modal.
    pub checkout_modal: bool,
    /// Direct boolean "does the viewer hold a key" query.
    pub keyholder_status: bool,
    /// Generic key lookup; a non-null key implies access.
    pub key_lookup: bool,
}

/// The raw capability object injected into the host page.
///
/// Implementations override the entry points they actually expose and
/// report them from [`entry_points`](PaymentCapability::entry_points).
#[async_trait]
pub trait PaymentCapability: Send + Sync {
    fn entry_points(&self) -> EntryPoints;

    async fn keyholder_status(&self, _lock_id: &str) -> Result<bool, CapabilityError> {
        Err(CapabilityError::Unsupported("getKeyholderStatus"))
    }

    async fn get_key(&self, _lock_id: &str) -> Result<Option<serde_json::Value>, CapabilityError> {
        Err(CapabilityError::Unsupported("getKey"))
    }

    fn load_checkout_modal(&self, _config: &CheckoutConfig) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unsupported("loadCheckoutModal"))
    }
}

/// The host page, as far as capability discovery is concerned.
pub trait HostEnvironment: Send + Sync {
    /// The capability, only if both it and its configuration companion
    /// are present.
    fn capability(&self) -> Option<Arc<dyn PaymentCapability>>;

    /// Whether the capability is currently present.
    fn probe(&self) -> bool {
        self.capability().is_some()
    }
}

/// Reasons an access check could not produce an answer.
#[derive(Debug, Clone, Error)]
pub enum AccessCheckError {
    /// Neither access entry point is exposed.
    #[error("payment capability exposes no access check entry point")]
    Degraded,

    #[error(transparent)]
    Query(#[from] CapabilityError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessEntryPoint {
    KeyholderStatus,
    KeyLookup,
    Missing,
}

/// A detected capability with one canonical method per behavior.
#[derive(Clone)]
pub struct CapabilitySet {
    handle: Arc<dyn PaymentCapability>,
    access: AccessEntryPoint,
    checkout_modal: bool,
}

impl CapabilitySet {
    /// Inspect the capability's entry points once and pick the preferred
    /// implementation of each behavior.
    pub fn detect(handle: Arc<dyn PaymentCapability>) -> Self {
        let entry_points = handle.entry_points();
        let access = if entry_points.keyholder_status {
            AccessEntryPoint::KeyholderStatus
        } else if entry_points.key_lookup {
            AccessEntryPoint::KeyLookup
        } else {
            AccessEntryPoint::Missing
        };
        Self {
            handle,
            access,
            checkout_modal: entry_points.checkout_modal,
        }
    }

    pub fn has_checkout_modal(&self) -> bool {
        self.checkout_modal
    }

    pub fn has_access_check(&self) -> bool {
        self.access != AccessEntryPoint::Missing
    }

    /// Ask the capability whether the viewer holds a key for `lock_id`.
    pub async fn check_access(&self, lock_id: &str) -> Result<AccessStatus, AccessCheckError> {
        let unlocked = match self.access {
            AccessEntryPoint::KeyholderStatus => self.handle.keyholder_status(lock_id).await?,
            AccessEntryPoint::KeyLookup => self
                .handle
                .get_key(lock_id)
                .await?
                .is_some_and(|key| !key.is_null()),
            AccessEntryPoint::Missing => return Err(AccessCheckError::Degraded),
        };
        Ok(if unlocked {
            AccessStatus::Unlocked
        } else {
            AccessStatus::Locked
        })
    }

    /// Open the provider's checkout modal.
    pub fn load_checkout(&self, config: &CheckoutConfig) -> Result<(), CapabilityError> {
        if !self.checkout_modal {
            return Err(CapabilityError::Unsupported("loadCheckoutModal"));
        }
        self.handle.load_checkout_modal(config)
    }
}

impl std::fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilitySet")
            .field("access", &self.access)
            .field("checkout_modal", &self.checkout_modal)
            .finish()
    }
}
