//! Seams to the host page.
//!
//! The storefront runs inside a page owned by someone else: the payment
//! capability is injected by a third-party script, and UI affordances are
//! provided by the chat client when embedded. Both are modelled as traits
//! so the orchestrator can run against fakes.

pub mod capability;
pub mod surface;

pub use capability::{
    AccessCheckError, CapabilityError, CapabilitySet, EntryPoints, HostEnvironment,
    PaymentCapability,
};
pub use surface::{BridgeError, Browser, ChatBridge, Haptic, Surface, ViewerIdentity};
