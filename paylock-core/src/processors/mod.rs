//! Processors of the payment flow.
//!
//! - `ReadinessDetector`: polls the host for the payment capability
//! - `CheckoutInitiator`: builds the checkout request and launches it
//! - `CompletionListener`: turns status signals into per-item unlocks
//! - `PaymentFlowController`: owns the session and drives the others

pub mod controller;
pub mod initiator;
pub mod listener;
pub mod readiness;

pub use controller::{
    FlowHandle, FlowHost, FlowObserver, FlowSnapshot, FlowState, PaymentFlowController, SessionId,
};
pub use initiator::{CheckoutInitiator, Initiation, build_checkout_config};
pub use listener::{CompletionListener, Subscription, UnlockFilter};
pub use readiness::{Readiness, ReadinessDetector};
