//! Error taxonomy of the payment flow.
//!
//! Only [`InitiationError`] and a confirmed listener outcome change the
//! flow state. Everything else is caught where it happens and reported to
//! the observer without interrupting the session.

use paylock_sdk::links::LinkError;
use paylock_sdk::objects::{AmountError, PaymentMethod};
use thiserror::Error;

use crate::host::{BridgeError, CapabilityError};

/// A checkout could not be started.
#[derive(Debug, Clone, Error)]
pub enum InitiationError {
    /// The readiness detector has not reported the capability as ready.
    #[error("payment system not ready")]
    CapabilityNotReady,

    /// The capability cannot service this payment method.
    #[error("{method} payments are not supported by the payment system")]
    MethodUnsupported {
        method: PaymentMethod,
        /// Manual instructions the viewer can follow instead.
        instructions: Option<String>,
    },

    /// The checkout modal entry point raised.
    #[error("checkout could not be opened: {0}")]
    Capability(#[from] CapabilityError),

    /// The hosted checkout link could not be built or opened.
    #[error("checkout link could not be opened: {0}")]
    Link(String),
}

impl From<LinkError> for InitiationError {
    fn from(value: LinkError) -> Self {
        InitiationError::Link(value.to_string())
    }
}

/// A best-effort UI affordance failed. Never changes flow state.
#[derive(Debug, Clone, Error)]
pub enum PeripheralError {
    #[error("failed to copy to clipboard: {0}")]
    Clipboard(BridgeError),

    #[error("failed to open link: {0}")]
    Link(BridgeError),

    #[error("failed to show alert: {0}")]
    Alert(BridgeError),
}

/// Errors reported to the flow observer.
#[derive(Debug, Clone, Error)]
pub enum FlowError {
    /// The capability never appeared; the contact fallback is offered.
    #[error("payment system unavailable after {attempts} attempts")]
    CapabilityUnavailable { attempts: u32 },

    #[error(transparent)]
    Initiation(#[from] InitiationError),

    #[error(transparent)]
    InvalidAmount(#[from] AmountError),

    #[error(transparent)]
    Peripheral(#[from] PeripheralError),

    /// The storefront has no item with this id.
    #[error("unknown item `{0}`")]
    UnknownItem(String),

    /// The command is not valid in the current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

impl FlowError {
    /// Plain-language message shown to the viewer.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::CapabilityUnavailable { .. } => {
                "The payment system could not be loaded. Please contact us to pay directly."
                    .to_string()
            }
            FlowError::Initiation(InitiationError::MethodUnsupported {
                instructions: Some(instructions),
                ..
            }) => instructions.clone(),
            FlowError::Initiation(e) => {
                format!("Payment failed: {e}. Please try again or contact support.")
            }
            FlowError::InvalidAmount(e) => e.to_string(),
            FlowError::UnknownItem(_) => "This item is not available.".to_string(),
            FlowError::Peripheral(e) => format!("{e}. Please try again."),
            FlowError::InvalidTransition { .. } => {
                "This action is not available right now.".to_string()
            }
        }
    }
}

/// The flow controller has stopped and no longer accepts commands.
#[derive(Debug, Clone, Copy, Error)]
#[error("payment flow is closed")]
pub struct FlowClosed;
