//! Event system.
//!
//! # Event Flow
//!
//! 1. The host adapter publishes `StatusSignal` on the `StatusSignalBus`
//! 2. Each live `Subscription` of the `CompletionListener` decodes it,
//!    updates the `AccessCache` and notifies the `PaymentFlowController`
//! 3. The controller moves its session to `Succeeded`
//!
//! Signals are ephemeral; nothing is replayed to late subscribers.

pub mod channels;
pub mod types;

pub use channels::{
    DEFAULT_CHANNEL_BUFFER, StatusSignalBus, StatusSignalReceiver, StatusSignalSender,
    status_signal_channel,
};

pub use types::StatusSignal;
