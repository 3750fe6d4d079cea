//! Event channel factories and handles.

use super::types::StatusSignal;
use tokio::sync::broadcast;

/// Default buffer size for event channels.
///
/// Status signals are rare; a lagging listener recovers on the next one.
pub const DEFAULT_CHANNEL_BUFFER: usize = 64;

/// Sender handle for StatusSignal events.
pub type StatusSignalSender = broadcast::Sender<StatusSignal>;
/// Receiver handle for StatusSignal events.
pub type StatusSignalReceiver = broadcast::Receiver<StatusSignal>;

/// Create a new StatusSignal channel.
///
/// Every receiver sees every signal; listeners filter by item id.
pub fn status_signal_channel() -> (StatusSignalSender, StatusSignalReceiver) {
    broadcast::channel(DEFAULT_CHANNEL_BUFFER)
}

/// The typed bus status signals are published on.
///
/// The host adapter publishes whatever the capability dispatches; the
/// completion listener subscribes and unsubscribes explicitly.
#[derive(Clone)]
pub struct StatusSignalBus {
    tx: StatusSignalSender,
}

impl StatusSignalBus {
    pub fn new() -> Self {
        let (tx, _) = status_signal_channel();
        Self { tx }
    }

    /// Publish a signal. Returns how many listeners received it.
    pub fn publish(&self, signal: StatusSignal) -> usize {
        self.tx.send(signal).unwrap_or(0)
    }

    pub fn subscribe(&self) -> StatusSignalReceiver {
        self.tx.subscribe()
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for StatusSignalBus {
    fn default() -> Self {
        Self::new()
    }
}
