//! In-memory host page for the `simulate` command.
//!
//! The capability shows up after a configurable delay (or never), exposes
//! the checkout modal unless disabled, and "completes" every started
//! payment by publishing an unlock signal after another delay.

use async_trait::async_trait;
use paylock_core::events::{StatusSignal, StatusSignalBus};
use paylock_core::host::{
    BridgeError, Browser, CapabilityError, ChatBridge, EntryPoints, Haptic, HostEnvironment,
    PaymentCapability, ViewerIdentity,
};
use paylock_sdk::objects::{CheckoutConfig, StatusChangedPayload};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Behavior of the simulated host.
#[derive(Debug, Clone, Copy)]
pub struct SimOptions {
    /// Delay before the capability appears; `None` means never.
    pub capability_delay: Option<Duration>,
    pub checkout_modal: bool,
    /// Delay between starting a checkout and the unlock signal; `None`
    /// means the viewer never pays.
    pub unlock_after: Option<Duration>,
}

/// Emits the unlock signal of a started payment.
#[derive(Clone)]
pub struct PaymentScript {
    bus: StatusSignalBus,
    unlock_after: Option<Duration>,
}

impl PaymentScript {
    pub fn new(bus: StatusSignalBus, unlock_after: Option<Duration>) -> Self {
        Self { bus, unlock_after }
    }

    /// A hosted checkout page counts as a started payment.
    fn link_opened(&self, url: &Url) {
        if url.path() != "/checkout" {
            return;
        }
        if let Some((_, lock_id)) = url.query_pairs().find(|(key, _)| key == "lock") {
            self.payment_started(&lock_id);
        }
    }

    fn payment_started(&self, lock_id: &str) {
        let Some(after) = self.unlock_after else {
            info!(lock_id, "Payment started, no unlock scheduled");
            return;
        };
        let bus = self.bus.clone();
        let payload = StatusChangedPayload::single(lock_id, "unlocked");
        info!(lock_id, ?after, "Payment started, unlock scheduled");
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let delivered = bus.publish(StatusSignal::from(payload));
            info!(delivered, "Unlock signal emitted");
        });
    }
}

pub struct SimCapability {
    checkout_modal: bool,
    script: PaymentScript,
}

#[async_trait]
impl PaymentCapability for SimCapability {
    fn entry_points(&self) -> EntryPoints {
        EntryPoints {
            checkout_modal: self.checkout_modal,
            keyholder_status: true,
            key_lookup: false,
        }
    }

    async fn keyholder_status(&self, lock_id: &str) -> Result<bool, CapabilityError> {
        debug!(lock_id, "Keyholder status queried");
        Ok(false)
    }

    fn load_checkout_modal(&self, config: &CheckoutConfig) -> Result<(), CapabilityError> {
        info!(
            title = %config.title,
            recipient = %config.recipient,
            "Checkout modal opened"
        );
        let Some((lock_id, _)) = config.lock() else {
            return Err(CapabilityError::Call("checkout has no lock".to_string()));
        };
        self.script.payment_started(lock_id);
        Ok(())
    }
}

pub struct SimHost {
    ready_at: Option<Instant>,
    capability: Arc<dyn PaymentCapability>,
}

impl SimHost {
    pub fn new(options: SimOptions, script: PaymentScript) -> Self {
        Self {
            ready_at: options.capability_delay.map(|delay| Instant::now() + delay),
            capability: Arc::new(SimCapability {
                checkout_modal: options.checkout_modal,
                script,
            }),
        }
    }
}

impl HostEnvironment for SimHost {
    fn capability(&self) -> Option<Arc<dyn PaymentCapability>> {
        let ready_at = self.ready_at?;
        if Instant::now() < ready_at {
            return None;
        }
        Some(self.capability.clone())
    }
}

/// A plain page that logs what it is asked to do.
pub struct ConsoleBrowser {
    script: PaymentScript,
}

impl ConsoleBrowser {
    pub fn new(script: PaymentScript) -> Self {
        Self { script }
    }
}

impl Browser for ConsoleBrowser {
    fn open_window(&self, url: &Url) -> Result<(), BridgeError> {
        info!(%url, "Opening link");
        self.script.link_opened(url);
        Ok(())
    }

    fn alert(&self, message: &str) -> Result<(), BridgeError> {
        warn!("Alert: {message}");
        Ok(())
    }

    fn write_clipboard(&self, text: &str) -> Result<(), BridgeError> {
        info!(text, "Copied to clipboard");
        Ok(())
    }
}

/// A chat client bridge that logs what it is asked to do.
pub struct ConsoleBridge {
    script: PaymentScript,
}

impl ConsoleBridge {
    pub fn new(script: PaymentScript) -> Self {
        Self { script }
    }
}

impl ChatBridge for ConsoleBridge {
    fn haptic(&self, feedback: Haptic) -> Result<(), BridgeError> {
        debug!(?feedback, "Haptic feedback");
        Ok(())
    }

    fn show_alert(&self, message: &str) -> Result<(), BridgeError> {
        warn!("Alert: {message}");
        Ok(())
    }

    fn open_link(&self, url: &Url) -> Result<(), BridgeError> {
        info!(%url, "Opening link in chat client");
        self.script.link_opened(url);
        Ok(())
    }

    fn viewer(&self) -> Option<ViewerIdentity> {
        Some(ViewerIdentity {
            name: "Simulated Viewer".to_string(),
            handle: None,
            avatar_url: None,
        })
    }
}
