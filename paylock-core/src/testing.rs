//! Fake host seams shared by the unit tests.

use async_trait::async_trait;
use paylock_sdk::config::{CheckoutSettings, ContactConfig, StorefrontConfig};
use paylock_sdk::objects::{
    CallToAction, CheckoutConfig, FiatCurrency, Network, PayableItem, Stablecoin, Theme,
};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

use crate::error::FlowError;
use crate::host::{
    BridgeError, Browser, CapabilityError, ChatBridge, EntryPoints, Haptic, HostEnvironment,
    PaymentCapability,
};
use crate::processors::{FlowObserver, FlowSnapshot, FlowState};

pub const RECIPIENT: &str = "0xfda02035c04ab66769aedabcbeb3b26654e0d787";

/// Two items: a €50 "10-min" session and a €100 "booking-fee".
pub fn storefront() -> Arc<StorefrontConfig> {
    let item = |id: &str, name: &str, price: i64, duration_seconds: Option<u64>| PayableItem {
        id: id.into(),
        display_name: name.to_string(),
        price: Decimal::from(price),
        currency: FiatCurrency::Eur,
        stablecoin: Stablecoin::Eurc,
        network: Network::Ethereum,
        recipient_address: RECIPIENT.to_string(),
        duration_seconds,
    };
    Arc::new(StorefrontConfig {
        checkout: CheckoutSettings {
            host: Url::parse("https://app.unlock-protocol.com").unwrap(),
            icon: "https://example.com/icon.png".to_string(),
            call_to_action: CallToAction::default(),
            theme: Theme::default(),
        },
        contact: ContactConfig {
            handle: "AinoReira".to_string(),
            chat_host: Url::parse("https://t.me/").unwrap(),
        },
        items: vec![
            item("10-min", "10 Minute Session", 50, Some(600)),
            item("booking-fee", "Booking Fee", 100, None),
        ],
    })
}

/// Scriptable payment capability.
#[derive(Default)]
pub struct FakeCapability {
    entry_points: EntryPoints,
    granted: Mutex<HashSet<String>>,
    loaded: Mutex<Vec<CheckoutConfig>>,
    keyholder_calls: AtomicU32,
    key_lookup_calls: AtomicU32,
    fail_access: AtomicBool,
    fail_checkout: AtomicBool,
    access_delay: Mutex<Option<Duration>>,
}

impl FakeCapability {
    pub fn new(entry_points: EntryPoints) -> Arc<Self> {
        Arc::new(Self {
            entry_points,
            ..Self::default()
        })
    }

    /// The viewer holds a key for `lock_id`.
    pub fn grant(&self, lock_id: &str) {
        self.granted.lock().unwrap().insert(lock_id.to_string());
    }

    pub fn fail_access_checks(&self) {
        self.fail_access.store(true, Ordering::SeqCst);
    }

    /// Access queries take `delay` before answering.
    pub fn delay_access_checks(&self, delay: Duration) {
        *self.access_delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_checkout(&self) {
        self.fail_checkout.store(true, Ordering::SeqCst);
    }

    pub fn keyholder_calls(&self) -> u32 {
        self.keyholder_calls.load(Ordering::SeqCst)
    }

    pub fn key_lookup_calls(&self) -> u32 {
        self.key_lookup_calls.load(Ordering::SeqCst)
    }

    /// Every configuration the checkout modal was loaded with.
    pub fn loaded_configs(&self) -> Vec<CheckoutConfig> {
        self.loaded.lock().unwrap().clone()
    }

    fn access_answer(&self, lock_id: &str) -> Result<bool, CapabilityError> {
        if self.fail_access.load(Ordering::SeqCst) {
            return Err(CapabilityError::Call("network error".to_string()));
        }
        Ok(self.granted.lock().unwrap().contains(lock_id))
    }
}

#[async_trait]
impl PaymentCapability for FakeCapability {
    fn entry_points(&self) -> EntryPoints {
        self.entry_points
    }

    async fn keyholder_status(&self, lock_id: &str) -> Result<bool, CapabilityError> {
        self.keyholder_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.access_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.access_answer(lock_id)
    }

    async fn get_key(&self, lock_id: &str) -> Result<Option<serde_json::Value>, CapabilityError> {
        self.key_lookup_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .access_answer(lock_id)?
            .then(|| serde_json::json!({"lock": lock_id})))
    }

    fn load_checkout_modal(&self, config: &CheckoutConfig) -> Result<(), CapabilityError> {
        if self.fail_checkout.load(Ordering::SeqCst) {
            return Err(CapabilityError::Call("modal crashed".to_string()));
        }
        self.loaded.lock().unwrap().push(config.clone());
        Ok(())
    }
}

/// Host page whose capability shows up on a given probe, or never.
pub struct FakeHost {
    capability: Mutex<Option<Arc<dyn PaymentCapability>>>,
    appears_on_probe: u32,
    probes: AtomicU32,
}

impl FakeHost {
    pub fn absent() -> Arc<Self> {
        Arc::new(Self {
            capability: Mutex::new(None),
            appears_on_probe: 1,
            probes: AtomicU32::new(0),
        })
    }

    pub fn present(capability: Arc<dyn PaymentCapability>) -> Arc<Self> {
        Self::appearing_after(1, capability)
    }

    /// The capability is returned from the `probe`-th probe on.
    pub fn appearing_after(probe: u32, capability: Arc<dyn PaymentCapability>) -> Arc<Self> {
        Arc::new(Self {
            capability: Mutex::new(Some(capability)),
            appears_on_probe: probe,
            probes: AtomicU32::new(0),
        })
    }

    pub fn install(&self, capability: Arc<dyn PaymentCapability>) {
        *self.capability.lock().unwrap() = Some(capability);
    }

    pub fn probes(&self) -> u32 {
        self.probes.load(Ordering::SeqCst)
    }
}

impl HostEnvironment for FakeHost {
    fn capability(&self) -> Option<Arc<dyn PaymentCapability>> {
        let probe = self.probes.fetch_add(1, Ordering::SeqCst) + 1;
        if probe < self.appears_on_probe {
            return None;
        }
        self.capability.lock().unwrap().clone()
    }
}

/// A UI call observed by the recording seams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCall {
    OpenLink(String),
    Alert(String),
    Haptic(Haptic),
    Clipboard(String),
}

#[derive(Default)]
pub struct RecordingBrowser {
    calls: Mutex<Vec<UiCall>>,
    fail_clipboard: AtomicBool,
}

impl RecordingBrowser {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<UiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_clipboard(&self) {
        self.fail_clipboard.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: UiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Browser for RecordingBrowser {
    fn open_window(&self, url: &Url) -> Result<(), BridgeError> {
        self.record(UiCall::OpenLink(url.to_string()));
        Ok(())
    }

    fn alert(&self, message: &str) -> Result<(), BridgeError> {
        self.record(UiCall::Alert(message.to_string()));
        Ok(())
    }

    fn write_clipboard(&self, text: &str) -> Result<(), BridgeError> {
        if self.fail_clipboard.load(Ordering::SeqCst) {
            return Err(BridgeError::Failed("clipboard denied".to_string()));
        }
        self.record(UiCall::Clipboard(text.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingBridge {
    calls: Mutex<Vec<UiCall>>,
}

impl RecordingBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<UiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: UiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ChatBridge for RecordingBridge {
    fn haptic(&self, feedback: Haptic) -> Result<(), BridgeError> {
        self.record(UiCall::Haptic(feedback));
        Ok(())
    }

    fn show_alert(&self, message: &str) -> Result<(), BridgeError> {
        self.record(UiCall::Alert(message.to_string()));
        Ok(())
    }

    fn open_link(&self, url: &Url) -> Result<(), BridgeError> {
        self.record(UiCall::OpenLink(url.to_string()));
        Ok(())
    }
}

/// Records every observer callback.
#[derive(Default)]
pub struct RecordingObserver {
    states: Mutex<Vec<FlowState>>,
    successes: AtomicU32,
    errors: Mutex<Vec<FlowError>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn states(&self) -> Vec<FlowState> {
        self.states.lock().unwrap().clone()
    }

    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn errors(&self) -> Vec<FlowError> {
        self.errors.lock().unwrap().clone()
    }
}

impl FlowObserver for RecordingObserver {
    fn on_state_changed(&self, snapshot: &FlowSnapshot) {
        self.states.lock().unwrap().push(snapshot.state);
    }

    fn on_success(&self, _snapshot: &FlowSnapshot) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, error: &FlowError) {
        self.errors.lock().unwrap().push(error.clone());
    }
}
