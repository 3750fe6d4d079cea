//! TOML file configuration structures.
//!
//! These structs directly map to the `paylock.toml` file format.

use paylock_sdk::objects::{CallToAction, FiatCurrency, Network, Stablecoin, Theme};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub checkout: CheckoutConfig,
    pub contact: ContactConfig,
    pub recipient: RecipientConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

/// Checkout provider section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Host of the hosted checkout page.
    #[serde(default = "default_checkout_host")]
    pub host: Url,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub call_to_action: CallToAction,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            host: default_checkout_host(),
            icon: String::new(),
            call_to_action: CallToAction::default(),
            theme: Theme::default(),
        }
    }
}

fn default_checkout_host() -> Url {
    Url::parse("https://app.unlock-protocol.com").expect("valid default checkout host")
}

/// Who to contact when paying through a human.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Chat handle, with or without the leading `@`.
    pub handle: String,
    #[serde(default = "default_chat_host")]
    pub chat_host: Url,
}

fn default_chat_host() -> Url {
    Url::parse("https://t.me/").expect("valid default chat host")
}

/// Defaults applied to every item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientConfig {
    /// Address receiving the stablecoin.
    pub address: String,
    /// EVM chain id, e.g. `1` for Ethereum mainnet.
    pub network: Network,
    #[serde(default = "default_stablecoin")]
    pub stablecoin: Stablecoin,
    #[serde(default = "default_currency")]
    pub currency: FiatCurrency,
}

fn default_stablecoin() -> Stablecoin {
    Stablecoin::Eurc
}

fn default_currency() -> FiatCurrency {
    FiatCurrency::Eur
}

/// Timings of the payment flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Number of capability probes before giving up.
    #[serde(default = "default_readiness_attempts")]
    pub readiness_attempts: u32,
    #[serde(default = "default_readiness_interval_ms")]
    pub readiness_interval_ms: u64,
    /// How long to wait for the completion signal after a checkout starts.
    #[serde(default = "default_completion_window_secs")]
    pub completion_window_secs: u64,
    /// Keep reporting unlocks after the first one.
    #[serde(default)]
    pub keep_listening: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            readiness_attempts: default_readiness_attempts(),
            readiness_interval_ms: default_readiness_interval_ms(),
            completion_window_secs: default_completion_window_secs(),
            keep_listening: false,
        }
    }
}

fn default_readiness_attempts() -> u32 {
    50
}

fn default_readiness_interval_ms() -> u64 {
    100
}

fn default_completion_window_secs() -> u64 {
    300
}

/// One payable item. Recipient fields override the `[recipient]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemConfig {
    /// Lock id, also used by status signals.
    pub id: String,
    pub name: String,
    /// Price in major units, e.g. `50` or `"12.50"`.
    pub price: Decimal,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub network: Option<Network>,
    #[serde(default)]
    pub stablecoin: Option<Stablecoin>,
    #[serde(default)]
    pub currency: Option<FiatCurrency>,
}
