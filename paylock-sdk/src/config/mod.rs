//! Storefront configuration types.
//!
//! These types represent the validated runtime configuration handed to the
//! orchestrator. Loading and parsing the file format is handled by the
//! binary crate.

use crate::objects::{CallToAction, PayableItem, Theme};
use url::Url;

/// Checkout provider settings shared by every item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Host serving the hosted checkout page used when the modal entry
    /// point is missing.
    pub host: Url,
    /// Icon shown in the checkout modal.
    pub icon: String,
    pub call_to_action: CallToAction,
    pub theme: Theme,
}

/// Where the viewer is sent when paying through a human instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactConfig {
    /// Chat handle without the leading `@`.
    pub handle: String,
    /// Base URL of chat deep links, e.g. `https://t.me/`.
    pub chat_host: Url,
}

impl ContactConfig {
    /// Handle as displayed to the viewer, e.g. `@AinoReira`.
    pub fn display_handle(&self) -> String {
        format!("@{}", self.handle)
    }
}

/// The complete storefront: provider settings, contact and catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub checkout: CheckoutSettings,
    pub contact: ContactConfig,
    pub items: Vec<PayableItem>,
}

impl StorefrontConfig {
    /// Look up an item by id.
    pub fn item(&self, id: &str) -> Option<&PayableItem> {
        self.items.iter().find(|item| item.id == id)
    }
}
