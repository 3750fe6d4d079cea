use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::blockchains::Network;

/// How the viewer wants to fund the payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// On-chain stablecoin transfer from the viewer's wallet.
    #[serde(rename = "crypto")]
    Wallet,
    /// Card payment, converted to the stablecoin by the provider.
    #[serde(rename = "card")]
    Card,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Wallet => f.write_str("wallet"),
            PaymentMethod::Card => f.write_str("card"),
        }
    }
}

/// Call-to-action copy shown by the checkout modal in each of its states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToAction {
    pub default: String,
    pub expired: String,
    pub pending: String,
    pub confirmed: String,
}

impl Default for CallToAction {
    fn default() -> Self {
        Self {
            default: "Purchase access to continue".to_string(),
            expired: "Your access has expired. Please purchase again.".to_string(),
            pending: "Please complete your purchase...".to_string(),
            confirmed: "Access granted! You can now proceed.".to_string(),
        }
    }
}

/// Colors the checkout modal should use to blend into the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub primary_color: String,
    pub background_color: String,
    pub accent_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#333333".to_string(),
            background_color: "#FCF9F4".to_string(),
            accent_color: "#F0DAD0".to_string(),
        }
    }
}

/// Per-lock entry of a checkout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockDescriptor {
    pub network: Network,
    pub name: String,
}

/// Card funding options. Only sent for [`PaymentMethod::Card`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardOptions {
    pub enabled: bool,
    /// Convert the fiat charge into the stablecoin automatically.
    pub auto_convert: bool,
    pub currency: String,
}

/// Object handed to the payment capability's checkout modal.
///
/// ```json
/// {"locks":{"10-min":{"network":1,"name":"10 Minute Session"}},
///  "paymentMethods":["crypto"],"title":"Pay with Wallet - €50 EURC", ...}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutConfig {
    pub locks: BTreeMap<String, LockDescriptor>,
    pub icon: String,
    pub call_to_action: CallToAction,
    pub theme: Theme,
    pub payment_methods: Vec<PaymentMethod>,
    pub title: String,
    pub skip_recipient: bool,
    pub recipient: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<CreditCardOptions>,
}

impl CheckoutConfig {
    /// The single lock this configuration is for, if there is exactly one.
    pub fn lock(&self) -> Option<(&str, &LockDescriptor)> {
        let mut iter = self.locks.iter();
        match (iter.next(), iter.next()) {
            (Some((id, lock)), None) => Some((id.as_str(), lock)),
            _ => None,
        }
    }
}
