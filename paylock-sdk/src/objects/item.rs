//! Payable items sold by the storefront.

use compact_str::CompactString;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::amount::CustomAmount;
use super::blockchains::{FiatCurrency, Network, Stablecoin};

/// A fixed-price item the viewer can pay for.
///
/// Items come from static configuration and never change while a session
/// is running. The `id` is also the key used by the payment capability and
/// by status-change signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayableItem {
    pub id: CompactString,
    pub display_name: String,
    /// Price in major units of `currency`.
    pub price: Decimal,
    pub currency: FiatCurrency,
    pub stablecoin: Stablecoin,
    pub network: Network,
    pub recipient_address: String,
    /// How long the entitlement lasts, if it expires at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
}

impl PayableItem {
    /// Price in minor units (cents). `None` if it does not fit an `i64`.
    pub fn price_minor_units(&self) -> Option<i64> {
        (self.price * Decimal::ONE_HUNDRED).trunc().to_i64()
    }

    /// Price with the currency symbol, e.g. `€50`.
    pub fn display_price(&self) -> String {
        format_price(self.currency, self.price)
    }
}

/// What the viewer is actually asked to pay in one session: an item,
/// optionally with its price replaced by a custom amount.
///
/// Recipient and network always come from the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub item: PayableItem,
    pub name: String,
    pub price: Decimal,
    pub custom: bool,
}

impl Quote {
    pub fn new(item: &PayableItem, price_override: Option<CustomAmount>) -> Self {
        match price_override {
            Some(amount) => {
                let price = amount.value();
                Self {
                    item: item.clone(),
                    name: format!(
                        "Custom Payment ({})",
                        format_price(item.currency, price)
                    ),
                    price,
                    custom: true,
                }
            }
            None => Self {
                item: item.clone(),
                name: item.display_name.clone(),
                price: item.price,
                custom: false,
            },
        }
    }

    pub fn display_price(&self) -> String {
        format_price(self.item.currency, self.price)
    }
}

/// Render `amount` with the symbol of `currency`, without trailing zeros.
pub fn format_price(currency: FiatCurrency, amount: Decimal) -> String {
    format!("{}{}", currency.symbol(), amount.normalize())
}
