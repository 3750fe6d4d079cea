//! Checkout Initiator.
//!
//! Turns a quote and a payment method into a checkout request and hands it
//! to the payment capability. When the capability lacks the modal entry
//! point, wallet payments fall back to the hosted checkout page; card
//! payments cannot be started without the modal and are reported with
//! manual instructions instead.

use paylock_sdk::config::{CheckoutSettings, StorefrontConfig};
use paylock_sdk::links::{card_instructions, checkout_link};
use paylock_sdk::objects::{
    CallToAction, CheckoutConfig, CreditCardOptions, CustomAmount, LockDescriptor, PayableItem,
    PaymentMethod, Quote,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use crate::error::InitiationError;
use crate::host::{CapabilitySet, Haptic, Surface};

/// How a checkout was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initiation {
    /// The capability's modal was loaded with this configuration.
    Modal(CheckoutConfig),
    /// The hosted checkout page was opened.
    HostedCheckout(Url),
}

/// Builds checkout requests and launches them.
#[derive(Clone)]
pub struct CheckoutInitiator {
    storefront: Arc<StorefrontConfig>,
    surface: Surface,
}

impl CheckoutInitiator {
    pub fn new(storefront: Arc<StorefrontConfig>, surface: Surface) -> Self {
        Self {
            storefront,
            surface,
        }
    }

    /// Start a checkout for `item`, optionally at a custom price.
    ///
    /// `capabilities` is `None` while the readiness detector has not
    /// reported the capability as ready.
    pub fn initiate(
        &self,
        item: &PayableItem,
        method: PaymentMethod,
        price_override: Option<CustomAmount>,
        capabilities: Option<&CapabilitySet>,
    ) -> Result<Initiation, InitiationError> {
        self.initiate_quote(&Quote::new(item, price_override), method, capabilities)
    }

    /// Start a checkout for an already priced quote.
    pub fn initiate_quote(
        &self,
        quote: &Quote,
        method: PaymentMethod,
        capabilities: Option<&CapabilitySet>,
    ) -> Result<Initiation, InitiationError> {
        let result = self.launch(quote, method, capabilities);
        if let Err(e) = &result {
            warn!(item_id = %quote.item.id, %method, error = %e, "Checkout initiation failed");
            self.surface.haptic(Haptic::Error);
        }
        result
    }

    fn launch(
        &self,
        quote: &Quote,
        method: PaymentMethod,
        capabilities: Option<&CapabilitySet>,
    ) -> Result<Initiation, InitiationError> {
        let Some(capabilities) = capabilities else {
            return Err(InitiationError::CapabilityNotReady);
        };

        self.surface.haptic(Haptic::LightImpact);

        if capabilities.has_checkout_modal() {
            let config = self.checkout_config(quote, method);
            capabilities.load_checkout(&config)?;
            info!(item_id = %quote.item.id, %method, price = %quote.price, "Checkout modal loaded");
            return Ok(Initiation::Modal(config));
        }

        match method {
            PaymentMethod::Wallet => {
                let url = checkout_link(&self.storefront.checkout, quote)?;
                self.surface
                    .open_link(&url)
                    .map_err(|e| InitiationError::Link(e.to_string()))?;
                info!(item_id = %quote.item.id, %url, "Hosted checkout opened");
                Ok(Initiation::HostedCheckout(url))
            }
            PaymentMethod::Card => Err(InitiationError::MethodUnsupported {
                method,
                instructions: Some(card_instructions(&self.storefront.contact, quote)),
            }),
        }
    }

    /// The configuration object handed to the checkout modal.
    pub fn checkout_config(&self, quote: &Quote, method: PaymentMethod) -> CheckoutConfig {
        build_checkout_config(&self.storefront.checkout, quote, method)
    }
}

/// Build the checkout modal configuration for `quote`.
///
/// Card payments get their own title and call to action, and ask the
/// provider to convert the card payment into the item's stablecoin.
pub fn build_checkout_config(
    settings: &CheckoutSettings,
    quote: &Quote,
    method: PaymentMethod,
) -> CheckoutConfig {
    let price = quote.display_price();

    let mut locks = BTreeMap::new();
    locks.insert(
        quote.item.id.to_string(),
        LockDescriptor {
            network: quote.item.network,
            name: quote.name.clone(),
        },
    );

    let (title, call_to_action, credit_card) = match method {
        PaymentMethod::Wallet => (
            format!("Pay with Wallet - {price} {}", quote.item.stablecoin),
            settings.call_to_action.clone(),
            None,
        ),
        PaymentMethod::Card => (
            format!("Credit Card Payment - {price}"),
            CallToAction {
                default: format!("Pay {price} with Credit Card"),
                ..settings.call_to_action.clone()
            },
            Some(CreditCardOptions {
                enabled: true,
                auto_convert: true,
                currency: quote.item.currency.code().to_string(),
            }),
        ),
    };

    CheckoutConfig {
        locks,
        icon: settings.icon.clone(),
        call_to_action,
        theme: settings.theme.clone(),
        payment_methods: vec![method],
        title,
        skip_recipient: false,
        recipient: quote.item.recipient_address.clone(),
        credit_card,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::EntryPoints;
    use crate::testing::{
        FakeCapability, RecordingBridge, RecordingBrowser, UiCall, storefront,
    };
    use paylock_sdk::objects::Network;

    fn modal_capability() -> Arc<FakeCapability> {
        FakeCapability::new(EntryPoints {
            checkout_modal: true,
            keyholder_status: true,
            key_lookup: false,
        })
    }

    fn plain_surface() -> (Surface, Arc<RecordingBrowser>) {
        let browser = RecordingBrowser::new();
        (Surface::new(browser.clone()), browser)
    }

    #[test]
    fn test_wallet_checkout_loads_modal() {
        let storefront = storefront();
        let item = storefront.item("10-min").unwrap().clone();
        let capability = modal_capability();
        let set = CapabilitySet::detect(capability.clone());
        let (surface, _) = plain_surface();
        let initiator = CheckoutInitiator::new(storefront, surface);

        let initiation = initiator
            .initiate(&item, PaymentMethod::Wallet, None, Some(&set))
            .unwrap();

        let loaded = capability.loaded_configs();
        assert_eq!(loaded.len(), 1);
        let config = &loaded[0];
        assert_eq!(initiation, Initiation::Modal(config.clone()));
        assert_eq!(config.locks["10-min"].network, Network::Ethereum);
        assert_eq!(config.recipient, item.recipient_address);
        assert!(config.title.contains("€50"));
        assert_eq!(config.payment_methods, vec![PaymentMethod::Wallet]);
        assert!(config.credit_card.is_none());
    }

    #[test]
    fn test_card_checkout_config() {
        let storefront = storefront();
        let item = storefront.item("booking-fee").unwrap().clone();
        let (surface, _) = plain_surface();
        let initiator = CheckoutInitiator::new(storefront, surface);

        let config = initiator.checkout_config(&Quote::new(&item, None), PaymentMethod::Card);

        assert_eq!(config.title, "Credit Card Payment - €100");
        assert_eq!(config.call_to_action.default, "Pay €100 with Credit Card");
        assert_eq!(config.payment_methods, vec![PaymentMethod::Card]);
        let card = config.credit_card.unwrap();
        assert!(card.auto_convert);
        assert_eq!(card.currency, "EUR");
    }

    #[test]
    fn test_custom_amount_replaces_name_and_price() {
        let storefront = storefront();
        let item = storefront.item("10-min").unwrap().clone();
        let (surface, _) = plain_surface();
        let initiator = CheckoutInitiator::new(storefront, surface);
        let amount = CustomAmount::parse("75").unwrap();

        let config = initiator
            .checkout_config(&Quote::new(&item, Some(amount)), PaymentMethod::Wallet);

        assert_eq!(config.locks["10-min"].name, "Custom Payment (€75)");
        assert_eq!(config.title, "Pay with Wallet - €75 EURC");
        assert_eq!(config.recipient, item.recipient_address);
        assert_eq!(config.locks["10-min"].network, item.network);
    }

    #[test]
    fn test_wallet_falls_back_to_hosted_checkout() {
        let storefront = storefront();
        let item = storefront.item("10-min").unwrap().clone();
        let set = CapabilitySet::detect(FakeCapability::new(EntryPoints {
            keyholder_status: true,
            ..EntryPoints::default()
        }));
        let browser = RecordingBrowser::new();
        let bridge = RecordingBridge::new();
        let surface = Surface::new(browser.clone()).with_bridge(bridge.clone());
        let initiator = CheckoutInitiator::new(storefront, surface);

        let initiation = initiator
            .initiate(&item, PaymentMethod::Wallet, None, Some(&set))
            .unwrap();

        let Initiation::HostedCheckout(url) = initiation else {
            panic!("expected hosted checkout");
        };
        assert_eq!(url.path(), "/checkout");
        assert!(url.as_str().contains("lock=10-min"));
        assert!(url.as_str().contains("network=1"));
        assert!(bridge.calls().contains(&UiCall::OpenLink(url.to_string())));
        assert!(bridge.calls().contains(&UiCall::Haptic(Haptic::LightImpact)));
        assert!(browser.calls().is_empty());
    }

    #[test]
    fn test_card_without_modal_is_unsupported() {
        let storefront = storefront();
        let item = storefront.item("10-min").unwrap().clone();
        let set = CapabilitySet::detect(FakeCapability::new(EntryPoints::default()));
        let (surface, browser) = plain_surface();
        let initiator = CheckoutInitiator::new(storefront, surface);

        let err = initiator
            .initiate(&item, PaymentMethod::Card, None, Some(&set))
            .unwrap_err();

        match err {
            InitiationError::MethodUnsupported {
                method,
                instructions: Some(instructions),
            } => {
                assert_eq!(method, PaymentMethod::Card);
                assert!(instructions.contains(&item.recipient_address));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(browser.calls().is_empty());
    }

    #[test]
    fn test_not_ready_is_an_initiation_error() {
        let storefront = storefront();
        let item = storefront.item("10-min").unwrap().clone();
        let bridge = RecordingBridge::new();
        let surface = Surface::new(RecordingBrowser::new()).with_bridge(bridge.clone());
        let initiator = CheckoutInitiator::new(storefront, surface);

        let err = initiator
            .initiate(&item, PaymentMethod::Wallet, None, None)
            .unwrap_err();

        assert!(matches!(err, InitiationError::CapabilityNotReady));
        assert_eq!(bridge.calls(), vec![UiCall::Haptic(Haptic::Error)]);
    }

    #[test]
    fn test_modal_failure_is_reported() {
        let storefront = storefront();
        let item = storefront.item("10-min").unwrap().clone();
        let capability = modal_capability();
        capability.fail_checkout();
        let set = CapabilitySet::detect(capability);
        let (surface, _) = plain_surface();
        let initiator = CheckoutInitiator::new(storefront, surface);

        let err = initiator
            .initiate(&item, PaymentMethod::Wallet, None, Some(&set))
            .unwrap_err();

        assert!(matches!(err, InitiationError::Capability(_)));
    }
}
