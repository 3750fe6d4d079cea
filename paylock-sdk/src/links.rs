//! Deep links and canned messages used outside the checkout modal.
//!
//! Three kinds of link leave the storefront:
//!
//! * **Hosted checkout** (modal entry point missing):
//!   `{checkout_host}/checkout?lock={id}&network={chain_id}&recipient={address}`
//!
//! * **Contact** (capability never became ready, or the viewer prefers a
//!   human): `{chat_host}/{handle}?text={form-encoded message}`
//!
//! * **Explorer**: the recipient's address page on the network's block
//!   explorer.

use url::Url;

use crate::config::{CheckoutSettings, ContactConfig};
use crate::objects::Quote;

/// Errors produced while building links.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Hosted checkout page for the quote's lock.
pub fn checkout_link(settings: &CheckoutSettings, quote: &Quote) -> Result<Url, LinkError> {
    let mut url = settings.host.join("checkout")?;
    url.query_pairs_mut()
        .append_pair("lock", &quote.item.id)
        .append_pair("network", &quote.item.network.chain_id().to_string())
        .append_pair("recipient", &quote.item.recipient_address);
    Ok(url)
}

/// Message pre-filled in the chat when paying through the contact.
pub fn contact_message(quote: &Quote) -> String {
    let coin = quote.item.stablecoin.symbol();
    if quote.custom {
        format!(
            "Hi! I'd like to make a custom payment of {} {coin}.\n\nPlease provide payment instructions.",
            quote.display_price()
        )
    } else {
        format!(
            "Hi! I'd like to purchase: {} ({} {coin})\n\nPlease provide payment instructions.",
            quote.name,
            quote.display_price()
        )
    }
}

/// Chat deep link opening a conversation with the contact, message pre-filled.
pub fn contact_link(contact: &ContactConfig, quote: &Quote) -> Result<Url, LinkError> {
    let message = contact_message(quote);
    let mut url = contact.chat_host.join(&contact.handle)?;
    url.query_pairs_mut().append_pair("text", &message);
    Ok(url)
}

/// Short prompt shown when the payment system is unavailable.
pub fn contact_prompt(contact: &ContactConfig, quote: &Quote) -> String {
    format!(
        "To purchase {} for {}, please contact {} on Telegram.",
        quote.name,
        quote.display_price(),
        contact.display_handle()
    )
}

/// Instructions shown when a card payment cannot be started in-app.
pub fn card_instructions(contact: &ContactConfig, quote: &Quote) -> String {
    format!(
        "To pay {} with credit card:\n\n1. The payment will automatically purchase {} tokens\n2. {} will be sent to: {}\n3. Contact {} on Telegram for assistance",
        quote.display_price(),
        quote.item.stablecoin,
        quote.item.stablecoin,
        quote.item.recipient_address,
        contact.display_handle()
    )
}

/// Block explorer page of the quote's recipient.
pub fn explorer_link(quote: &Quote) -> Result<Url, LinkError> {
    Ok(quote
        .item
        .network
        .address_url(&quote.item.recipient_address)?)
}
