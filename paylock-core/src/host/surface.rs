//! UI affordances of the host: chat-client bridge and plain page fallback.
//!
//! Every affordance here is best-effort. Haptics are fire-and-forget;
//! alerts, links and clipboard writes report failures as
//! [`PeripheralError`] so callers can surface them without aborting a
//! payment session.

use std::sync::Arc;
use thiserror::Error;
use tracing::trace;
use url::Url;

use crate::error::PeripheralError;

/// Tactile feedback the chat client can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    /// Light impact, played when the viewer starts a payment.
    LightImpact,
    /// Success notification.
    Success,
    /// Error notification.
    Error,
}

/// Errors reported by host UI seams.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    #[error("{0} is not available in this host")]
    Unavailable(&'static str),

    #[error("{0}")]
    Failed(String),
}

/// Ambient identity of the viewer as exposed by the chat client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerIdentity {
    pub name: String,
    pub handle: Option<String>,
    pub avatar_url: Option<Url>,
}

/// The chat client's mini-app bridge. Every method is optional.
pub trait ChatBridge: Send + Sync {
    fn haptic(&self, _feedback: Haptic) -> Result<(), BridgeError> {
        Err(BridgeError::Unavailable("haptic feedback"))
    }

    fn show_alert(&self, _message: &str) -> Result<(), BridgeError> {
        Err(BridgeError::Unavailable("alert"))
    }

    fn open_link(&self, _url: &Url) -> Result<(), BridgeError> {
        Err(BridgeError::Unavailable("link opener"))
    }

    /// Open a link inside the chat client (conversation deep links).
    fn open_chat_link(&self, url: &Url) -> Result<(), BridgeError> {
        self.open_link(url)
    }

    fn viewer(&self) -> Option<ViewerIdentity> {
        None
    }
}

/// The generic page environment, used when no chat bridge is present.
pub trait Browser: Send + Sync {
    /// Open `url` in a new window.
    fn open_window(&self, url: &Url) -> Result<(), BridgeError>;

    /// Native blocking alert.
    fn alert(&self, message: &str) -> Result<(), BridgeError>;

    fn write_clipboard(&self, text: &str) -> Result<(), BridgeError>;
}

/// Routes each affordance to the chat bridge when embedded, and to the
/// browser otherwise.
#[derive(Clone)]
pub struct Surface {
    bridge: Option<Arc<dyn ChatBridge>>,
    browser: Arc<dyn Browser>,
}

impl Surface {
    /// A surface running in a plain page.
    pub fn new(browser: Arc<dyn Browser>) -> Self {
        Self {
            bridge: None,
            browser,
        }
    }

    /// Attach the chat-client bridge.
    pub fn with_bridge(mut self, bridge: Arc<dyn ChatBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Whether the storefront runs inside the chat client.
    pub fn is_embedded(&self) -> bool {
        self.bridge.is_some()
    }

    pub fn viewer(&self) -> Option<ViewerIdentity> {
        self.bridge.as_ref().and_then(|bridge| bridge.viewer())
    }

    /// Play haptic feedback if the host supports it. Never fails.
    pub fn haptic(&self, feedback: Haptic) {
        let Some(bridge) = &self.bridge else {
            return;
        };
        if let Err(e) = bridge.haptic(feedback) {
            trace!(?feedback, error = %e, "Haptic feedback skipped");
        }
    }

    /// Show a dismissible message.
    pub fn alert(&self, message: &str) -> Result<(), PeripheralError> {
        match &self.bridge {
            Some(bridge) => bridge.show_alert(message),
            None => self.browser.alert(message),
        }
        .map_err(PeripheralError::Alert)
    }

    /// Open an external link.
    pub fn open_link(&self, url: &Url) -> Result<(), PeripheralError> {
        match &self.bridge {
            Some(bridge) => bridge.open_link(url),
            None => self.browser.open_window(url),
        }
        .map_err(PeripheralError::Link)
    }

    /// Open a chat deep link (conversation with the contact).
    pub fn open_chat_link(&self, url: &Url) -> Result<(), PeripheralError> {
        match &self.bridge {
            Some(bridge) => bridge.open_chat_link(url),
            None => self.browser.open_window(url),
        }
        .map_err(PeripheralError::Link)
    }

    pub fn copy_to_clipboard(&self, text: &str) -> Result<(), PeripheralError> {
        self.browser
            .write_clipboard(text)
            .map_err(PeripheralError::Clipboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingBrowser, RecordingBridge, UiCall};

    #[test]
    fn test_routes_to_bridge_when_embedded() {
        let browser = RecordingBrowser::new();
        let bridge = RecordingBridge::new();
        let surface = Surface::new(browser.clone()).with_bridge(bridge.clone());
        let url = Url::parse("https://example.com/").unwrap();

        surface.open_link(&url).unwrap();
        surface.alert("hello").unwrap();
        surface.haptic(Haptic::Success);

        assert_eq!(
            bridge.calls(),
            vec![
                UiCall::OpenLink(url.to_string()),
                UiCall::Alert("hello".to_string()),
                UiCall::Haptic(Haptic::Success),
            ]
        );
        assert!(browser.calls().is_empty());
    }

    #[test]
    fn test_falls_back_to_browser() {
        let browser = RecordingBrowser::new();
        let surface = Surface::new(browser.clone());
        let url = Url::parse("https://example.com/").unwrap();

        surface.open_chat_link(&url).unwrap();
        surface.haptic(Haptic::Error);
        surface.copy_to_clipboard("0xabc").unwrap();

        assert_eq!(
            browser.calls(),
            vec![
                UiCall::OpenLink(url.to_string()),
                UiCall::Clipboard("0xabc".to_string()),
            ]
        );
    }

    #[test]
    fn test_failures_are_peripheral() {
        let browser = RecordingBrowser::new();
        browser.fail_clipboard();
        let surface = Surface::new(browser);

        assert!(matches!(
            surface.copy_to_clipboard("0xabc"),
            Err(PeripheralError::Clipboard(_))
        ));
    }
}
