//! Payment Flow Controller.
//!
//! The controller owns the payment session of one surface. It is an actor:
//! commands arrive through a [`FlowHandle`] and are acknowledged with the
//! resulting [`FlowSnapshot`]; readiness results and completion signals
//! arrive as internal events tagged with the [`SessionId`] they belong to.
//! Everything is processed one message at a time on the `run` loop, so a
//! result from a torn-down session, or a second unlock for a session that
//! already succeeded, is simply ignored.
//!
//! ```text
//! Idle -> SelectingMethod -> AwaitingCapability -> Initiating -> WaitingForCompletion -> Succeeded
//!                         \________________________/      \
//!                                                          -> Failed -> SelectingMethod (retry)
//! ```

use compact_str::CompactString;
use paylock_sdk::config::StorefrontConfig;
use paylock_sdk::links::{contact_link, contact_prompt, explorer_link};
use paylock_sdk::objects::{CustomAmount, PaymentMethod, Quote};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::access::{AccessCache, AccessStatus};
use crate::config::{ListenerMode, OrchestratorConfig};
use crate::error::{FlowClosed, FlowError, PeripheralError};
use crate::events::{DEFAULT_CHANNEL_BUFFER, StatusSignalBus};
use crate::host::{BridgeError, CapabilitySet, Haptic, HostEnvironment, Surface};
use crate::processors::initiator::{CheckoutInitiator, Initiation};
use crate::processors::listener::{CompletionListener, Subscription};
use crate::processors::readiness::{Readiness, ReadinessDetector};

/// Identifies one payment session. A new one is minted every time an item
/// is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowState {
    Idle,
    SelectingMethod,
    AwaitingCapability,
    Initiating,
    WaitingForCompletion,
    Succeeded,
    /// Recoverable; the reason is in [`FlowSnapshot::last_error`].
    Failed,
}

impl FlowState {
    pub fn label(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::SelectingMethod => "selecting a method",
            FlowState::AwaitingCapability => "waiting for the payment system",
            FlowState::Initiating => "starting the checkout",
            FlowState::WaitingForCompletion => "waiting for the payment",
            FlowState::Succeeded => "paid",
            FlowState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything a surface needs to render the current session.
#[derive(Debug, Clone)]
pub struct FlowSnapshot {
    pub session: Option<SessionId>,
    pub state: FlowState,
    /// Item and price of the session; `None` while idle.
    pub quote: Option<Quote>,
    pub method: Option<PaymentMethod>,
    pub access: AccessStatus,
    pub last_error: Option<FlowError>,
    /// Chat deep link to the contact, offered when the payment system is
    /// unavailable.
    pub contact_link: Option<Url>,
    pub initiation: Option<Initiation>,
    /// Whether a completion subscription is live.
    pub listening: bool,
}

impl FlowSnapshot {
    fn idle() -> Self {
        Self {
            session: None,
            state: FlowState::Idle,
            quote: None,
            method: None,
            access: AccessStatus::Unknown,
            last_error: None,
            contact_link: None,
            initiation: None,
            listening: false,
        }
    }
}

/// Callbacks fired by the controller. Every method defaults to a no-op.
pub trait FlowObserver: Send + Sync {
    fn on_state_changed(&self, _snapshot: &FlowSnapshot) {}

    fn on_success(&self, _snapshot: &FlowSnapshot) {}

    fn on_error(&self, _error: &FlowError) {}
}

impl FlowObserver for () {}

/// Host seams the controller drives.
#[derive(Clone)]
pub struct FlowHost {
    pub env: Arc<dyn HostEnvironment>,
    pub surface: Surface,
    pub bus: StatusSignalBus,
    pub access: AccessCache,
}

#[derive(Debug)]
enum AmountInput {
    Value(Decimal),
    Text(String),
}

#[derive(Debug)]
enum Command {
    Open(CompactString),
    ChooseMethod {
        method: PaymentMethod,
        amount: Option<AmountInput>,
    },
    Cancel,
    Close,
    Dismiss,
    Retry,
    RequestContact,
    CopyRecipient,
    ViewRecipient,
}

impl Command {
    fn action(&self) -> &'static str {
        match self {
            Command::Open(_) => "open an item",
            Command::ChooseMethod { .. } => "choose a payment method",
            Command::Cancel => "cancel",
            Command::Close => "close",
            Command::Dismiss => "dismiss",
            Command::Retry => "retry",
            Command::RequestContact => "contact the seller",
            Command::CopyRecipient => "copy the recipient",
            Command::ViewRecipient => "view the recipient",
        }
    }
}

struct Envelope {
    command: Command,
    reply: oneshot::Sender<FlowSnapshot>,
}

#[derive(Debug)]
enum FlowEvent {
    Readiness {
        session: SessionId,
        readiness: Readiness,
    },
    Unlocked {
        session: SessionId,
    },
}

/// Readiness of the payment capability as seen by one session.
#[derive(Debug, Clone)]
enum Detection {
    Pending,
    Ready(CapabilitySet),
    Unready,
}

struct Session {
    id: SessionId,
    item_id: CompactString,
    quote: Quote,
    state: FlowState,
    method: Option<PaymentMethod>,
    detection: Detection,
    detection_cancel: watch::Sender<bool>,
    subscription: Option<Subscription>,
    initiation: Option<Initiation>,
    last_error: Option<FlowError>,
    contact_link: Option<Url>,
}

impl Session {
    fn stop_background_work(&mut self) {
        self.detection_cancel.send_replace(true);
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}

/// Sends commands to a running [`PaymentFlowController`].
#[derive(Clone)]
pub struct FlowHandle {
    tx: mpsc::Sender<Envelope>,
    snapshot_rx: watch::Receiver<FlowSnapshot>,
}

impl FlowHandle {
    async fn send(&self, command: Command) -> Result<FlowSnapshot, FlowClosed> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { command, reply })
            .await
            .map_err(|_| FlowClosed)?;
        rx.await.map_err(|_| FlowClosed)
    }

    /// Open the surface for `item_id`, tearing down any previous session.
    pub async fn open(&self, item_id: &str) -> Result<FlowSnapshot, FlowClosed> {
        self.send(Command::Open(CompactString::from(item_id))).await
    }

    /// Pay with `method`, optionally replacing the price with `amount`.
    pub async fn choose_method(
        &self,
        method: PaymentMethod,
        amount: Option<Decimal>,
    ) -> Result<FlowSnapshot, FlowClosed> {
        self.send(Command::ChooseMethod {
            method,
            amount: amount.map(AmountInput::Value),
        })
        .await
    }

    /// Pay with `method` at a custom amount typed by the viewer.
    pub async fn choose_method_with_input(
        &self,
        method: PaymentMethod,
        input: &str,
    ) -> Result<FlowSnapshot, FlowClosed> {
        self.send(Command::ChooseMethod {
            method,
            amount: Some(AmountInput::Text(input.to_string())),
        })
        .await
    }

    pub async fn cancel(&self) -> Result<FlowSnapshot, FlowClosed> {
        self.send(Command::Cancel).await
    }

    /// Close the surface from any state.
    pub async fn close(&self) -> Result<FlowSnapshot, FlowClosed> {
        self.send(Command::Close).await
    }

    pub async fn dismiss(&self) -> Result<FlowSnapshot, FlowClosed> {
        self.send(Command::Dismiss).await
    }

    pub async fn retry(&self) -> Result<FlowSnapshot, FlowClosed> {
        self.send(Command::Retry).await
    }

    /// Open a chat with the contact, message pre-filled with item and price.
    pub async fn request_contact(&self) -> Result<FlowSnapshot, FlowClosed> {
        self.send(Command::RequestContact).await
    }

    pub async fn copy_recipient(&self) -> Result<FlowSnapshot, FlowClosed> {
        self.send(Command::CopyRecipient).await
    }

    /// Open the block explorer page of the recipient address.
    pub async fn view_recipient(&self) -> Result<FlowSnapshot, FlowClosed> {
        self.send(Command::ViewRecipient).await
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> FlowSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<FlowSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Wait until the published snapshot reaches `state`.
    pub async fn wait_for(&self, state: FlowState) -> Result<FlowSnapshot, FlowClosed> {
        let mut rx = self.snapshot_rx.clone();
        rx.wait_for(|snapshot| snapshot.state == state)
            .await
            .map(|snapshot| snapshot.clone())
            .map_err(|_| FlowClosed)
    }
}

/// Drives one surface's payment session.
pub struct PaymentFlowController {
    storefront: Arc<StorefrontConfig>,
    config: OrchestratorConfig,
    surface: Surface,
    access: AccessCache,
    detector: ReadinessDetector,
    initiator: CheckoutInitiator,
    listener: CompletionListener,
    observer: Arc<dyn FlowObserver>,
    commands: mpsc::Receiver<Envelope>,
    events_tx: mpsc::UnboundedSender<FlowEvent>,
    events_rx: mpsc::UnboundedReceiver<FlowEvent>,
    snapshot_tx: watch::Sender<FlowSnapshot>,
    shutdown_rx: watch::Receiver<bool>,
    session: Option<Session>,
    last_published: (Option<SessionId>, FlowState),
}

impl PaymentFlowController {
    /// Create a controller and the handle that drives it.
    ///
    /// Nothing happens until [`run`](Self::run) is spawned.
    pub fn new(
        storefront: Arc<StorefrontConfig>,
        config: OrchestratorConfig,
        host: FlowHost,
        observer: Arc<dyn FlowObserver>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> (Self, FlowHandle) {
        let (tx, commands) = mpsc::channel(DEFAULT_CHANNEL_BUFFER);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(FlowSnapshot::idle());

        let detector = ReadinessDetector::new(host.env, host.access.clone());
        let initiator = CheckoutInitiator::new(storefront.clone(), host.surface.clone());
        let listener = CompletionListener::new(
            host.bus,
            host.access.clone(),
            host.surface.clone(),
            config.completion_window,
        );

        let controller = Self {
            storefront,
            config,
            surface: host.surface,
            access: host.access,
            detector,
            initiator,
            listener,
            observer,
            commands,
            events_tx,
            events_rx,
            snapshot_tx,
            shutdown_rx,
            session: None,
            last_published: (None, FlowState::Idle),
        };
        (controller, FlowHandle { tx, snapshot_rx })
    }

    /// Run the controller until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        info!("PaymentFlowController started");

        loop {
            tokio::select! {
                biased;

                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        info!("PaymentFlowController received shutdown signal");
                        break;
                    }
                }

                Some(event) = self.events_rx.recv() => {
                    self.handle_event(event);
                    self.publish();
                }

                envelope = self.commands.recv() => match envelope {
                    Some(Envelope { command, reply }) => {
                        self.handle_command(command);
                        let _ = reply.send(self.publish());
                    }
                    None => {
                        info!("All flow handles dropped");
                        break;
                    }
                },
            }
        }

        if let Some(mut session) = self.session.take() {
            session.stop_background_work();
        }
        self.publish();
        info!("PaymentFlowController shutdown complete");
    }

    fn handle_command(&mut self, command: Command) {
        let state = self.state();
        match command {
            Command::Open(item_id) => self.open(&item_id),
            Command::Close => self.close(),
            Command::ChooseMethod { method, amount } if state == FlowState::SelectingMethod => {
                self.choose_method(method, amount)
            }
            Command::Cancel
                if matches!(
                    state,
                    FlowState::SelectingMethod
                        | FlowState::AwaitingCapability
                        | FlowState::WaitingForCompletion
                        | FlowState::Failed
                ) =>
            {
                self.close()
            }
            Command::Dismiss if matches!(state, FlowState::Succeeded | FlowState::Failed) => {
                self.close()
            }
            Command::Retry if state == FlowState::Failed => self.retry(),
            Command::RequestContact if state != FlowState::Idle => self.request_contact(),
            Command::CopyRecipient if state != FlowState::Idle => self.copy_recipient(),
            Command::ViewRecipient if state != FlowState::Idle => self.view_recipient(),
            other => {
                let error = FlowError::InvalidTransition {
                    action: other.action(),
                    state: state.label(),
                };
                debug!(error = %error, "Command rejected");
                self.observer.on_error(&error);
            }
        }
    }

    fn handle_event(&mut self, event: FlowEvent) {
        match event {
            FlowEvent::Readiness { session, readiness } => {
                if !self.is_current(session) {
                    debug!(%session, "Ignoring readiness of a closed session");
                    return;
                }
                self.on_readiness(readiness);
            }
            FlowEvent::Unlocked { session } => {
                if !self.is_current(session) {
                    debug!(%session, "Ignoring unlock of a closed session");
                    return;
                }
                if self.state() != FlowState::WaitingForCompletion {
                    debug!(%session, state = %self.state(), "Ignoring unlock outside of a checkout");
                    return;
                }
                self.succeed();
            }
        }
    }

    fn open(&mut self, item_id: &str) {
        let Some(item) = self.storefront.item(item_id).cloned() else {
            let error = FlowError::UnknownItem(item_id.to_string());
            warn!(item_id, "Cannot open unknown item");
            self.observer.on_error(&error);
            return;
        };

        if let Some(mut previous) = self.session.take() {
            previous.stop_background_work();
            if previous.item_id != item.id {
                self.access.reset(&previous.item_id);
            }
            debug!(session = %previous.id, "Previous session torn down");
        }

        let id = SessionId::new();
        let state = if self.access.get(&item.id) == AccessStatus::Unlocked {
            FlowState::Succeeded
        } else {
            FlowState::SelectingMethod
        };
        let detection_cancel = if state == FlowState::Succeeded {
            watch::channel(true).0
        } else {
            self.start_detection(id, item.id.clone())
        };

        info!(session = %id, item_id = %item.id, %state, "Payment session opened");
        self.session = Some(Session {
            id,
            item_id: item.id.clone(),
            quote: Quote::new(&item, None),
            state,
            method: None,
            // Ready only once this session's own access refresh has landed,
            // even when the capability was found earlier.
            detection: Detection::Pending,
            detection_cancel,
            subscription: None,
            initiation: None,
            last_error: None,
            contact_link: None,
        });

        if state == FlowState::Succeeded {
            self.publish_success();
        }
    }

    fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop_background_work();
            info!(session = %session.id, item_id = %session.item_id, "Payment session closed");
        }
    }

    fn choose_method(&mut self, method: PaymentMethod, amount: Option<AmountInput>) {
        let custom = match amount.map(parse_amount).transpose() {
            Ok(custom) => custom,
            Err(error) => {
                self.reject(error);
                return;
            }
        };

        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.quote = Quote::new(&session.quote.item, custom);
        session.method = Some(method);
        session.last_error = None;

        match session.detection.clone() {
            Detection::Ready(capabilities) => self.initiate(&capabilities),
            Detection::Pending => self.set_state(FlowState::AwaitingCapability),
            Detection::Unready => {
                self.restart_detection();
                self.set_state(FlowState::AwaitingCapability);
            }
        }
    }

    fn on_readiness(&mut self, readiness: Readiness) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match readiness {
            Readiness::Ready(capabilities) => {
                session.detection = Detection::Ready(capabilities.clone());
                let state = session.state;
                let entitled = self.access.get(&session.item_id) == AccessStatus::Unlocked;
                match state {
                    FlowState::SelectingMethod | FlowState::AwaitingCapability if entitled => {
                        info!(session = %session.id, "Viewer already holds access");
                        self.set_state(FlowState::Succeeded);
                        self.publish_success();
                    }
                    FlowState::AwaitingCapability => self.initiate(&capabilities),
                    FlowState::WaitingForCompletion if entitled => {
                        info!(session = %session.id, "Viewer already holds access");
                        self.succeed();
                    }
                    _ => {}
                }
            }
            Readiness::Unready { attempts } => {
                session.detection = Detection::Unready;
                if session.state == FlowState::AwaitingCapability {
                    let prompt = contact_prompt(&self.storefront.contact, &session.quote);
                    session.contact_link =
                        match contact_link(&self.storefront.contact, &session.quote) {
                            Ok(link) => Some(link),
                            Err(e) => {
                                warn!(error = %e, "Failed to build contact link");
                                None
                            }
                        };
                    self.surface.haptic(Haptic::Error);
                    self.fail(FlowError::CapabilityUnavailable { attempts }, &prompt);
                }
            }
            Readiness::Cancelled => {}
        }
    }

    fn initiate(&mut self, capabilities: &CapabilitySet) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(method) = session.method else {
            return;
        };
        let session_id = session.id;
        let mode = self.config.listener_mode;
        let events = self.events_tx.clone();
        session.subscription = Some(self.listener.subscribe(&session.item_id, mode, move || {
            let _ = events.send(FlowEvent::Unlocked {
                session: session_id,
            });
        }));
        self.set_state(FlowState::Initiating);

        let Some(session) = self.session.as_mut() else {
            return;
        };
        match self
            .initiator
            .initiate_quote(&session.quote, method, Some(capabilities))
        {
            Ok(initiation) => {
                session.initiation = Some(initiation);
                self.set_state(FlowState::WaitingForCompletion);
            }
            Err(e) => {
                if let Some(subscription) = session.subscription.take() {
                    subscription.cancel();
                }
                let error = FlowError::Initiation(e);
                let message = error.user_message();
                self.fail(error, &message);
            }
        }
    }

    fn retry(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.last_error = None;
        session.contact_link = None;
        session.initiation = None;
        if matches!(session.detection, Detection::Unready) {
            self.restart_detection();
        }
        self.set_state(FlowState::SelectingMethod);
    }

    fn request_contact(&self) {
        let Some(session) = &self.session else {
            return;
        };
        let result = contact_link(&self.storefront.contact, &session.quote)
            .map_err(|e| PeripheralError::Link(BridgeError::Failed(e.to_string())))
            .and_then(|link| self.surface.open_chat_link(&link));
        match result {
            Ok(()) => debug!(session = %session.id, "Contact link opened"),
            Err(e) => self.peripheral_failure(e),
        }
    }

    fn copy_recipient(&self) {
        let Some(session) = &self.session else {
            return;
        };
        match self
            .surface
            .copy_to_clipboard(&session.quote.item.recipient_address)
        {
            Ok(()) => self.surface.haptic(Haptic::LightImpact),
            Err(e) => self.peripheral_failure(e),
        }
    }

    fn view_recipient(&self) {
        let Some(session) = &self.session else {
            return;
        };
        let result = explorer_link(&session.quote)
            .map_err(|e| PeripheralError::Link(BridgeError::Failed(e.to_string())))
            .and_then(|link| self.surface.open_link(&link));
        if let Err(e) = result {
            self.peripheral_failure(e);
        }
    }

    fn start_detection(&self, session: SessionId, item_id: CompactString) -> watch::Sender<bool> {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let detector = self.detector.clone();
        let events = self.events_tx.clone();
        let policy = self.config.readiness;
        tokio::spawn(async move {
            let readiness = detector
                .await_ready_for(&item_id, policy, &mut cancel_rx)
                .await;
            let _ = events.send(FlowEvent::Readiness { session, readiness });
        });
        cancel_tx
    }

    fn restart_detection(&mut self) {
        let Some((id, item_id)) = self
            .session
            .as_ref()
            .map(|session| (session.id, session.item_id.clone()))
        else {
            return;
        };
        let cancel = self.start_detection(id, item_id);
        if let Some(session) = self.session.as_mut() {
            session.detection_cancel.send_replace(true);
            session.detection_cancel = cancel;
            session.detection = Detection::Pending;
        }
        debug!(session = %id, "Readiness polling restarted");
    }

    fn is_current(&self, id: SessionId) -> bool {
        self.session.as_ref().is_some_and(|session| session.id == id)
    }

    fn state(&self) -> FlowState {
        self.session
            .as_ref()
            .map_or(FlowState::Idle, |session| session.state)
    }

    fn set_state(&mut self, state: FlowState) {
        if let Some(session) = self.session.as_mut() {
            debug!(session = %session.id, from = %session.state, to = %state, "Flow transition");
            session.state = state;
        }
        self.publish();
    }

    fn succeed(&mut self) {
        let finished = match self.config.listener_mode {
            ListenerMode::Once => self
                .session
                .as_mut()
                .and_then(|session| session.subscription.take()),
            ListenerMode::KeepListening => None,
        };
        if let Some(subscription) = finished {
            subscription.cancel();
        }
        self.set_state(FlowState::Succeeded);
        self.publish_success();
    }

    fn publish_success(&mut self) {
        let snapshot = self.publish();
        if let Some(quote) = &snapshot.quote {
            info!(item_id = %quote.item.id, price = %quote.price, "Payment flow succeeded");
        }
        self.observer.on_success(&snapshot);
    }

    /// Move to `Failed`, alert the viewer and notify the observer.
    fn fail(&mut self, error: FlowError, message: &str) {
        if let Some(session) = self.session.as_mut() {
            warn!(session = %session.id, error = %error, "Payment flow failed");
            session.last_error = Some(error.clone());
        }
        self.set_state(FlowState::Failed);
        self.alert(message);
        self.observer.on_error(&error);
    }

    /// Report an error that leaves the state unchanged.
    fn reject(&mut self, error: FlowError) {
        debug!(error = %error, "Request rejected");
        if let Some(session) = self.session.as_mut() {
            session.last_error = Some(error.clone());
        }
        self.surface.haptic(Haptic::Error);
        self.alert(&error.user_message());
        self.observer.on_error(&error);
    }

    fn peripheral_failure(&self, error: PeripheralError) {
        warn!(error = %error, "UI affordance failed");
        self.observer.on_error(&FlowError::Peripheral(error));
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.surface.alert(message) {
            self.peripheral_failure(e);
        }
    }

    fn snapshot(&self) -> FlowSnapshot {
        let Some(session) = &self.session else {
            return FlowSnapshot::idle();
        };
        FlowSnapshot {
            session: Some(session.id),
            state: session.state,
            quote: Some(session.quote.clone()),
            method: session.method,
            access: self.access.get(&session.item_id),
            last_error: session.last_error.clone(),
            contact_link: session.contact_link.clone(),
            initiation: session.initiation.clone(),
            listening: session
                .subscription
                .as_ref()
                .is_some_and(|subscription| subscription.is_active()),
        }
    }

    fn publish(&mut self) -> FlowSnapshot {
        let snapshot = self.snapshot();
        let key = (snapshot.session, snapshot.state);
        if self.last_published != key {
            self.last_published = key;
            self.observer.on_state_changed(&snapshot);
        }
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}

fn parse_amount(input: AmountInput) -> Result<CustomAmount, FlowError> {
    let amount = match input {
        AmountInput::Value(value) => CustomAmount::new(value)?,
        AmountInput::Text(text) => CustomAmount::parse(&text)?,
    };
    Ok(amount)
}
