//! Completion Listener.
//!
//! Each [`Subscription`] is a task reading the [`StatusSignalBus`] and
//! waiting for the "unlocked" signal of one item. It stops on the first
//! match (unless the listener runs in [`ListenerMode::KeepListening`]), on
//! cancellation, or when the completion window elapses.
//!
//! The broadcast receiver is created before the task is spawned, so a
//! signal published right after `subscribe` returns is never missed.

use compact_str::CompactString;
use kanau::processor::Processor;
use paylock_sdk::objects::{LockState, MalformedSignal};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::access::{AccessCache, AccessStatus};
use crate::config::ListenerMode;
use crate::events::{StatusSignal, StatusSignalBus};
use crate::host::{Haptic, Surface};

/// Spawns completion subscriptions.
#[derive(Clone)]
pub struct CompletionListener {
    bus: StatusSignalBus,
    access: AccessCache,
    surface: Surface,
    window: Duration,
}

impl CompletionListener {
    pub fn new(
        bus: StatusSignalBus,
        access: AccessCache,
        surface: Surface,
        window: Duration,
    ) -> Self {
        Self {
            bus,
            access,
            surface,
            window,
        }
    }

    /// Watch the bus for the unlock of `item_id`.
    ///
    /// On a match the access cache is updated first, then `on_unlocked` is
    /// called, then the success haptic plays. Must be called inside a tokio
    /// runtime.
    pub fn subscribe<F>(&self, item_id: &str, mode: ListenerMode, on_unlocked: F) -> Subscription
    where
        F: Fn() + Send + 'static,
    {
        let item_id = CompactString::from(item_id);
        let rx = self.bus.subscribe();
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let task = SubscriptionTask {
            filter: UnlockFilter {
                item_id: item_id.clone(),
            },
            access: self.access.clone(),
            surface: self.surface.clone(),
            deadline: Instant::now() + self.window,
            mode,
        };
        let handle = tokio::spawn(task.run(rx, cancel_rx, on_unlocked));
        debug!(%item_id, ?mode, "Completion subscription started");

        Subscription {
            item_id,
            cancel_tx,
            handle: Some(handle),
        }
    }
}

/// A live completion subscription. Dropping it cancels it.
pub struct Subscription {
    item_id: CompactString,
    cancel_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Stop listening. Calling it again has no effect.
    pub fn cancel(&self) {
        let already_cancelled = self.cancel_tx.send_replace(true);
        if !already_cancelled && self.is_running() {
            debug!(item_id = %self.item_id, "Completion subscription cancelled");
        }
    }

    /// Whether the subscription still listens: not matched, cancelled or
    /// expired.
    pub fn is_active(&self) -> bool {
        !*self.cancel_tx.borrow() && self.is_running()
    }

    /// Wait for the subscription task to end on its own.
    pub async fn finished(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Decides whether one signal unlocks the watched item.
#[derive(Debug, Clone)]
pub struct UnlockFilter {
    pub item_id: CompactString,
}

impl Processor<StatusSignal> for UnlockFilter {
    type Output = bool;
    type Error = MalformedSignal;
    async fn process(&self, signal: StatusSignal) -> Result<bool, MalformedSignal> {
        let payload = signal.decode()?;
        Ok(payload.lock_state(&self.item_id) == Some(LockState::Unlocked))
    }
}

struct SubscriptionTask {
    filter: UnlockFilter,
    access: AccessCache,
    surface: Surface,
    deadline: Instant,
    mode: ListenerMode,
}

impl SubscriptionTask {
    async fn run<F>(
        self,
        mut rx: broadcast::Receiver<StatusSignal>,
        mut cancel_rx: watch::Receiver<bool>,
        on_unlocked: F,
    ) where
        F: Fn() + Send + 'static,
    {
        let item_id = &self.filter.item_id;
        loop {
            tokio::select! {
                biased;

                changed = cancel_rx.changed() => {
                    if changed.is_err() || *cancel_rx.borrow() {
                        break;
                    }
                }

                _ = tokio::time::sleep_until(self.deadline) => {
                    debug!(%item_id, "Completion window elapsed");
                    break;
                }

                received = rx.recv() => match received {
                    Ok(signal) => match self.filter.process(signal).await {
                        Ok(true) => {
                            info!(%item_id, "Payment confirmed");
                            self.access.set(item_id, AccessStatus::Unlocked);
                            on_unlocked();
                            self.surface.haptic(Haptic::Success);
                            if self.mode == ListenerMode::Once {
                                break;
                            }
                        }
                        Ok(false) => {}
                        Err(e) => {
                            debug!(%item_id, error = %e, "Ignoring malformed status signal");
                        }
                    },
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(%item_id, skipped, "Completion listener lagged behind status signals");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_COMPLETION_WINDOW;
    use crate::testing::{RecordingBridge, RecordingBrowser, UiCall};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixture {
        bus: StatusSignalBus,
        access: AccessCache,
        bridge: Arc<RecordingBridge>,
        listener: CompletionListener,
    }

    fn fixture() -> Fixture {
        let bus = StatusSignalBus::new();
        let access = AccessCache::new();
        let bridge = RecordingBridge::new();
        let surface = Surface::new(RecordingBrowser::new()).with_bridge(bridge.clone());
        let listener = CompletionListener::new(
            bus.clone(),
            access.clone(),
            surface,
            DEFAULT_COMPLETION_WINDOW,
        );
        Fixture {
            bus,
            access,
            bridge,
            listener,
        }
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn unlocked(item_id: &str) -> StatusSignal {
        StatusSignal::new(json!({"state": "unlocked", "locks": {item_id: "unlocked"}}))
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlock_only_reaches_matching_item() {
        let f = fixture();
        let (session_hits, on_session) = counter();
        let (fee_hits, on_fee) = counter();
        let mut session = f.listener.subscribe("10-min", ListenerMode::Once, on_session);
        let fee = f.listener.subscribe("booking-fee", ListenerMode::Once, on_fee);

        f.bus.publish(unlocked("10-min"));
        session.finished().await;
        settle().await;

        assert_eq!(session_hits.load(Ordering::SeqCst), 1);
        assert_eq!(fee_hits.load(Ordering::SeqCst), 0);
        assert_eq!(f.access.get("10-min"), AccessStatus::Unlocked);
        assert_eq!(f.access.get("booking-fee"), AccessStatus::Unknown);
        assert!(!session.is_active());
        assert!(fee.is_active());
        assert!(f.bridge.calls().contains(&UiCall::Haptic(Haptic::Success)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_locked_state_is_not_a_completion() {
        let f = fixture();
        let (hits, on_unlocked) = counter();
        let sub = f.listener.subscribe("10-min", ListenerMode::Once, on_unlocked);

        f.bus.publish(StatusSignal::new(json!({
            "state": "unlocked",
            "locks": {"10-min": "locked", "booking-fee": "unlocked"}
        })));
        settle().await;

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(f.access.get("10-min"), AccessStatus::Unknown);
        assert!(sub.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_signals_are_dropped() {
        let f = fixture();
        let (hits, on_unlocked) = counter();
        let mut sub = f.listener.subscribe("10-min", ListenerMode::Once, on_unlocked);

        f.bus.publish(StatusSignal::new(json!("garbage")));
        f.bus.publish(StatusSignal::new(json!({"locks": 5})));
        f.bus.publish(StatusSignal::new(serde_json::Value::Null));
        settle().await;
        assert!(sub.is_active());

        f.bus.publish(unlocked("10-min"));
        sub.finished().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlock_survives_odd_sibling_entries() {
        let f = fixture();
        let (hits, on_unlocked) = counter();
        let mut sub = f.listener.subscribe("10-min", ListenerMode::Once, on_unlocked);

        f.bus.publish(StatusSignal::new(json!({
            "state": 2,
            "locks": {"10-min": "unlocked", "booking-fee": {"expiry": 1}}
        })));
        sub.finished().await;

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(f.access.get("10-min"), AccessStatus::Unlocked);
        assert_eq!(f.access.get("booking-fee"), AccessStatus::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscription_expires_after_window() {
        let f = fixture();
        let (hits, on_unlocked) = counter();
        let mut sub = f.listener.subscribe("10-min", ListenerMode::Once, on_unlocked);

        tokio::time::sleep(DEFAULT_COMPLETION_WINDOW - Duration::from_secs(1)).await;
        assert!(sub.is_active());

        tokio::time::sleep(Duration::from_secs(2)).await;
        sub.finished().await;
        assert!(!sub.is_active());

        f.bus.publish(unlocked("10-min"));
        settle().await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(f.access.get("10-min"), AccessStatus::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let f = fixture();
        let (hits, on_unlocked) = counter();
        let sub = f.listener.subscribe("10-min", ListenerMode::Once, on_unlocked);

        sub.cancel();
        sub.cancel();
        assert!(!sub.is_active());

        settle().await;
        f.bus.publish(unlocked("10-min"));
        settle().await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(f.bus.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let f = fixture();
        let (_, on_unlocked) = counter();
        let sub = f.listener.subscribe("10-min", ListenerMode::Once, on_unlocked);
        assert_eq!(f.bus.listener_count(), 1);

        drop(sub);
        settle().await;
        assert_eq!(f.bus.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keep_listening_reports_every_unlock() {
        let f = fixture();
        let (hits, on_unlocked) = counter();
        let sub = f
            .listener
            .subscribe("10-min", ListenerMode::KeepListening, on_unlocked);

        f.bus.publish(unlocked("10-min"));
        settle().await;
        f.bus.publish(unlocked("10-min"));
        settle().await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(sub.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_is_updated_before_callback() {
        let f = fixture();
        let seen = Arc::new(std::sync::Mutex::new(None));
        let access = f.access.clone();
        let record = seen.clone();
        let mut sub = f.listener.subscribe("10-min", ListenerMode::Once, move || {
            *record.lock().unwrap() = Some(access.get("10-min"));
        });

        f.bus.publish(unlocked("10-min"));
        sub.finished().await;

        assert_eq!(*seen.lock().unwrap(), Some(AccessStatus::Unlocked));
    }

    #[tokio::test]
    async fn test_unlock_filter() {
        let filter = UnlockFilter {
            item_id: "10-min".into(),
        };
        assert!(filter.process(unlocked("10-min")).await.unwrap());
        assert!(!filter.process(unlocked("booking-fee")).await.unwrap());
        assert!(filter.process(StatusSignal::new(json!([]))).await.is_err());
        assert!(
            filter
                .process(StatusSignal::new(json!({
                    "locks": {"10-min": "unlocked", "other": {"expiry": 1}}
                })))
                .await
                .unwrap()
        );
        assert!(
            filter
                .process(StatusSignal::new(json!({
                    "state": 2,
                    "locks": {"10-min": "unlocked"}
                })))
                .await
                .unwrap()
        );
    }
}
