use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::history::NotificationHistory;

/// How many persisted events a new subscriber gets replayed on connect.
pub const REPLAY_LIMIT: u32 = 10;

/// Live subscriber set, owned by the bus and never touched by handlers.
///
/// A plain `Mutex<HashMap>` is enough: the lock is held only for short
/// add/remove/iterate sections and the senders are unbounded, so `send` never
/// blocks under the lock.
struct SubscriberRegistry {
    subscribers: Mutex<HashMap<u64, UnboundedSender<String>>>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    fn add(&self, tx: UnboundedSender<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.insert(id, tx);
        }
        id
    }

    fn remove(&self, id: u64) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.remove(&id);
        }
    }

    /// Send to every live subscriber, dropping the ones whose receiver is
    /// gone. A failed send is isolated to that subscriber.
    fn broadcast(&self, message: &str) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain(|_, tx| tx.send(message.to_owned()).is_ok());
        }
    }

    fn len(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

/// Process-wide notification bus: durable history plus live fan-out.
#[derive(Clone)]
pub struct NotificationBus {
    registry: Arc<SubscriberRegistry>,
    history: Arc<dyn NotificationHistory>,
}

impl NotificationBus {
    pub fn new(history: Arc<dyn NotificationHistory>) -> Self {
        Self {
            registry: Arc::new(SubscriberRegistry::new()),
            history,
        }
    }

    /// Append to history (best-effort) and fan the message out to every
    /// currently connected subscriber in publish order.
    pub async fn publish(&self, message: &str) {
        if let Err(err) = self.history.append(message).await {
            tracing::warn!(%err, "failed to persist notification, delivering live anyway");
        }
        self.registry.broadcast(message);
    }

    /// Open a new subscription.
    ///
    /// The most recent [`REPLAY_LIMIT`] persisted messages are queued into the
    /// subscription oldest-first before it joins the live set, so a fresh
    /// ticker has something to show. Events published during this window may
    /// be missed or duplicated; the channel is best-effort by design.
    pub async fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();

        match self.history.recent(REPLAY_LIMIT).await {
            Ok(tail) => {
                for message in tail {
                    // Receiver is in scope, this cannot fail yet.
                    let _ = tx.send(message);
                }
            }
            Err(err) => {
                tracing::warn!(%err, "notification replay unavailable, starting live-only");
            }
        }

        let id = self.registry.add(tx);
        Subscription {
            rx,
            guard: SubscriptionGuard {
                id,
                registry: Arc::clone(&self.registry),
            },
        }
    }

    /// Number of currently open subscriptions (diagnostics only).
    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }
}

/// A live subscription handle. Dropping it (or the guard split out of it)
/// removes the subscriber from the bus, so an SSE connection closing cleans
/// up after itself.
pub struct Subscription {
    rx: UnboundedReceiver<String>,
    guard: SubscriptionGuard,
}

impl Subscription {
    /// Receive the next message (replayed history first, then live events).
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Split into the raw receiver and the guard that keeps the registry
    /// entry alive as long as the consuming stream does.
    pub fn into_parts(self) -> (UnboundedReceiver<String>, SubscriptionGuard) {
        (self.rx, self.guard)
    }
}

/// Unregisters the subscriber when the owning stream is dropped.
pub struct SubscriptionGuard {
    id: u64,
    registry: Arc<SubscriberRegistry>,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}
