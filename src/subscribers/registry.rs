//! # Live subscriber registry.
//!
//! [`SubscriberRegistry`] holds one bounded delivery channel per connected
//! subscriber, keyed by a monotonically increasing [`SubscriberId`].
//!
//! ## Architecture
//! ```text
//! HTTP connection ──► subscribe() ──► Subscription { id, rx }
//!                                         │
//! Engine::emit ──► snapshot() ──► [tx 1] ─┼─► rx 1 ──► chunked response 1
//!                               ├► [tx 2] ─┴─► rx 2 ──► chunked response 2
//!                               └► [tx N] ───► rx N ──► chunked response N
//!
//! connection gone ──► Subscription dropped ──► unsubscribe(id)
//! ```
//!
//! ## Rules
//! - Subscribe, unsubscribe and snapshot all take the same lock.
//! - Removal is by identity, never by position: concurrent unsubscribes can
//!   not remove the wrong channel.
//! - A [`Subscription`] unsubscribes itself exactly once, when dropped.
//! - Sending blocks until the subscriber's queue has room (backpressure);
//!   capacity is clamped to a minimum of 1.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use crate::events::Event;

/// Stable identity of a subscriber for the lifetime of its connection.
pub type SubscriberId = u64;

type Channels = BTreeMap<SubscriberId, mpsc::Sender<Arc<Event>>>;

/// Thread-safe set of subscriber delivery channels.
#[derive(Debug)]
pub struct SubscriberRegistry {
    next_id: AtomicU64,
    capacity: usize,
    channels: Mutex<Channels>,
}

impl SubscriberRegistry {
    /// Creates an empty registry whose channels buffer up to `capacity` events.
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(1),
            capacity: capacity.max(1),
            channels: Mutex::new(BTreeMap::new()),
        })
    }

    /// Registers a new delivery channel and returns its handle.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.capacity);
        self.channels().insert(id, tx);
        tracing::debug!(subscriber = id, "subscribed");

        Subscription {
            id,
            rx,
            registry: Arc::clone(self),
        }
    }

    /// Removes channel `id`. Returns `false` if it was already removed.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.channels().remove(&id).is_some();
        if removed {
            tracing::debug!(subscriber = id, "unsubscribed");
        }
        removed
    }

    /// Copies the current set of senders, in subscription order.
    pub fn snapshot(&self) -> Vec<mpsc::Sender<Arc<Event>>> {
        self.channels().values().cloned().collect()
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.channels().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels().is_empty()
    }

    /// Sorted ids of live subscribers.
    pub fn ids(&self) -> Vec<SubscriberId> {
        self.channels().keys().copied().collect()
    }

    fn channels(&self) -> MutexGuard<'_, Channels> {
        // Critical sections never panic midway; a poisoned map is still consistent.
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle of one registered subscriber.
///
/// Receives emitted events; deregisters itself when dropped.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<Arc<Event>>,
    registry: Arc<SubscriberRegistry>,
}

impl Subscription {
    #[inline]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Waits for the next event. `None` once the registry dropped the channel.
    pub async fn recv(&mut self) -> Option<Arc<Event>> {
        self.rx.recv().await
    }

    /// Returns an already delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<Event>> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.unsubscribe(self.id);
    }
}
