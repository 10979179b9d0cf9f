//! In-process change feed for the group taxonomy.
//!
//! The repository publishes one [`GroupChange`] per affected row after a
//! write commits. Subscribers treat every event as "invalidate and re-query";
//! events carry no data beyond the affected id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::domain::types::GroupId;

/// Kind of write that produced a [`GroupChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupChangeKind {
    Insert,
    Update,
    Delete,
}

/// Notification that a taxonomy row changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupChange {
    pub kind: GroupChangeKind,
    pub id: GroupId,
}

impl GroupChange {
    pub fn inserted(id: GroupId) -> Self {
        Self {
            kind: GroupChangeKind::Insert,
            id,
        }
    }

    pub fn updated(id: GroupId) -> Self {
        Self {
            kind: GroupChangeKind::Update,
            id,
        }
    }

    pub fn deleted(id: GroupId) -> Self {
        Self {
            kind: GroupChangeKind::Delete,
            id,
        }
    }
}

type Callback = Arc<dyn Fn(&GroupChange) + Send + Sync>;

/// Registry of change subscribers.
#[derive(Default)]
pub struct ChangeFeed {
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<u64, Callback>>,
}

impl std::fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl ChangeFeed {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers `callback`; it stays registered until the returned
    /// [`Subscription`] is dropped or unsubscribed.
    pub fn subscribe<F>(self: &Arc<Self>, callback: F) -> Subscription
    where
        F: Fn(&GroupChange) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(callback));
        Subscription {
            feed: Arc::downgrade(self),
            id,
        }
    }

    /// Delivers `change` to every current subscriber.
    pub fn publish(&self, change: GroupChange) {
        // Callbacks run outside the lock so they may subscribe or unsubscribe.
        let callbacks: Vec<Callback> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(&change);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn remove(&self, id: u64) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}

/// Token returned by [`ChangeFeed::subscribe`].
#[derive(Debug)]
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    feed: Weak<ChangeFeed>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(feed) = self.feed.upgrade() {
            feed.remove(self.id);
        }
    }
}
