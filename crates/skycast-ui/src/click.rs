//! Process-wide "click outside" listener.
//!
//! One subscriber at a time receives [`UiEvent::ClickOutside`] for clicks
//! that land anywhere but the search input or suggestion list. The
//! subscription is released when its handle drops, so a controller that is
//! torn down and rebuilt never leaves a stale listener behind.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use crate::events::UiEvent;

static GLOBAL_BUS: OnceLock<Arc<ClickBus>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    SearchInput,
    SuggestionList,
    Elsewhere,
}

impl ClickTarget {
    pub fn is_outside(self) -> bool {
        matches!(self, Self::Elsewhere)
    }
}

struct Subscriber {
    id: u64,
    tx: UnboundedSender<UiEvent>,
}

#[derive(Default)]
pub struct ClickBus {
    subscriber: Mutex<Option<Subscriber>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for ClickBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickBus")
            .field("subscribed", &self.has_subscriber())
            .finish()
    }
}

impl ClickBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The bus shared by the whole process
    pub fn global() -> Arc<Self> {
        GLOBAL_BUS.get_or_init(ClickBus::new).clone()
    }

    /// Register `tx` as the listener, replacing any previous one
    pub fn subscribe(self: &Arc<Self>, tx: UnboundedSender<UiEvent>) -> ClickSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let previous = self.subscriber.lock().replace(Subscriber { id, tx });
        if previous.is_some() {
            tracing::warn!("Replacing existing click-outside listener");
        }
        ClickSubscription {
            bus: Arc::clone(self),
            id,
        }
    }

    /// Deliver a click. Returns true if a listener was notified.
    pub fn dispatch(&self, target: ClickTarget) -> bool {
        if !target.is_outside() {
            return false;
        }
        match &*self.subscriber.lock() {
            Some(subscriber) => subscriber.tx.send(UiEvent::ClickOutside).is_ok(),
            None => false,
        }
    }

    pub fn has_subscriber(&self) -> bool {
        self.subscriber.lock().is_some()
    }

    fn unsubscribe(&self, id: u64) {
        let mut subscriber = self.subscriber.lock();
        if subscriber.as_ref().is_some_and(|s| s.id == id) {
            *subscriber = None;
            tracing::debug!("Click-outside listener removed");
        }
    }
}

/// Keeps a click listener registered for as long as it lives
#[must_use = "the listener is removed when the subscription is dropped"]
#[derive(Debug)]
pub struct ClickSubscription {
    bus: Arc<ClickBus>,
    id: u64,
}

impl Drop for ClickSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.id);
    }
}
