//! Observer trait and ordered fan-out.
//!
//! Observers are callback targets: they receive snapshots, informational
//! messages, and error messages, and never hold a reference back to the
//! simulation. [`ObserverList`] keeps them in registration order and
//! delivers each notification to every observer before moving to the next.

use std::sync::Arc;

use ascent_types::{Notification, Snapshot};
use parking_lot::RwLock;

/// A sink for simulation notifications.
///
/// Methods take `&self` because the same handle is shared between the list
/// and whoever registered it; implementations that record state use interior
/// mutability.
pub trait FlightObserver: Send + Sync {
    /// Called with the full state after every tick.
    fn on_snapshot(&self, snapshot: &Snapshot);

    /// Called with an informational message.
    fn on_info(&self, message: &str);

    /// Called with an error message.
    fn on_error(&self, message: &str);

    /// Route a notification to the matching channel.
    fn notify(&self, notification: &Notification) {
        match notification {
            Notification::Snapshot { snapshot } => self.on_snapshot(snapshot),
            Notification::Info { message } => self.on_info(message),
            Notification::Error { message } => self.on_error(message),
        }
    }
}

/// An observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl FlightObserver for NoOpObserver {
    fn on_snapshot(&self, _snapshot: &Snapshot) {}
    fn on_info(&self, _message: &str) {}
    fn on_error(&self, _message: &str) {}
}

/// Ordered sequence of observers.
#[derive(Default)]
pub struct ObserverList {
    observers: RwLock<Vec<Arc<dyn FlightObserver>>>,
}

impl ObserverList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observer. The same handle may be registered twice, in
    /// which case it is notified twice.
    pub fn push(&self, observer: Arc<dyn FlightObserver>) {
        self.observers.write().push(observer);
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Whether no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    /// Deliver `outbox` in order to every observer in registration order.
    ///
    /// Iterates a copy of the list, so an observer that registers another
    /// observer while being notified does not affect this delivery.
    pub fn deliver(&self, outbox: &[Notification]) {
        if outbox.is_empty() {
            return;
        }
        let observers: Vec<Arc<dyn FlightObserver>> = self.observers.read().clone();
        for notification in outbox {
            for observer in &observers {
                observer.notify(notification);
            }
        }
    }
}

impl std::fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList")
            .field("len", &self.len())
            .finish()
    }
}
