//! Pointer sample fan-out
//!
//! Every subscription gets its own unbounded channel. Publishing never
//! blocks; receivers drain at their own pace. Dropping a subscription
//! removes it from the bus.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tokio::sync::mpsc;

use super::Point;

/// Identifies one subscription on a bus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

#[derive(Debug, Default)]
struct BusInner {
    next_id: AtomicU64,
    subscribers: RwLock<HashMap<SubscriptionId, mpsc::UnboundedSender<Point>>>,
}

impl BusInner {
    fn remove(&self, id: SubscriptionId) -> bool {
        let removed = self.subscribers.write().remove(&id).is_some();
        if removed {
            tracing::debug!(%id, "Pointer subscription removed");
        }
        removed
    }
}

/// Shared source of pointer samples
///
/// Cloning yields another handle to the same bus.
#[derive(Clone, Debug, Default)]
pub struct PointerBus {
    inner: Arc<BusInner>,
}

impl PointerBus {
    /// Create an empty bus
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener
    #[must_use]
    pub fn subscribe(&self) -> PointerSubscription {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();

        self.inner.subscribers.write().insert(id, tx);
        tracing::debug!(%id, "Pointer subscription added");

        PointerSubscription {
            id,
            receiver: rx,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver a sample to every live subscription, returning how many got it
    pub fn publish(&self, sample: Point) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        {
            let subscribers = self.inner.subscribers.read();
            for (id, tx) in subscribers.iter() {
                if tx.send(sample).is_ok() {
                    delivered += 1;
                } else {
                    closed.push(*id);
                }
            }
        }

        for id in closed {
            self.inner.remove(id);
        }
        delivered
    }

    /// Number of registered subscriptions
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }
}

/// One listener's view of a [`PointerBus`]
///
/// Unsubscribes when dropped.
#[derive(Debug)]
pub struct PointerSubscription {
    id: SubscriptionId,
    receiver: mpsc::UnboundedReceiver<Point>,
    bus: Weak<BusInner>,
}

impl PointerSubscription {
    /// This subscription's id
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Next pending sample, if any
    pub fn try_next(&mut self) -> Option<Point> {
        self.receiver.try_recv().ok()
    }

    /// All pending samples, oldest first
    pub fn drain(&mut self) -> Vec<Point> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let bus = PointerBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        assert_ne!(a.id(), b.id());

        assert_eq!(bus.publish(Point::new(1.0, 2.0)), 2);
        assert_eq!(a.try_next(), Some(Point::new(1.0, 2.0)));
        assert_eq!(b.try_next(), Some(Point::new(1.0, 2.0)));
        assert_eq!(a.try_next(), None);
    }

    #[test]
    fn test_drain_preserves_order() {
        let bus = PointerBus::new();
        let mut sub = bus.subscribe();
        for i in 0..5 {
            bus.publish(Point::new(f64::from(i), 0.0));
        }
        let xs: Vec<f64> = sub.drain().into_iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = PointerBus::new();
        let sub = bus.subscribe();
        let _other = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(sub);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(bus.publish(Point::default()), 1);
    }

    #[test]
    fn test_subscription_outlives_bus() {
        let bus = PointerBus::new();
        let mut sub = bus.subscribe();
        bus.publish(Point::new(3.0, 3.0));
        drop(bus);

        assert_eq!(sub.try_next(), Some(Point::new(3.0, 3.0)));
        drop(sub);
    }

    #[test]
    fn test_clones_share_subscribers() {
        let bus = PointerBus::new();
        let handle = bus.clone();
        let mut sub = handle.subscribe();

        assert_eq!(bus.subscriber_count(), 1);
        bus.publish(Point::new(0.5, 0.5));
        assert!(sub.try_next().is_some());
    }
}
