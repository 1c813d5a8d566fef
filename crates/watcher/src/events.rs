//! Typed publish/subscribe for [`BlockEvent`]s.
//!
//! Every listener owns an unbounded channel, so emitting never blocks the
//! watcher and a slow listener never loses an event. Listeners are kept in
//! registration order and each one sees events in emission order.

use faucet_types::BlockEvent;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

pub type ListenerId = u64;

#[derive(Debug, Default)]
struct Listeners {
    next_id: ListenerId,
    senders: BTreeMap<ListenerId, UnboundedSender<BlockEvent>>,
}

#[derive(Debug, Default)]
pub struct BlockEventBus {
    listeners: Arc<Mutex<Listeners>>,
}

impl BlockEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(listeners: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
        listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> BlockSubscription {
        let (sender, receiver) = unbounded_channel();
        let mut listeners = Self::lock(&self.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.senders.insert(id, sender);

        BlockSubscription {
            id,
            receiver,
            bus: Arc::downgrade(&self.listeners),
        }
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        Self::lock(&self.listeners).senders.remove(&id).is_some()
    }

    /// Delivers `event` to every listener and returns how many received it.
    /// Listeners whose receiving side is gone are pruned.
    pub fn emit(&self, event: &BlockEvent) -> usize {
        let mut listeners = Self::lock(&self.listeners);
        listeners
            .senders
            .retain(|_, sender| sender.send(event.clone()).is_ok());
        listeners.senders.len()
    }

    pub fn listener_count(&self) -> usize {
        Self::lock(&self.listeners).senders.len()
    }
}

/// Receiving end of one listener. Dropping it unregisters the listener.
#[derive(Debug)]
pub struct BlockSubscription {
    id: ListenerId,
    receiver: UnboundedReceiver<BlockEvent>,
    bus: Weak<Mutex<Listeners>>,
}

impl BlockSubscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Next event, or `None` once the listener is unregistered or the bus is
    /// gone and all buffered events were drained.
    pub async fn recv(&mut self) -> Option<BlockEvent> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<BlockEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for BlockSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.bus.upgrade() {
            BlockEventBus::lock(&listeners).senders.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(number: u64) -> BlockEvent {
        BlockEvent::new(number, format!("0x{:02x}", number))
    }

    #[tokio::test]
    async fn test_every_listener_sees_events_in_order() {
        let bus = BlockEventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        for n in 1..=3 {
            assert_eq!(bus.emit(&event(n)), 2);
        }

        for n in 1..=3 {
            assert_eq!(first.recv().await, Some(event(n)));
            assert_eq!(second.recv().await, Some(event(n)));
        }
    }

    #[test]
    fn test_unsubscribe_absent_listener_is_noop() {
        let bus = BlockEventBus::new();
        let subscription = bus.subscribe();

        assert!(bus.unsubscribe(subscription.id()));
        assert!(!bus.unsubscribe(subscription.id()));
        assert!(!bus.unsubscribe(42));
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_dropping_subscription_unregisters() {
        let bus = BlockEventBus::new();
        let subscription = bus.subscribe();
        assert_eq!(bus.listener_count(), 1);

        drop(subscription);
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(bus.emit(&event(1)), 0);
    }

    #[tokio::test]
    async fn test_unsubscribed_listener_stops_receiving() {
        let bus = BlockEventBus::new();
        let mut subscription = bus.subscribe();

        bus.emit(&event(1));
        bus.unsubscribe(subscription.id());
        bus.emit(&event(2));

        assert_eq!(subscription.recv().await, Some(event(1)));
        assert_eq!(subscription.recv().await, None);
    }

    #[test]
    fn test_subscription_outliving_bus_does_not_panic() {
        let bus = BlockEventBus::new();
        let mut subscription = bus.subscribe();
        drop(bus);

        assert_eq!(subscription.try_recv(), None);
        drop(subscription);
    }
}
