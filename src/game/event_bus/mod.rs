//! Typed publish/subscribe bus.
//!
//! Every event type gets its own channel, keyed by `TypeId`. Delivery is
//! synchronous: `publish` runs every handler on the calling thread before it
//! returns, in subscription order.
//!
//! Handlers are free to touch the bus while they run (subscribe, unsubscribe,
//! publish). The handler list is snapshotted before delivery and no lock is
//! held while a handler executes, so a handler removed mid-delivery still sees
//! the event in flight and nothing after it.

use std::any::{Any, TypeId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;


type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
    channel: TypeId,
}

/// Type-erased view of a channel, so removal works without knowing `E`.
trait ErasedChannel: Send {
    fn remove_handler(&mut self, id: u64) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Channel<E> {
    handlers: Vec<(u64, Handler<E>)>,
}

impl<E: 'static> ErasedChannel for Channel<E> {
    fn remove_handler(&mut self, id: u64) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    channels: FxHashMap<TypeId, Box<dyn ErasedChannel>>,
}

impl BusInner {
    fn channel<E: 'static>(&self) -> Option<&Channel<E>> {
        self.channels
            .get(&TypeId::of::<E>())
            .and_then(|c| c.as_any().downcast_ref::<Channel<E>>())
    }

    fn channel_mut<E: 'static>(&mut self) -> Option<&mut Channel<E>> {
        if !self.channels.contains_key(&TypeId::of::<E>()) {
            self.channels.insert(
                TypeId::of::<E>(),
                Box::new(Channel::<E> { handlers: Vec::new() }),
            );
        }
        self.channels
            .get_mut(&TypeId::of::<E>())
            .and_then(|c| c.as_any_mut().downcast_mut::<Channel<E>>())
    }
}

/// Process-wide event bus. Cloning yields another handle to the same channels.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BusInner> {
        // Handlers never run under the lock, so a poisoned mutex still holds
        // consistent data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `handler` for events of type `E`.
    pub fn subscribe<E, F>(&self, handler: F) -> Subscription
    where
        E: 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        if let Some(channel) = inner.channel_mut::<E>() {
            channel.handlers.push((id, Arc::new(handler)));
        }
        Subscription { id, channel: TypeId::of::<E>() }
    }

    /// Remove a handler. Returns `false` if it was not registered (already
    /// removed, or dropped by [`EventBus::clear`]).
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut inner = self.lock();
        match inner.channels.get_mut(&subscription.channel) {
            Some(channel) => channel.remove_handler(subscription.id),
            None => false,
        }
    }

    /// Deliver `event` to every handler currently subscribed to `E`.
    pub fn publish<E: 'static>(&self, event: &E) {
        let snapshot: Vec<Handler<E>> = {
            let inner = self.lock();
            match inner.channel::<E>() {
                Some(channel) => channel.handlers.iter().map(|(_, h)| Arc::clone(h)).collect(),
                None => return,
            }
        };

        for handler in snapshot {
            handler(event);
        }
    }

    pub fn subscriber_count<E: 'static>(&self) -> usize {
        self.lock().channel::<E>().map_or(0, |c| c.handlers.len())
    }

    /// Drop every channel and handler. Outstanding subscriptions become inert.
    pub fn clear(&self) {
        self.lock().channels.clear();
    }
}
