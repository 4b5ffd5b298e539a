//! Composite state ownership and synchronous publish/subscribe.

#[cfg(feature = "no_std")]
use alloc::{boxed::Box, vec::Vec};

use portable_atomic_util::{Arc, Weak};
use spin::Mutex;

type Notify<State> = Arc<Box<dyn Fn(&State) + Send + Sync>>;

struct Entry<State> {
    id: u64,
    notify: Notify<State>,
}

impl<State> Clone for Entry<State> {
    fn clone(&self) -> Self {
        Entry {
            id: self.id,
            notify: self.notify.clone(),
        }
    }
}

struct Registry<State> {
    next_id: u64,
    entries: Vec<Entry<State>>,
}

pub(crate) struct StoreInner<State> {
    state: Mutex<State>,
    subscribers: Mutex<Registry<State>>,
}

/// Holds the current composite state and broadcasts replacements.
///
/// The store owns exactly one composite state value at a time; the state is
/// replaced wholesale on every effective dispatch, never mutated in place.
/// Broadcasts are synchronous and run in subscription order on the caller's
/// thread of control.
///
/// `Store` is a cheap handle: clones share the same state and subscriber
/// list. Each [`StoreBuilder::build`](crate::StoreBuilder::build) call yields
/// an independent store; there is no process-wide instance.
pub struct Store<State> {
    inner: Arc<StoreInner<State>>,
}

impl<State> Clone for Store<State> {
    fn clone(&self) -> Self {
        Store {
            inner: self.inner.clone(),
        }
    }
}

impl<State> Store<State>
where
    State: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(initial: State) -> Self {
        Store {
            inner: Arc::new(StoreInner {
                state: Mutex::new(initial),
                subscribers: Mutex::new(Registry {
                    next_id: 0,
                    entries: Vec::new(),
                }),
            }),
        }
    }

    /// Clone of the current composite state. No side effects.
    pub fn current(&self) -> State {
        self.inner.state.lock().clone()
    }

    /// Replace the current state, then synchronously invoke every active
    /// subscriber with the new state, in subscription order.
    ///
    /// Broadcast iterates a snapshot of the subscriber list taken after the
    /// replace, so dropping a [`Subscription`] from inside a callback does
    /// not disturb the in-flight delivery to the remaining subscribers. A
    /// store with zero subscribers publishes as a no-op broadcast.
    ///
    /// [`Dispatcher`](crate::Dispatcher) is the normal writer; publishing
    /// directly bypasses reducers, the equality short-circuit, and the
    /// middleware chain.
    pub fn publish(&self, new_state: State) {
        *self.inner.state.lock() = new_state.clone();
        let snapshot: Vec<Entry<State>> = self.inner.subscribers.lock().entries.clone();
        for entry in &snapshot {
            (*entry.notify)(&new_state);
        }
    }

    /// Register a callback invoked on every publish.
    ///
    /// Returns a [`Subscription`] guard; dropping it deregisters the
    /// callback. The current value is not delivered on subscribe.
    pub fn subscribe<F>(&self, callback: F) -> Subscription<State>
    where
        F: Fn(&State) + Send + Sync + 'static,
    {
        let mut registry = self.inner.subscribers.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            notify: Arc::new(Box::new(callback)),
        });
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// RAII guard for a store subscription.
///
/// Dropping the guard removes the callback from the store's subscriber
/// list. Dropping after the store itself is gone is a no-op.
pub struct Subscription<State> {
    id: u64,
    inner: Weak<StoreInner<State>>,
}

impl<State> Drop for Subscription<State> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.subscribers.lock().entries.retain(|entry| entry.id != self.id);
        }
    }
}
