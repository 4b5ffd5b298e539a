//! Validated container construction.

#[cfg(feature = "no_std")]
use alloc::{boxed::Box, vec::Vec};

use portable_atomic_util::Arc;

use crate::dispatch::{Dispatcher, ErrorPolicy};
use crate::error::BuildError;
use crate::middleware::Middleware;
use crate::slice::SliceReducer;
use crate::store::Store;

/// Builds one independent state container.
///
/// Collects the initial composite state, the slice reducer registry, the
/// middleware chain, and the error policy, then validates the registry and
/// yields the `(dispatch, store)` pair. Every `build` call produces a fully
/// independent container; nothing is shared between them.
///
/// See the [crate-level documentation](crate) for a complete example.
pub struct StoreBuilder<State, Action> {
    initial: State,
    slices: Vec<SliceReducer<State, Action>>,
    middleware: Vec<Box<dyn Middleware<State, Action> + Send + Sync>>,
    policy: ErrorPolicy,
}

impl<State, Action> StoreBuilder<State, Action>
where
    State: Clone + Send + Sync + 'static,
{
    /// Start a builder from the initial composite state.
    pub fn new(initial: State) -> Self {
        StoreBuilder {
            initial,
            slices: Vec::new(),
            middleware: Vec::new(),
            policy: ErrorPolicy::default(),
        }
    }

    /// Register a named slice: a lens pair over the composite plus the pure
    /// reducer owning that slice. Registration order is the reduction order.
    pub fn slice<V, G, P, R>(mut self, name: &'static str, get: G, put: P, reduce: R) -> Self
    where
        V: PartialEq + 'static,
        G: Fn(&State) -> V + Send + Sync + 'static,
        P: Fn(&mut State, V) + Send + Sync + 'static,
        R: Fn(&V, &Action) -> V + Send + Sync + 'static,
    {
        self.slices.push(SliceReducer::new(name, get, put, reduce));
        self
    }

    /// Register a prebuilt [`SliceReducer`].
    pub fn register(mut self, slice: SliceReducer<State, Action>) -> Self {
        self.slices.push(slice);
        self
    }

    /// Append a middleware stage. Stages run in registration order.
    pub fn middleware<M>(mut self, stage: M) -> Self
    where
        M: Middleware<State, Action> + Send + Sync + 'static,
    {
        self.middleware.push(Box::new(stage));
        self
    }

    /// Choose what happens when a middleware stage fails. The default is
    /// [`ErrorPolicy::Suppress`].
    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate the registry and construct the container.
    ///
    /// Fails on a duplicate slice name or an empty registry. The returned
    /// dispatcher and store are clones over the same shared container.
    pub fn build(self) -> Result<(Dispatcher<State, Action>, Store<State>), BuildError> {
        if self.slices.is_empty() {
            return Err(BuildError::EmptyRegistry);
        }
        for (i, slice) in self.slices.iter().enumerate() {
            if self.slices[..i].iter().any(|other| other.name() == slice.name()) {
                return Err(BuildError::DuplicateSlice(slice.name()));
            }
        }

        let store = Store::new(self.initial);
        let dispatcher = Dispatcher::new(
            store.clone(),
            Arc::new(self.slices),
            Arc::new(self.middleware),
            self.policy,
        );
        Ok((dispatcher, store))
    }
}
