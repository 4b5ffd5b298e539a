//! The dispatch pipeline: payload routing, reducer fan-out, equality
//! short-circuit, and the middleware chain.

#[cfg(feature = "no_std")]
use alloc::{boxed::Box, vec::Vec};

use portable_atomic_util::Arc;

use crate::error::DispatchError;
use crate::middleware::Middleware;
use crate::slice::SliceReducer;
use crate::store::Store;

/// A deferred unit of dispatch logic.
///
/// A thunk runs immediately when dispatched, receiving the dispatcher (for
/// nested dispatches) and a live state accessor. The thunk itself produces
/// no state change; only the actions it dispatches do.
///
/// # Example
///
/// ```rust
/// use fluxide::{StoreBuilder, Thunk};
///
/// # #[derive(Clone, Default)]
/// # struct AppState { count: i32 }
/// # #[derive(Debug)]
/// # enum AppAction { Increment }
/// # fn count(value: &i32, action: &AppAction) -> i32 {
/// #     match action { AppAction::Increment => value + 1 }
/// # }
/// let (dispatch, store) = StoreBuilder::new(AppState::default())
///     .slice("count", |s: &AppState| s.count, |s: &mut AppState, v| s.count = v, count)
///     .build()
///     .unwrap();
///
/// dispatch
///     .dispatch(Thunk::new(|dispatch, get_state: &dyn Fn() -> AppState| {
///         assert_eq!(get_state().count, 0);
///         dispatch.dispatch(AppAction::Increment).unwrap();
///         // The accessor reads the live state, not a snapshot.
///         assert_eq!(get_state().count, 1);
///     }))
///     .unwrap();
///
/// assert_eq!(store.current().count, 1);
/// ```
pub struct Thunk<State, Action>(
    Box<dyn FnOnce(&Dispatcher<State, Action>, &dyn Fn() -> State) + Send>,
);

impl<State, Action> Thunk<State, Action> {
    /// Wrap a thunk body for dispatch.
    pub fn new<F>(body: F) -> Self
    where
        F: FnOnce(&Dispatcher<State, Action>, &dyn Fn() -> State) + Send + 'static,
    {
        Thunk(Box::new(body))
    }
}

/// What a dispatcher accepts: a plain action or a [`Thunk`].
///
/// Both convert via `From`, so callers pass either directly to
/// [`Dispatcher::dispatch`].
pub enum Payload<State, Action> {
    /// A plain action routed through the reducer registry.
    Action(Action),
    /// A deferred dispatch body, invoked immediately with no publish of its
    /// own.
    Thunk(Thunk<State, Action>),
}

impl<State, Action> From<Action> for Payload<State, Action> {
    fn from(action: Action) -> Self {
        Payload::Action(action)
    }
}

impl<State, Action> From<Thunk<State, Action>> for Payload<State, Action> {
    fn from(thunk: Thunk<State, Action>) -> Self {
        Payload::Thunk(thunk)
    }
}

/// What happens when a middleware stage fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Drop the error after a `warn` log; `dispatch` reports success. The
    /// pending publish for that dispatch is lost if the failing stage ran
    /// before the terminal stage.
    #[default]
    Suppress,
    /// Surface the error from `dispatch` as
    /// [`DispatchError::Middleware`](crate::DispatchError::Middleware).
    Strict,
}

/// Routes one payload into at most one store publish.
///
/// For a plain action the dispatcher runs every registered slice reducer,
/// short-circuits when no slice changed, and otherwise executes the
/// middleware chain ending in the terminal publish. For a [`Thunk`] it runs
/// the thunk body immediately; only the thunk's own dispatches publish.
///
/// Dispatch is reentrant: a thunk may dispatch synchronously any number of
/// times, and each nested dispatch runs its own pipeline to completion
/// before control returns to the thunk body.
///
/// `Dispatcher` is a cheap handle; clones share the registry, chain, and
/// store.
pub struct Dispatcher<State, Action> {
    store: Store<State>,
    slices: Arc<Vec<SliceReducer<State, Action>>>,
    middleware: Arc<Vec<Box<dyn Middleware<State, Action> + Send + Sync>>>,
    policy: ErrorPolicy,
}

impl<State, Action> Clone for Dispatcher<State, Action> {
    fn clone(&self) -> Self {
        Dispatcher {
            store: self.store.clone(),
            slices: self.slices.clone(),
            middleware: self.middleware.clone(),
            policy: self.policy,
        }
    }
}

impl<State, Action> Dispatcher<State, Action>
where
    State: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(
        store: Store<State>,
        slices: Arc<Vec<SliceReducer<State, Action>>>,
        middleware: Arc<Vec<Box<dyn Middleware<State, Action> + Send + Sync>>>,
        policy: ErrorPolicy,
    ) -> Self {
        Dispatcher {
            store,
            slices,
            middleware,
            policy,
        }
    }

    /// Dispatch a plain action or a thunk.
    ///
    /// Errors are only possible for plain actions under
    /// [`ErrorPolicy::Strict`]; every other path reports success.
    pub fn dispatch(&self, payload: impl Into<Payload<State, Action>>) -> Result<(), DispatchError> {
        match payload.into() {
            Payload::Action(action) => self.apply(action),
            Payload::Thunk(thunk) => {
                let store = self.store.clone();
                (thunk.0)(self, &move || store.current());
                Ok(())
            }
        }
    }

    fn apply(&self, action: Action) -> Result<(), DispatchError> {
        let current = self.store.current();
        let mut candidate = current.clone();
        let mut changed = false;
        // Every slice reduces against every action; unchanged slices keep
        // their previous value in the candidate.
        for slice in self.slices.iter() {
            if slice.apply(&current, &mut candidate, &action) {
                changed = true;
            }
        }
        if !changed {
            return Ok(());
        }
        match self.run_stage(0, &candidate, &action) {
            Ok(()) => Ok(()),
            Err(error) => match self.policy {
                ErrorPolicy::Suppress => {
                    log::warn!("middleware chain aborted: {error}");
                    Ok(())
                }
                ErrorPolicy::Strict => Err(error),
            },
        }
    }

    /// Chain-of-responsibility driver. Stage `index` past the end is the
    /// implicit terminal stage that publishes the candidate.
    fn run_stage(
        &self,
        index: usize,
        candidate: &State,
        action: &Action,
    ) -> Result<(), DispatchError> {
        let Some(stage) = self.middleware.get(index) else {
            self.store.publish(candidate.clone());
            return Ok(());
        };
        let mut downstream = Ok(());
        let result = stage.handle(candidate, action, &mut || {
            downstream = self.run_stage(index + 1, candidate, action);
        });
        if downstream.is_err() {
            return downstream;
        }
        result.map_err(|source| DispatchError::Middleware { index, source })
    }
}
