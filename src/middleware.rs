//! Middleware seam for the dispatch pipeline.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;

use core::fmt::Debug;

/// Error type a middleware stage may fail with.
pub type MiddlewareError = Box<dyn core::error::Error + Send + Sync>;

/// An interposed stage between a state-changing dispatch and its publish.
///
/// Stages run in registration order, only when a dispatch actually changed
/// at least one slice. Each stage observes the candidate composite state and
/// the original action; invoking `next` advances to the following stage (the
/// last stage's `next` is the terminal publish). `next` takes no arguments:
/// middleware can observe or halt propagation, but cannot rewrite the state
/// or action seen downstream.
///
/// Not calling `next` halts the remaining pipeline for that dispatch only.
/// Returning an error aborts the chain; whether the error surfaces from
/// `dispatch` is decided by the container's
/// [`ErrorPolicy`](crate::ErrorPolicy).
///
/// Function pointers and closures automatically implement this trait via the
/// blanket implementation.
pub trait Middleware<State, Action> {
    /// Run this stage for one state-changing dispatch.
    fn handle(
        &self,
        state: &State,
        action: &Action,
        next: &mut dyn FnMut(),
    ) -> Result<(), MiddlewareError>;
}

/// Implement Middleware for any callable type that matches the signature.
impl<State, Action, F> Middleware<State, Action> for F
where
    F: Fn(&State, &Action, &mut dyn FnMut()) -> Result<(), MiddlewareError>,
{
    fn handle(
        &self,
        state: &State,
        action: &Action,
        next: &mut dyn FnMut(),
    ) -> Result<(), MiddlewareError> {
        self(state, action, next)
    }
}

/// Middleware that logs every state-changing action at `info` level and
/// passes the dispatch through unchanged.
///
/// # Example
///
/// ```rust
/// use fluxide::{ActionLog, StoreBuilder};
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
///     .middleware(ActionLog)
///     .build()
///     .unwrap();
///
/// dispatch.dispatch(AppAction::Increment).unwrap();
/// assert_eq!(store.current().count, 1);
/// ```
pub struct ActionLog;

impl<State, Action: Debug> Middleware<State, Action> for ActionLog {
    fn handle(
        &self,
        _state: &State,
        action: &Action,
        next: &mut dyn FnMut(),
    ) -> Result<(), MiddlewareError> {
        log::info!("action: {action:?}");
        next();
        Ok(())
    }
}
