#![cfg_attr(feature = "no_std", no_std)]

//! A minimal reactive state container for Rust with `no_std` support.
//!
//! State lives in a single composite value partitioned into named slices.
//! Each slice is owned by a pure reducer; dispatching an action fans out over
//! every registered reducer, short-circuits when no slice changed, runs the
//! configured middleware chain, and finally publishes the new composite to
//! all subscribers. Views give consumers a memoized derived value that is
//! recomputed once per state-changing publish.
//!
//! ## Example
//!
//! ```rust
//! use fluxide::{ActionLog, StoreBuilder, Thunk};
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     count: i32,
//! }
//!
//! #[derive(Debug)]
//! enum AppAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! fn count(value: &i32, action: &AppAction) -> i32 {
//!     match action {
//!         AppAction::Increment => value + 1,
//!         AppAction::Decrement => value - 1,
//!     }
//! }
//!
//! let (dispatch, store) = StoreBuilder::new(AppState::default())
//!     .slice("count", |s: &AppState| s.count, |s: &mut AppState, v| s.count = v, count)
//!     .middleware(ActionLog)
//!     .build()
//!     .expect("slice names are unique");
//!
//! let view = store.view(|state: &AppState| state.count);
//!
//! dispatch.dispatch(AppAction::Increment).unwrap();
//! assert_eq!(view.value(), 1);
//!
//! // Thunks defer dispatch logic and read the live state while running.
//! dispatch
//!     .dispatch(Thunk::new(|dispatch, get_state: &dyn Fn() -> AppState| {
//!         assert_eq!(get_state().count, 1);
//!         dispatch.dispatch(AppAction::Increment).unwrap();
//!         dispatch.dispatch(AppAction::Decrement).unwrap();
//!     }))
//!     .unwrap();
//! assert_eq!(view.value(), 1);
//! ```

#[cfg(feature = "no_std")]
extern crate alloc;

// Module declarations
mod builder;
mod dispatch;
mod error;
mod middleware;
mod slice;
mod store;
mod view;

// Public re-exports
pub use builder::StoreBuilder;
pub use dispatch::{Dispatcher, ErrorPolicy, Payload, Thunk};
pub use error::{BuildError, DispatchError};
pub use middleware::{ActionLog, Middleware, MiddlewareError};
pub use slice::SliceReducer;
pub use store::{Store, Subscription};
pub use view::{Render, View};

// Test utilities (only available with 'testing' feature or during tests)
#[cfg(any(test, feature = "testing"))]
pub use view::TestRender;
