//! Error types for container construction and dispatch.

use thiserror::Error;

use crate::middleware::MiddlewareError;

/// Rejected container configuration.
///
/// Returned by [`StoreBuilder::build`](crate::StoreBuilder::build). The slice
/// registry is validated once at construction; nothing can be registered
/// afterwards.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Two slice reducers were registered under the same name.
    #[error("duplicate slice reducer registered for `{0}`")]
    DuplicateSlice(&'static str),
    /// No slice reducers were registered; such a container could never
    /// change state.
    #[error("no slice reducers registered")]
    EmptyRegistry,
}

/// A dispatch that could not run its pipeline to completion.
///
/// Only surfaced under [`ErrorPolicy::Strict`](crate::ErrorPolicy::Strict);
/// the default policy suppresses middleware failures.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A middleware stage returned an error before the chain finished.
    #[error("middleware stage {index} failed: {source}")]
    Middleware {
        /// Position of the failing stage in registration order.
        index: usize,
        source: MiddlewareError,
    },
}
