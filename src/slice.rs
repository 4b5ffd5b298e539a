//! Named slice reducers over the composite state.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;

type Apply<State, Action> = Box<dyn Fn(&State, &mut State, &Action) -> bool + Send + Sync>;

/// One named partition of the composite state, bound to its reducer.
///
/// A slice reducer couples a lens over the composite (`get`/`put`) with a
/// pure reducer `(slice value, action) -> slice value`. The registry of
/// slice reducers is fixed at construction via
/// [`StoreBuilder`](crate::StoreBuilder); the set of names defines the state
/// shape for the container's lifetime.
pub struct SliceReducer<State, Action> {
    name: &'static str,
    apply: Apply<State, Action>,
}

impl<State, Action> SliceReducer<State, Action> {
    /// Create a slice reducer from a lens pair and a pure reducer.
    ///
    /// `get` reads the slice value out of the composite, `put` writes a new
    /// slice value into it, and `reduce` computes the next slice value for
    /// an action. Reducers that do not match the action must return their
    /// input value unchanged; the equality short-circuit relies on it.
    pub fn new<V, G, P, R>(name: &'static str, get: G, put: P, reduce: R) -> Self
    where
        V: PartialEq + 'static,
        G: Fn(&State) -> V + Send + Sync + 'static,
        P: Fn(&mut State, V) + Send + Sync + 'static,
        R: Fn(&V, &Action) -> V + Send + Sync + 'static,
    {
        SliceReducer {
            name,
            apply: Box::new(move |current, candidate, action| {
                let previous = get(current);
                let value = reduce(&previous, action);
                if value == previous {
                    false
                } else {
                    put(candidate, value);
                    true
                }
            }),
        }
    }

    /// The slice's registered name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reduce this slice against `action`, writing a changed value into
    /// `candidate`. Returns whether the slice value changed.
    pub(crate) fn apply(&self, current: &State, candidate: &mut State, action: &Action) -> bool {
        (self.apply)(current, candidate, action)
    }
}
