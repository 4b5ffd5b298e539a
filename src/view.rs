//! Memoized selector views over the store.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;
#[cfg(any(test, feature = "testing"))]
#[cfg(feature = "no_std")]
use alloc::vec::Vec;

use portable_atomic_util::Arc;
use spin::Mutex;

use crate::store::{Store, Subscription};

/// Render seam for view consumers.
///
/// Implement this trait to deliver derived values into your rendering system
/// (UI framework, terminal, embedded display, etc.). The
/// [`render`](Self::render) method is called once with the initial derived
/// value when a view is bound, and once per state-changing publish
/// afterwards.
///
/// Function pointers and closures automatically implement this trait via the
/// blanket implementation.
pub trait Render<T> {
    /// Deliver a freshly derived value.
    fn render(&mut self, value: &T);
}

/// Implement Render for any callable type that matches the signature.
impl<T, F> Render<T> for F
where
    F: FnMut(&T),
{
    fn render(&mut self, value: &T) {
        self(value)
    }
}

struct ViewShared<State, T> {
    select: Box<dyn Fn(&State) -> T + Send + Sync>,
    value: Mutex<T>,
    renderer: Mutex<Box<dyn Render<T> + Send>>,
}

/// A derived value kept in sync with the store.
///
/// A view owns exactly one store subscription for its lifetime. The selector
/// runs once when the view is bound and once per state-changing publish;
/// [`value`](Self::value) reads the memoized result without re-running it.
/// Dropping the view tears the subscription down and stops further renders.
///
/// The derived value itself is never compared for equality: a selector
/// returning a fresh but equal value still renders on every publish.
pub struct View<State, T> {
    shared: Arc<ViewShared<State, T>>,
    _subscription: Subscription<State>,
}

impl<State, T> View<State, T>
where
    T: Clone,
{
    /// Clone of the memoized derived value. Never re-runs the selector.
    pub fn value(&self) -> T {
        self.shared.value.lock().clone()
    }
}

impl<State> Store<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Bind a selector and renderer to this store.
    ///
    /// Computes the initial derived value from the live current state and
    /// delivers one initial render, then renders exactly once per
    /// state-changing publish. The selector cannot be swapped after bind;
    /// bind a new view instead.
    pub fn bind<T, S, R>(&self, select: S, renderer: R) -> View<State, T>
    where
        T: Clone + Send + 'static,
        S: Fn(&State) -> T + Send + Sync + 'static,
        R: Render<T> + Send + 'static,
    {
        let initial = select(&self.current());
        let mut renderer = renderer;
        renderer.render(&initial);

        let shared = Arc::new(ViewShared {
            select: Box::new(select),
            value: Mutex::new(initial),
            renderer: Mutex::new(Box::new(renderer) as Box<dyn Render<T> + Send>),
        });

        let observer = shared.clone();
        let subscription = self.subscribe(move |state: &State| {
            let value = (observer.select)(state);
            // Cache before rendering so the renderer observes the new value.
            *observer.value.lock() = value.clone();
            observer.renderer.lock().render(&value);
        });

        View {
            shared,
            _subscription: subscription,
        }
    }

    /// Bind a selector without a renderer: a polling handle only.
    pub fn view<T, S>(&self, select: S) -> View<State, T>
    where
        T: Clone + Send + 'static,
        S: Fn(&State) -> T + Send + Sync + 'static,
    {
        self.bind(select, |_: &T| {})
    }
}

#[cfg(any(test, feature = "testing"))]
/// Test renderer that captures every rendered value for assertions.
///
/// Only available with the `testing` feature or during tests. Clones share
/// the same capture storage, so a clone can be handed to
/// [`Store::bind`] while the original inspects the renders.
///
/// # Example
///
/// ```rust
/// use fluxide::{StoreBuilder, TestRender};
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
/// let renders = TestRender::new();
/// let _view = store.bind(|s: &AppState| s.count, renders.clone());
///
/// dispatch.dispatch(AppAction::Increment).unwrap();
///
/// assert_eq!(renders.count(), 2);
/// renders.with_renders(|values| {
///     assert_eq!(values, &[0, 1]);
/// });
/// ```
pub struct TestRender<T> {
    renders: Arc<Mutex<Vec<T>>>,
}

#[cfg(any(test, feature = "testing"))]
impl<T> Clone for TestRender<T> {
    fn clone(&self) -> Self {
        TestRender {
            renders: self.renders.clone(),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl<T: Clone> Render<T> for TestRender<T> {
    fn render(&mut self, value: &T) {
        self.renders.lock().push(value.clone());
    }
}

#[cfg(any(test, feature = "testing"))]
impl<T> Default for TestRender<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl<T> TestRender<T> {
    pub fn new() -> Self {
        TestRender {
            renders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of renders delivered so far.
    pub fn count(&self) -> usize {
        self.renders.lock().len()
    }

    /// Access the captured renders with a closure.
    pub fn with_renders<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Vec<T>) -> R,
    {
        let renders = self.renders.lock();
        f(&renders)
    }
}
