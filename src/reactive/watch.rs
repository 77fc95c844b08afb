use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::runtime::{ObserverId, Runtime};
use super::signal::{Observable, Subscription};

struct WatchState<T> {
    getter: Box<dyn Fn() -> T>,
    on_change: Box<dyn Fn(T)>,
    last: RefCell<T>,
}

impl<T: Clone + PartialEq> WatchState<T> {
    fn run(&self) -> bool {
        let next = (self.getter)();
        if *self.last.borrow() == next {
            return false;
        }
        *self.last.borrow_mut() = next.clone();
        (self.on_change)(next);
        true
    }
}

/// Change-watcher over an explicit set of sources.
///
/// Whenever a tracked source notifies, the getter is re-evaluated and
/// `on_change` receives the new value if it differs from the last one seen.
/// All sources share one observer id, so changes made inside one
/// [`Runtime::batch`] produce a single evaluation.
pub struct Watch<T> {
    id: ObserverId,
    state: Rc<WatchState<T>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl<T: Clone + PartialEq + 'static> Watch<T> {
    /// Evaluates `getter` once to seed the baseline; `on_change` is not called.
    pub fn new(
        runtime: &Runtime,
        getter: impl Fn() -> T + 'static,
        on_change: impl Fn(T) + 'static,
    ) -> Self {
        let initial = getter();
        Self {
            id: runtime.next_observer_id(),
            state: Rc::new(WatchState {
                getter: Box::new(getter),
                on_change: Box::new(on_change),
                last: RefCell::new(initial),
            }),
            subscriptions: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_source(self, source: &dyn Observable) -> Self {
        self.track(source);
        self
    }

    pub fn track(&self, source: &dyn Observable) {
        let weak: Weak<WatchState<T>> = Rc::downgrade(&self.state);
        let subscription = source.observe_with(
            self.id,
            Rc::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.run();
                }
            }),
        );
        self.subscriptions.borrow_mut().push(subscription);
    }

    /// Re-evaluates immediately, outside of any notification.
    ///
    /// Returns `true` when `on_change` ran.
    pub fn trigger(&self) -> bool {
        self.state.run()
    }

    #[must_use]
    pub fn last(&self) -> T {
        self.state.last.borrow().clone()
    }

    #[must_use]
    pub fn source_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Drops every source subscription.
    pub fn stop(&self) {
        self.subscriptions.borrow_mut().clear();
    }
}
