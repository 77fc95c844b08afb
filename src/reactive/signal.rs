use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use super::runtime::{Callback, ObserverId, Runtime};

type ObserverList = SmallVec<[(ObserverId, Callback); 4]>;

/// Anything whose changes can be observed through the host update cycle.
pub trait Observable {
    /// Registers `callback` under `id`. The registration lasts as long as the
    /// returned [`Subscription`].
    fn observe_with(&self, id: ObserverId, callback: Callback) -> Subscription;
}

/// Guard for one observer registration; dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Keeps the observer registered for the lifetime of the source.
    pub fn detach(mut self) {
        self.cancel = None;
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

struct SignalInner<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    observers: RefCell<ObserverList>,
    runtime: Runtime,
}

/// Observable reference cell.
///
/// Cloning a signal clones the handle, not the value.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Signal<T> {
    #[must_use]
    pub fn new(runtime: &Runtime, value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                value: RefCell::new(value),
                version: Cell::new(0),
                observers: RefCell::new(SmallVec::new()),
                runtime: runtime.clone(),
            }),
        }
    }

    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    /// Writes `value` only when it differs from the current one.
    ///
    /// Returns `true` when observers were notified.
    pub fn set_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        if *self.inner.value.borrow() == value {
            return false;
        }
        self.set(value);
        true
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.borrow_mut());
        self.notify();
    }

    /// Number of writes observed so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    #[must_use]
    pub fn runtime(&self) -> &Runtime {
        &self.inner.runtime
    }

    /// Subscribes a standalone observer.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let id = self.inner.runtime.next_observer_id();
        self.observe_with(id, Rc::new(callback))
    }

    fn notify(&self) {
        self.inner.version.set(self.inner.version.get() + 1);
        let observers: ObserverList = self.inner.observers.borrow().iter().cloned().collect();
        if observers.is_empty() {
            return;
        }
        let runtime = &self.inner.runtime;
        runtime.batch(|| {
            for (id, callback) in observers {
                runtime.schedule(id, callback);
            }
        });
    }
}

impl<T: 'static> Observable for Signal<T> {
    fn observe_with(&self, id: ObserverId, callback: Callback) -> Subscription {
        self.inner.observers.borrow_mut().push((id, callback));
        let weak: Weak<SignalInner<T>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .observers
                    .borrow_mut()
                    .retain(|(observer, _)| *observer != id);
            }
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}
