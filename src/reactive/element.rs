use std::fmt;

use super::runtime::{Callback, ObserverId, Runtime};
use super::signal::{Observable, Signal, Subscription};

/// Host-filled reference to a rendered element.
///
/// Empty until the host binds the element, typically right before mount.
/// The element itself is owned by the host; the ref only observes it.
pub struct ElementRef<T> {
    slot: Signal<Option<T>>,
}

impl<T> Clone for ElementRef<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: Clone + 'static> ElementRef<T> {
    #[must_use]
    pub fn new(runtime: &Runtime) -> Self {
        Self {
            slot: Signal::new(runtime, None),
        }
    }

    #[must_use]
    pub fn bound(runtime: &Runtime, element: T) -> Self {
        Self {
            slot: Signal::new(runtime, Some(element)),
        }
    }

    pub fn bind(&self, element: T) {
        self.slot.set(Some(element));
    }

    pub fn clear(&self) {
        self.slot.set(None);
    }

    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.slot.get()
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.slot.with(Option::is_some)
    }

    #[must_use]
    pub fn runtime(&self) -> &Runtime {
        self.slot.runtime()
    }

    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.slot.subscribe(callback)
    }
}

impl<T: 'static> Observable for ElementRef<T> {
    fn observe_with(&self, id: ObserverId, callback: Callback) -> Subscription {
        self.slot.observe_with(id, callback)
    }
}

impl<T: fmt::Debug> fmt::Debug for ElementRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementRef").field(&self.slot).finish()
    }
}
