use std::fmt;
use std::rc::Rc;

use super::signal::Signal;

/// A value that is either fixed, held in a signal, or computed on demand.
pub enum MaybeSignal<T> {
    Static(T),
    Signal(Signal<T>),
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + 'static> MaybeSignal<T> {
    pub fn getter(f: impl Fn() -> T + 'static) -> Self {
        Self::Getter(Rc::new(f))
    }

    /// Resolves the current value.
    #[must_use]
    pub fn to_value(&self) -> T {
        match self {
            Self::Static(value) => value.clone(),
            Self::Signal(signal) => signal.get(),
            Self::Getter(getter) => getter(),
        }
    }

    /// The backing signal, when there is one to observe.
    #[must_use]
    pub fn as_signal(&self) -> Option<&Signal<T>> {
        match self {
            Self::Signal(signal) => Some(signal),
            Self::Static(_) | Self::Getter(_) => None,
        }
    }
}

impl<T: Clone> Clone for MaybeSignal<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(value) => Self::Static(value.clone()),
            Self::Signal(signal) => Self::Signal(signal.clone()),
            Self::Getter(getter) => Self::Getter(Rc::clone(getter)),
        }
    }
}

impl<T> From<T> for MaybeSignal<T> {
    fn from(value: T) -> Self {
        Self::Static(value)
    }
}

impl<T> From<Signal<T>> for MaybeSignal<T> {
    fn from(signal: Signal<T>) -> Self {
        Self::Signal(signal)
    }
}

impl<T: fmt::Debug> fmt::Debug for MaybeSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Signal(signal) => f.debug_tuple("Signal").field(signal).finish(),
            Self::Getter(_) => f.write_str("Getter(..)"),
        }
    }
}
