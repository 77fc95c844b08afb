//! Host-framework reactive primitives.
//!
//! A small single-threaded model of what a reactive UI framework provides:
//! observable cells, change watchers, mount hooks, element refs and element
//! bounding boxes. Every source is observed through [`Observable`], so the
//! binding layer never depends on a concrete framework.

mod bounding;
mod element;
mod lifecycle;
mod maybe;
mod runtime;
mod signal;
mod watch;

pub use bounding::{BoundingBox, ElementBounding};
pub use element::ElementRef;
pub use lifecycle::Lifecycle;
pub use maybe::MaybeSignal;
pub use runtime::{Callback, ObserverId, Runtime};
pub use signal::{Observable, Signal, Subscription};
pub use watch::Watch;
