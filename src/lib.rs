//! chart-bind: reactive lifecycle bindings for imperative chart instances.
//!
//! A [`ChartBinding`] creates a chart when its canvas is available, keeps the
//! instance's data and options in sync with reactive producers, resizes it
//! with its container and rebuilds it on demand. The chart library and its
//! registry are reached only through the traits in [`backend`].

pub mod api;
pub mod backend;
pub mod core;
pub mod error;
pub mod extensions;
pub mod reactive;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{ChartBinding, ChartBindingConfig, DataProducer, OptionsProducer};
pub use error::{BindingError, BindingResult};
