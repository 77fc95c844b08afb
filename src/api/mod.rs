//! Binding controller and its collaborators.
//!
//! [`ChartBinding`] owns one chart instance at a time. Reactive producers are
//! kept in sync by `data_sync`, container sizes by `size_sync`, and
//! [`use_chart_components`] exposes the presentational wrapper.

mod binding;
mod binding_config;
mod binding_init;
mod components;
mod data_sync;
mod producers;
mod size_sync;

pub use binding::{ChartBinding, SharedChart};
pub use binding_config::ChartBindingConfig;
pub use components::{
    ChartCanvas, ChartContainer, ElementNode, RefSlot, ViewNode, use_chart_components,
};
pub use producers::{DataProducer, OptionsProducer, use_data, use_options};
