//! Contract with the imperative charting library.
//!
//! The binding layer only talks to these traits. Host applications implement
//! them over their real chart library; [`headless`] provides an in-memory
//! implementation for tests and headless usage.

pub mod headless;

use std::fmt;

use crate::core::{ChartData, ChartKind, ChartOptions};
use crate::error::BindingResult;
use crate::extensions::{Registrable, SharedPlugin};

/// Everything a chart library needs to construct one instance.
#[derive(Clone)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: Option<ChartOptions>,
    pub plugins: Vec<SharedPlugin>,
}

impl fmt::Debug for ChartConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plugin_ids: Vec<String> = self
            .plugins
            .iter()
            .map(|plugin| plugin.borrow().id().to_owned())
            .collect();
        f.debug_struct("ChartConfig")
            .field("kind", &self.kind)
            .field("data", &self.data)
            .field("options", &self.options)
            .field("plugins", &plugin_ids)
            .finish()
    }
}

/// Live, stateful chart object owned by a binding.
pub trait ChartInstance {
    fn data(&self) -> &ChartData;
    fn set_data(&mut self, data: ChartData);
    fn options(&self) -> &ChartOptions;
    fn set_options(&mut self, options: ChartOptions);
    /// Re-renders with the current data and options.
    fn update(&mut self);
    fn resize(&mut self, width: f64, height: f64);
    /// Releases the rendering surface. The instance must not be reused.
    fn destroy(&mut self);
}

/// Chart constructor bound to a rendering target type.
pub trait ChartLibrary {
    type Canvas: Clone + 'static;
    type Instance: ChartInstance + 'static;

    fn create(&self, canvas: &Self::Canvas, config: ChartConfig) -> BindingResult<Self::Instance>;
}

/// The chart library's process-wide registry, injected as a service.
pub trait ChartRegistry {
    fn register(&self, items: Vec<Registrable>);
}
