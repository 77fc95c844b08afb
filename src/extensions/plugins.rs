use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::{ChartKind, Size};

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginContext {
    pub chart_id: u64,
    pub kind: ChartKind,
    pub size: Size,
    pub labels_len: usize,
    pub datasets_len: usize,
    pub update_count: u64,
}

/// Lifecycle events a chart instance reports to its plugins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PluginEvent {
    Installed,
    DataUpdated { datasets_len: usize },
    OptionsUpdated,
    Updated,
    Resized { width: f64, height: f64 },
    Destroyed,
}

/// Extension hook interface for bounded custom logic.
///
/// Plugins observe chart events and read instance context without reaching
/// into the chart itself.
pub trait ChartPlugin {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: PluginEvent, context: &PluginContext);
}

/// Plugin handle shared between the binding config, the registry and every
/// chart instance built from them.
pub type SharedPlugin = Rc<RefCell<dyn ChartPlugin>>;

pub fn shared_plugin(plugin: impl ChartPlugin + 'static) -> SharedPlugin {
    Rc::new(RefCell::new(plugin))
}

/// Plugin that records every event it receives. Useful for host diagnostics.
#[derive(Debug, Default)]
pub struct EventRecorder {
    id: String,
    events: Vec<PluginEvent>,
}

impl EventRecorder {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn events(&self) -> &[PluginEvent] {
        &self.events
    }
}

impl ChartPlugin for EventRecorder {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: PluginEvent, _context: &PluginContext) {
        self.events.push(event);
    }
}
