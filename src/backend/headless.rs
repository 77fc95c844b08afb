//! In-memory chart library used by tests and headless hosts.
//!
//! Every call a binding makes is appended to a shared [`CallLog`], so hosts
//! can assert on exact call order without a rendering surface.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{trace, warn};

use crate::core::{ChartData, ChartKind, ChartOptions, Size};
use crate::error::{BindingError, BindingResult};
use crate::extensions::{
    ComponentKind, PluginContext, PluginEvent, Registrable, SharedPlugin,
};
use crate::reactive::BoundingBox;

use super::{ChartConfig, ChartInstance, ChartLibrary, ChartRegistry};

#[derive(Debug, Clone, PartialEq)]
pub enum ChartCall {
    Create { chart_id: u64, kind: ChartKind, canvas: String },
    SetData { chart_id: u64 },
    SetOptions { chart_id: u64 },
    Update { chart_id: u64 },
    Resize { chart_id: u64, width: f64, height: f64 },
    Destroy { chart_id: u64 },
    Register { ids: Vec<String> },
}

impl ChartCall {
    #[must_use]
    pub fn chart_id(&self) -> Option<u64> {
        match self {
            Self::Create { chart_id, .. }
            | Self::SetData { chart_id }
            | Self::SetOptions { chart_id }
            | Self::Update { chart_id }
            | Self::Resize { chart_id, .. }
            | Self::Destroy { chart_id } => Some(*chart_id),
            Self::Register { .. } => None,
        }
    }
}

/// Shared, append-only record of chart library calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Rc<RefCell<Vec<ChartCall>>>,
}

impl CallLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: ChartCall) {
        trace!(?call, "headless chart call");
        self.entries.borrow_mut().push(call);
    }

    #[must_use]
    pub fn entries(&self) -> Vec<ChartCall> {
        self.entries.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    #[must_use]
    pub fn count(&self, predicate: impl Fn(&ChartCall) -> bool) -> usize {
        self.entries.borrow().iter().filter(|call| predicate(call)).count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Canvas stand-in identified by its element id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessCanvas {
    pub id: String,
}

impl HeadlessCanvas {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Container stand-in whose size the test or host controls.
#[derive(Debug, Clone, Default)]
pub struct HeadlessContainer {
    size: Rc<Cell<Size>>,
}

impl HeadlessContainer {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size: Rc::new(Cell::new(size)),
        }
    }

    pub fn set_size(&self, size: Size) {
        self.size.set(size);
    }
}

impl BoundingBox for HeadlessContainer {
    fn bounding_size(&self) -> Size {
        self.size.get()
    }
}

/// Registry keyed by descriptor id; re-registering an id replaces it.
#[derive(Debug, Default)]
pub struct HeadlessRegistry {
    entries: RefCell<IndexMap<String, Registrable>>,
    register_calls: Cell<usize>,
    log: CallLog,
}

impl HeadlessRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.borrow().contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    #[must_use]
    pub fn register_calls(&self) -> usize {
        self.register_calls.get()
    }

    #[must_use]
    pub fn has_controller(&self, id: &str) -> bool {
        matches!(
            self.entries.borrow().get(id),
            Some(Registrable::Component(descriptor)) if descriptor.kind == ComponentKind::Controller
        )
    }

    #[must_use]
    pub fn plugins(&self) -> Vec<SharedPlugin> {
        self.entries
            .borrow()
            .values()
            .filter_map(|entry| entry.as_plugin().cloned())
            .collect()
    }
}

impl ChartRegistry for HeadlessRegistry {
    fn register(&self, items: Vec<Registrable>) {
        let ids: Vec<String> = items.iter().map(Registrable::id).collect();
        {
            let mut entries = self.entries.borrow_mut();
            for item in items {
                entries.insert(item.id(), item);
            }
        }
        self.register_calls.set(self.register_calls.get() + 1);
        self.log.push(ChartCall::Register { ids });
    }
}

/// Chart library that keeps instances in memory.
///
/// Built-in chart kinds are always available; `ChartKind::Custom` requires a
/// controller with the same id in the attached registry.
#[derive(Debug)]
pub struct HeadlessChartLibrary {
    log: CallLog,
    registry: Option<Rc<HeadlessRegistry>>,
    initial_size: Size,
    next_id: Cell<u64>,
    live: Rc<Cell<usize>>,
}

impl Default for HeadlessChartLibrary {
    fn default() -> Self {
        Self::new(CallLog::new())
    }
}

impl HeadlessChartLibrary {
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            registry: None,
            initial_size: Size::new(300.0, 150.0),
            next_id: Cell::new(1),
            live: Rc::new(Cell::new(0)),
        }
    }

    #[must_use]
    pub fn with_registry(mut self, registry: Rc<HeadlessRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// Instances created and not yet destroyed.
    #[must_use]
    pub fn live_instances(&self) -> usize {
        self.live.get()
    }

    #[must_use]
    pub fn created_count(&self) -> u64 {
        self.next_id.get() - 1
    }

    fn ensure_kind_available(&self, kind: &ChartKind) -> BindingResult<()> {
        let ChartKind::Custom(name) = kind else {
            return Ok(());
        };
        match &self.registry {
            Some(registry) if registry.has_controller(name) => Ok(()),
            _ => Err(BindingError::Backend(format!(
                "\"{name}\" is not a registered controller"
            ))),
        }
    }
}

impl ChartLibrary for HeadlessChartLibrary {
    type Canvas = HeadlessCanvas;
    type Instance = HeadlessChart;

    fn create(&self, canvas: &HeadlessCanvas, config: ChartConfig) -> BindingResult<HeadlessChart> {
        self.ensure_kind_available(&config.kind)?;

        let chart_id = self.next_id.get();
        self.next_id.set(chart_id + 1);

        let mut plugins = self
            .registry
            .as_ref()
            .map(|registry| registry.plugins())
            .unwrap_or_default();
        plugins.extend(config.plugins);

        self.log.push(ChartCall::Create {
            chart_id,
            kind: config.kind.clone(),
            canvas: canvas.id.clone(),
        });
        self.live.set(self.live.get() + 1);

        let chart = HeadlessChart {
            id: chart_id,
            kind: config.kind,
            canvas: canvas.clone(),
            data: config.data,
            options: config.options.unwrap_or_default(),
            plugins,
            size: self.initial_size,
            update_count: 0,
            destroyed: false,
            log: self.log.clone(),
            live: Rc::clone(&self.live),
        };
        chart.emit(PluginEvent::Installed);
        Ok(chart)
    }
}

/// In-memory chart instance.
pub struct HeadlessChart {
    id: u64,
    kind: ChartKind,
    canvas: HeadlessCanvas,
    data: ChartData,
    options: ChartOptions,
    plugins: Vec<SharedPlugin>,
    size: Size,
    update_count: u64,
    destroyed: bool,
    log: CallLog,
    live: Rc<Cell<usize>>,
}

impl HeadlessChart {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> &ChartKind {
        &self.kind
    }

    #[must_use]
    pub fn canvas(&self) -> &HeadlessCanvas {
        &self.canvas
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[must_use]
    pub fn plugin_ids(&self) -> Vec<String> {
        self.plugins
            .iter()
            .map(|plugin| plugin.borrow().id().to_owned())
            .collect()
    }

    fn context(&self) -> PluginContext {
        PluginContext {
            chart_id: self.id,
            kind: self.kind.clone(),
            size: self.size,
            labels_len: self.data.labels.len(),
            datasets_len: self.data.datasets.len(),
            update_count: self.update_count,
        }
    }

    fn emit(&self, event: PluginEvent) {
        if self.plugins.is_empty() {
            return;
        }
        let context = self.context();
        for plugin in &self.plugins {
            match plugin.try_borrow_mut() {
                Ok(mut plugin) => plugin.on_event(event, &context),
                Err(_) => warn!(chart_id = self.id, ?event, "skipping re-entrant plugin hook"),
            }
        }
    }
}

impl ChartInstance for HeadlessChart {
    fn data(&self) -> &ChartData {
        &self.data
    }

    fn set_data(&mut self, data: ChartData) {
        self.data = data;
        self.log.push(ChartCall::SetData { chart_id: self.id });
        self.emit(PluginEvent::DataUpdated {
            datasets_len: self.data.datasets.len(),
        });
    }

    fn options(&self) -> &ChartOptions {
        &self.options
    }

    fn set_options(&mut self, options: ChartOptions) {
        self.options = options;
        self.log.push(ChartCall::SetOptions { chart_id: self.id });
        self.emit(PluginEvent::OptionsUpdated);
    }

    fn update(&mut self) {
        self.update_count += 1;
        self.log.push(ChartCall::Update { chart_id: self.id });
        self.emit(PluginEvent::Updated);
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.size = Size::new(width, height);
        self.log.push(ChartCall::Resize {
            chart_id: self.id,
            width,
            height,
        });
        self.emit(PluginEvent::Resized { width, height });
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.live.set(self.live.get().saturating_sub(1));
        self.log.push(ChartCall::Destroy { chart_id: self.id });
        self.emit(PluginEvent::Destroyed);
    }
}

impl std::fmt::Debug for HeadlessChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessChart")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("size", &self.size)
            .field("update_count", &self.update_count)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
