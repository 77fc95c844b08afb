use std::fmt;
use std::rc::Rc;

use crate::extensions::{DeferredModule, ModuleSource, Registrable, SharedPlugin};
use crate::reactive::{ElementRef, Observable};

/// Construction-time configuration of a [`super::ChartBinding`].
///
/// Defaults: no modules, no plugins, automatic initialization on mount, and
/// fresh element refs.
pub struct ChartBindingConfig<Canvas, Container> {
    pub modules: Vec<ModuleSource>,
    pub plugins: Vec<SharedPlugin>,
    pub auto_init: bool,
    pub canvas_ref: Option<ElementRef<Canvas>>,
    pub container_ref: Option<ElementRef<Container>>,
    pub(super) sources: Vec<Rc<dyn Observable>>,
}

impl<Canvas, Container> Default for ChartBindingConfig<Canvas, Container> {
    fn default() -> Self {
        Self {
            modules: Vec::new(),
            plugins: Vec::new(),
            auto_init: true,
            canvas_ref: None,
            container_ref: None,
            sources: Vec::new(),
        }
    }
}

impl<Canvas, Container> ChartBindingConfig<Canvas, Container> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<Registrable>) -> Self {
        self.modules.push(ModuleSource::Immediate(module.into()));
        self
    }

    #[must_use]
    pub fn with_deferred_module(mut self, module: DeferredModule) -> Self {
        self.modules.push(ModuleSource::Deferred(module));
        self
    }

    #[must_use]
    pub fn with_modules(mut self, modules: impl IntoIterator<Item = ModuleSource>) -> Self {
        self.modules.extend(modules);
        self
    }

    #[must_use]
    pub fn with_plugin(mut self, plugin: SharedPlugin) -> Self {
        self.plugins.push(plugin);
        self
    }

    #[must_use]
    pub fn with_auto_init(mut self, auto_init: bool) -> Self {
        self.auto_init = auto_init;
        self
    }

    #[must_use]
    pub fn with_canvas_ref(mut self, canvas_ref: ElementRef<Canvas>) -> Self {
        self.canvas_ref = Some(canvas_ref);
        self
    }

    #[must_use]
    pub fn with_container_ref(mut self, container_ref: ElementRef<Container>) -> Self {
        self.container_ref = Some(container_ref);
        self
    }

    /// Declares a reactive source the data/options producers read from.
    #[must_use]
    pub fn watch_source(mut self, source: impl Observable + 'static) -> Self {
        self.sources.push(Rc::new(source));
        self
    }
}

impl<Canvas, Container> fmt::Debug for ChartBindingConfig<Canvas, Container> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartBindingConfig")
            .field("modules", &self.modules)
            .field("plugins", &self.plugins.len())
            .field("auto_init", &self.auto_init)
            .field("sources", &self.sources.len())
            .finish_non_exhaustive()
    }
}
