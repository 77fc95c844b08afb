use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::backend::{ChartConfig, ChartInstance, ChartLibrary, ChartRegistry};
use crate::core::ChartKind;
use crate::error::{BindingError, BindingResult};
use crate::extensions::register_modules;
use crate::reactive::{BoundingBox, ElementBounding, ElementRef, Lifecycle, Signal};

use super::binding::{BindingInner, ChartBinding};
use super::binding_config::ChartBindingConfig;
use super::producers::{DataProducer, OptionsProducer};
use super::{data_sync, size_sync};

impl<L, C> ChartBinding<L, C>
where
    L: ChartLibrary + 'static,
    C: BoundingBox + Clone + 'static,
{
    /// Wires a chart binding into `lifecycle`.
    ///
    /// Immediate modules are registered with `registry` before this returns;
    /// deferred ones wait for [`ChartBinding::take_pending_modules`] to be
    /// driven. With `auto_init`, the chart is initialized on mount, or right
    /// away when the component is already mounted, in which case an
    /// initialization failure is returned here.
    pub fn new(
        lifecycle: &Lifecycle,
        library: L,
        registry: Rc<dyn ChartRegistry>,
        kind: ChartKind,
        data: DataProducer<L::Instance>,
        options: OptionsProducer,
        config: ChartBindingConfig<L::Canvas, C>,
    ) -> BindingResult<Self> {
        let runtime = lifecycle.runtime().clone();
        let ChartBindingConfig {
            modules,
            plugins,
            auto_init,
            canvas_ref,
            container_ref,
            sources,
        } = config;

        let canvas_ref = canvas_ref.unwrap_or_else(|| ElementRef::new(&runtime));
        let container_ref = container_ref.unwrap_or_else(|| ElementRef::new(&runtime));
        let bounding = ElementBounding::new(&container_ref);
        let chart = Signal::new(&runtime, None);

        let data_watch = data_sync::install(&runtime, &chart, &data, &options, &sources);
        let size_watch = size_sync::install(&runtime, &chart, &bounding);

        let inner = Rc::new(BindingInner {
            runtime,
            library,
            kind,
            data,
            options,
            plugins,
            canvas_ref,
            container_ref,
            bounding,
            chart,
            data_watch: RefCell::new(Some(data_watch)),
            size_watch: RefCell::new(Some(size_watch)),
            pending_modules: RefCell::new(None),
            disposed: Cell::new(false),
        });

        let weak = Rc::downgrade(&inner);
        let pending = register_modules(registry, modules).inspect_result(move |result| {
            if result.is_err() {
                return;
            }
            if let Some(inner) = weak.upgrade() {
                inner.refresh();
            }
        });
        *inner.pending_modules.borrow_mut() = Some(pending);

        let weak = Rc::downgrade(&inner);
        lifecycle.on_unmounted(move || {
            if let Some(inner) = weak.upgrade() {
                inner.dispose();
            }
        });

        if auto_init {
            let weak = Rc::downgrade(&inner);
            lifecycle.try_on_mounted(move || match weak.upgrade() {
                Some(inner) => inner.initialize(),
                None => Ok(()),
            })?;
        }

        debug!(kind = %inner.kind, auto_init, "chart binding created");
        Ok(Self { inner })
    }

    /// Destroys any previous instance and builds a new one on the bound canvas.
    ///
    /// Fails with [`BindingError::CanvasNotFound`] when no canvas is bound; the
    /// previous instance is left untouched in that case. A disposed binding
    /// never builds again and reports [`BindingError::Disposed`].
    pub fn initialize(&self) -> BindingResult<()> {
        self.inner.initialize()
    }

    /// Stops all watchers and destroys the live instance.
    pub fn dispose(&self) {
        self.inner.dispose();
    }

    /// Re-renders the live instance without touching its data.
    pub fn refresh(&self) {
        self.inner.refresh();
    }
}

impl<L, C> BindingInner<L, C>
where
    L: ChartLibrary + 'static,
    C: Clone + 'static,
{
    pub(super) fn initialize(&self) -> BindingResult<()> {
        if self.disposed.get() {
            warn!(kind = %self.kind, "initialize called on a disposed binding");
            return Err(BindingError::Disposed);
        }
        let Some(canvas) = self.canvas_ref.get() else {
            warn!(kind = %self.kind, "initialize called without a bound canvas");
            return Err(BindingError::CanvasNotFound);
        };

        let previous = self.chart.get();
        if let Some(previous) = &previous {
            previous.borrow_mut().destroy();
            debug!(kind = %self.kind, "destroyed previous chart instance");
        }

        let config = ChartConfig {
            kind: self.kind.clone(),
            data: data_sync::produce_data(&self.chart, &self.data),
            options: self.options.produce(),
            plugins: self.plugins.clone(),
        };
        let instance = match self.library.create(&canvas, config) {
            Ok(instance) => instance,
            Err(err) => {
                warn!(kind = %self.kind, error = %err, "chart construction failed");
                self.chart.set(None);
                return Err(err);
            }
        };

        let instance = Rc::new(RefCell::new(instance));
        {
            let mut chart = instance.borrow_mut();
            let data = self.data.produce(Some(&*chart));
            chart.set_data(data);
            // Size watcher only fires on change; seed the new instance.
            let size = self.bounding.size();
            if size.is_valid() && !size.is_empty() {
                chart.resize(size.width, size.height);
            }
            chart.update();
        }
        self.chart.set(Some(instance));
        debug!(kind = %self.kind, "chart instance initialized");
        Ok(())
    }

    pub(super) fn refresh(&self) {
        if let Some(chart) = self.chart.get() {
            match chart.try_borrow_mut() {
                Ok(mut chart) => chart.update(),
                Err(_) => warn!(kind = %self.kind, "chart busy, skipping refresh"),
            }
        }
    }

    pub(super) fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(watch) = self.data_watch.borrow_mut().take() {
            watch.stop();
        }
        if let Some(watch) = self.size_watch.borrow_mut().take() {
            watch.stop();
        }
        if let Some(chart) = self.chart.get() {
            chart.borrow_mut().destroy();
            self.chart.set(None);
        }
        debug!(kind = %self.kind, "chart binding disposed");
    }
}
