use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::warn;

use crate::backend::ChartLibrary;
use crate::core::{ChartKind, Size};
use crate::extensions::{PendingModules, SharedPlugin};
use crate::reactive::{ElementBounding, ElementRef, Observable, Runtime, Signal, Watch};

use super::data_sync::SyncTick;
use super::producers::{DataProducer, OptionsProducer};

/// Chart instance slot shared between the binding and its watchers.
pub type SharedChart<I> = Rc<RefCell<I>>;

/// Binds one chart instance to a canvas ref, reactive producers and a
/// container size.
///
/// Cloning yields another handle to the same binding.
pub struct ChartBinding<L: ChartLibrary, C> {
    pub(super) inner: Rc<BindingInner<L, C>>,
}

pub(super) struct BindingInner<L: ChartLibrary, C> {
    pub(super) runtime: Runtime,
    pub(super) library: L,
    pub(super) kind: ChartKind,
    pub(super) data: DataProducer<L::Instance>,
    pub(super) options: OptionsProducer,
    pub(super) plugins: Vec<SharedPlugin>,
    pub(super) canvas_ref: ElementRef<L::Canvas>,
    pub(super) container_ref: ElementRef<C>,
    pub(super) bounding: ElementBounding,
    pub(super) chart: Signal<Option<SharedChart<L::Instance>>>,
    pub(super) data_watch: RefCell<Option<Watch<SyncTick>>>,
    pub(super) size_watch: RefCell<Option<Watch<Size>>>,
    pub(super) pending_modules: RefCell<Option<PendingModules>>,
    pub(super) disposed: Cell<bool>,
}

impl<L: ChartLibrary, C> Clone for ChartBinding<L, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<L, C> ChartBinding<L, C>
where
    L: ChartLibrary + 'static,
    C: Clone + 'static,
{
    #[must_use]
    pub fn runtime(&self) -> &Runtime {
        &self.inner.runtime
    }

    #[must_use]
    pub fn kind(&self) -> &ChartKind {
        &self.inner.kind
    }

    #[must_use]
    pub fn library(&self) -> &L {
        &self.inner.library
    }

    #[must_use]
    pub fn canvas_ref(&self) -> &ElementRef<L::Canvas> {
        &self.inner.canvas_ref
    }

    #[must_use]
    pub fn container_ref(&self) -> &ElementRef<C> {
        &self.inner.container_ref
    }

    #[must_use]
    pub fn bounding(&self) -> &ElementBounding {
        &self.inner.bounding
    }

    /// Observable reference to the current chart instance.
    #[must_use]
    pub fn chart(&self) -> &Signal<Option<SharedChart<L::Instance>>> {
        &self.inner.chart
    }

    #[must_use]
    pub fn has_chart(&self) -> bool {
        self.inner.chart.with(Option::is_some)
    }

    /// Runs `f` against the live instance, if any.
    ///
    /// Returns `None` while the instance is busy inside one of its own calls.
    pub fn with_chart<R>(&self, f: impl FnOnce(&L::Instance) -> R) -> Option<R> {
        let chart = self.inner.chart.get()?;
        let Ok(chart) = chart.try_borrow() else {
            warn!(kind = %self.inner.kind, "chart busy, with_chart skipped");
            return None;
        };
        Some(f(&chart))
    }

    /// Adds a reactive source the producers depend on.
    pub fn track(&self, source: &dyn Observable) {
        if let Some(watch) = self.inner.data_watch.borrow().as_ref() {
            watch.track(source);
        }
    }

    /// Takes the deferred module registration future for the host to drive.
    ///
    /// Returns `None` once taken.
    pub fn take_pending_modules(&self) -> Option<PendingModules> {
        self.inner.pending_modules.borrow_mut().take()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl<L: ChartLibrary, C> fmt::Debug for ChartBinding<L, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartBinding")
            .field("kind", &self.inner.kind)
            .field("has_chart", &self.inner.chart.with(Option::is_some))
            .field("disposed", &self.inner.disposed.get())
            .finish_non_exhaustive()
    }
}
