use std::fmt;
use std::rc::Rc;

use tracing::warn;

use crate::core::Size;

use super::element::ElementRef;
use super::runtime::Runtime;
use super::signal::{Signal, Subscription};

/// Elements that can report their current bounding box.
pub trait BoundingBox {
    fn bounding_size(&self) -> Size;
}

/// Observable width/height of an element held in an [`ElementRef`].
///
/// The size is re-measured when the ref changes and whenever the host calls
/// [`ElementBounding::refresh`]. Hosts with a resize observer can push sizes
/// directly through [`ElementBounding::observe`]. An unbound ref measures as
/// zero.
#[derive(Clone)]
pub struct ElementBounding {
    runtime: Runtime,
    width: Signal<f64>,
    height: Signal<f64>,
    measure: Rc<dyn Fn() -> Option<Size>>,
    _target: Rc<Subscription>,
}

impl ElementBounding {
    pub fn new<T>(target: &ElementRef<T>) -> Self
    where
        T: BoundingBox + Clone + 'static,
    {
        let runtime = target.runtime().clone();
        let width = Signal::new(&runtime, 0.0);
        let height = Signal::new(&runtime, 0.0);

        let element = target.clone();
        let measure: Rc<dyn Fn() -> Option<Size>> =
            Rc::new(move || element.get().map(|el| el.bounding_size()));

        let subscription = {
            let (runtime, width, height, measure) =
                (runtime.clone(), width.clone(), height.clone(), Rc::clone(&measure));
            target.subscribe(move || {
                apply_size(&runtime, &width, &height, measure().unwrap_or_default());
            })
        };

        let bounding = Self {
            runtime,
            width,
            height,
            measure,
            _target: Rc::new(subscription),
        };
        bounding.refresh();
        bounding
    }

    #[must_use]
    pub fn width(&self) -> &Signal<f64> {
        &self.width
    }

    #[must_use]
    pub fn height(&self) -> &Signal<f64> {
        &self.height
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width.get(), self.height.get())
    }

    /// Re-measures the bound element.
    pub fn refresh(&self) {
        let size = (self.measure)().unwrap_or_default();
        apply_size(&self.runtime, &self.width, &self.height, size);
    }

    /// Records a size reported by the host's resize observer.
    pub fn observe(&self, size: Size) {
        apply_size(&self.runtime, &self.width, &self.height, size);
    }
}

impl fmt::Debug for ElementBounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementBounding")
            .field("width", &self.width.get())
            .field("height", &self.height.get())
            .finish()
    }
}

fn apply_size(runtime: &Runtime, width: &Signal<f64>, height: &Signal<f64>, size: Size) {
    if !size.is_valid() {
        warn!(
            width = size.width,
            height = size.height,
            "ignoring invalid element size"
        );
        return;
    }
    runtime.batch(|| {
        width.set_if_changed(size.width);
        height.set_if_changed(size.height);
    });
}
