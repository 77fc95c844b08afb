use std::fmt;
use std::rc::Rc;

use crate::core::{ChartData, ChartOptions};
use crate::reactive::{MaybeSignal, Signal};

/// Produces chart data, optionally from the current chart instance.
///
/// Invoked on every reactive tick; the instance is `None` before the first
/// initialization.
pub struct DataProducer<I> {
    produce: Rc<dyn Fn(Option<&I>) -> ChartData>,
}

impl<I> Clone for DataProducer<I> {
    fn clone(&self) -> Self {
        Self {
            produce: Rc::clone(&self.produce),
        }
    }
}

impl<I: 'static> DataProducer<I> {
    pub fn new(produce: impl Fn(Option<&I>) -> ChartData + 'static) -> Self {
        Self {
            produce: Rc::new(produce),
        }
    }

    #[must_use]
    pub fn constant(data: ChartData) -> Self {
        Self::new(move |_| data.clone())
    }

    /// Data read from a signal, ignoring the instance.
    #[must_use]
    pub fn from_signal(signal: Signal<ChartData>) -> Self {
        Self::new(move |_| signal.get())
    }

    #[must_use]
    pub fn produce(&self, chart: Option<&I>) -> ChartData {
        (self.produce)(chart)
    }
}

impl<I> fmt::Debug for DataProducer<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DataProducer(..)")
    }
}

/// Produces chart options; `None` leaves the instance's options untouched.
#[derive(Clone)]
pub struct OptionsProducer {
    produce: Rc<dyn Fn() -> Option<ChartOptions>>,
    dependency: Option<Signal<ChartOptions>>,
}

impl OptionsProducer {
    pub fn new(produce: impl Fn() -> Option<ChartOptions> + 'static) -> Self {
        Self {
            produce: Rc::new(produce),
            dependency: None,
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self::new(|| None)
    }

    #[must_use]
    pub fn produce(&self) -> Option<ChartOptions> {
        (self.produce)()
    }

    /// Signal the producer reads from, tracked automatically by a binding.
    #[must_use]
    pub fn dependency(&self) -> Option<&Signal<ChartOptions>> {
        self.dependency.as_ref()
    }
}

impl fmt::Debug for OptionsProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsProducer")
            .field("tracked", &self.dependency.is_some())
            .finish_non_exhaustive()
    }
}

/// Wraps a data closure into a [`DataProducer`].
pub fn use_data<I, F>(produce: F) -> DataProducer<I>
where
    I: 'static,
    F: Fn(Option<&I>) -> ChartData + 'static,
{
    DataProducer::new(produce)
}

/// Normalizes static options, an options signal or an options getter into
/// an [`OptionsProducer`].
pub fn use_options(options: impl Into<MaybeSignal<ChartOptions>>) -> OptionsProducer {
    let options = options.into();
    let dependency = options.as_signal().cloned();
    OptionsProducer {
        produce: Rc::new(move || Some(options.to_value())),
        dependency,
    }
}
