use tracing::{trace, warn};

use crate::backend::ChartInstance;
use crate::core::Size;
use crate::reactive::{ElementBounding, Runtime, Signal, Watch};

use super::SharedChart;

/// Installs the watcher that forwards container size changes to `resize`.
pub(super) fn install<I: ChartInstance + 'static>(
    runtime: &Runtime,
    chart: &Signal<Option<SharedChart<I>>>,
    bounding: &ElementBounding,
) -> Watch<Size> {
    let getter = {
        let bounding = bounding.clone();
        move || bounding.size()
    };
    let on_change = {
        let chart = chart.clone();
        move |size: Size| {
            let Some(chart) = chart.get() else {
                return;
            };
            let Ok(mut chart) = chart.try_borrow_mut() else {
                warn!(width = size.width, height = size.height, "chart busy, skipping resize");
                return;
            };
            chart.resize(size.width, size.height);
            chart.update();
            trace!(width = size.width, height = size.height, "chart resized");
        }
    };

    Watch::new(runtime, getter, on_change)
        .with_source(bounding.width())
        .with_source(bounding.height())
}
