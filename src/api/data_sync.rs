use std::rc::Rc;

use tracing::{trace, warn};

use crate::backend::ChartInstance;
use crate::core::{ChartData, ChartOptions};
use crate::reactive::{Observable, Runtime, Signal, Watch};

use super::producers::{DataProducer, OptionsProducer};
use super::SharedChart;

/// Latest `(data, options)` pair observed by the synchronizer.
pub(super) type SyncTick = (ChartData, Option<ChartOptions>);

pub(super) fn produce_data<I: 'static>(
    chart: &Signal<Option<SharedChart<I>>>,
    data: &DataProducer<I>,
) -> ChartData {
    let current = chart.get();
    let borrowed = current.as_ref().and_then(|instance| instance.try_borrow().ok());
    data.produce(borrowed.as_deref())
}

/// Installs the watcher that pushes producer output into the live instance.
pub(super) fn install<I: ChartInstance + 'static>(
    runtime: &Runtime,
    chart: &Signal<Option<SharedChart<I>>>,
    data: &DataProducer<I>,
    options: &OptionsProducer,
    sources: &[Rc<dyn Observable>],
) -> Watch<SyncTick> {
    let getter = {
        let (chart, data, options) = (chart.clone(), data.clone(), options.clone());
        move || (produce_data(&chart, &data), options.produce())
    };
    let on_change = {
        let chart = chart.clone();
        move |(data, options): SyncTick| apply(&chart, data, options)
    };

    let watch = Watch::new(runtime, getter, on_change);
    for source in sources {
        watch.track(source.as_ref());
    }
    if let Some(dependency) = options.dependency() {
        watch.track(dependency);
    }
    watch
}

fn apply<I: ChartInstance + 'static>(
    chart: &Signal<Option<SharedChart<I>>>,
    data: ChartData,
    options: Option<ChartOptions>,
) {
    let Some(chart) = chart.get() else {
        trace!("no chart instance yet, skipping data sync");
        return;
    };
    let Ok(mut chart) = chart.try_borrow_mut() else {
        warn!("chart busy, skipping data sync");
        return;
    };
    if let Some(options) = options {
        chart.set_options(options);
    }
    chart.set_data(data);
    chart.update();
    trace!("chart data synchronized");
}
