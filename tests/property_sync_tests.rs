use std::rc::Rc;

use chart_bind::api::{ChartBinding, ChartBindingConfig, DataProducer, use_options};
use chart_bind::backend::ChartInstance;
use chart_bind::backend::headless::{
    CallLog, ChartCall, HeadlessCanvas, HeadlessChart, HeadlessChartLibrary, HeadlessContainer,
    HeadlessRegistry,
};
use chart_bind::core::{ChartData, ChartKind, ChartOptions, Dataset, Size};
use chart_bind::reactive::{Lifecycle, Runtime, Signal};
use proptest::prelude::*;
use serde_json::json;

#[derive(Debug, Clone)]
enum Change {
    Values(Vec<f64>),
    Stacked(bool),
    Both(Vec<f64>, bool),
    Reinitialize,
}

fn change_strategy() -> impl Strategy<Value = Change> {
    let values = proptest::collection::vec(-1_000.0f64..1_000.0, 0..8);
    prop_oneof![
        values.clone().prop_map(Change::Values),
        any::<bool>().prop_map(Change::Stacked),
        (values, any::<bool>()).prop_map(|(v, s)| Change::Both(v, s)),
        Just(Change::Reinitialize),
    ]
}

fn data_for(values: &[f64]) -> ChartData {
    ChartData::new().with_dataset(Dataset::new("p").with_values(values.iter().copied()))
}

fn options_for(stacked: bool) -> ChartOptions {
    ChartOptions::new(json!({ "scales": { "y": { "stacked": stacked } } }))
}

proptest! {
    #[test]
    fn instance_always_reflects_latest_producer_output(
        changes in proptest::collection::vec(change_strategy(), 1..24)
    ) {
        let runtime = Runtime::new();
        let lifecycle = Lifecycle::new(&runtime);
        let log = CallLog::new();
        let values = Signal::new(&runtime, vec![0.0]);
        let options = Signal::new(&runtime, options_for(false));

        let reader = values.clone();
        let binding: ChartBinding<HeadlessChartLibrary, HeadlessContainer> = ChartBinding::new(
            &lifecycle,
            HeadlessChartLibrary::new(log.clone()),
            Rc::new(HeadlessRegistry::new()),
            ChartKind::Line,
            DataProducer::new(move |_: Option<&HeadlessChart>| data_for(&reader.get())),
            use_options(options.clone()),
            ChartBindingConfig::new().watch_source(values.clone()),
        )
        .expect("binding");
        binding.canvas_ref().bind(HeadlessCanvas::new("chart"));
        lifecycle.mount().expect("mount");

        for change in changes {
            match change {
                Change::Values(next) => values.set(next),
                Change::Stacked(stacked) => options.set(options_for(stacked)),
                Change::Both(next, stacked) => runtime.batch(|| {
                    values.set(next);
                    options.set(options_for(stacked));
                }),
                Change::Reinitialize => binding.initialize().expect("reinit"),
            }

            let (data, applied) = binding
                .with_chart(|chart| (chart.data().clone(), chart.options().clone()))
                .expect("chart");
            prop_assert_eq!(data, data_for(&values.get()));
            prop_assert_eq!(applied, options.get());
            prop_assert_eq!(binding.library().live_instances(), 1);
        }

        let creates = log.count(|call| matches!(call, ChartCall::Create { .. }));
        let destroys = log.count(|call| matches!(call, ChartCall::Destroy { .. }));
        prop_assert_eq!(creates, destroys + 1);
    }

    #[test]
    fn last_observed_size_wins(
        sizes in proptest::collection::vec((1.0f64..4_000.0, 1.0f64..4_000.0), 1..16)
    ) {
        let runtime = Runtime::new();
        let lifecycle = Lifecycle::new(&runtime);
        let binding: ChartBinding<HeadlessChartLibrary, HeadlessContainer> = ChartBinding::new(
            &lifecycle,
            HeadlessChartLibrary::default(),
            Rc::new(HeadlessRegistry::new()),
            ChartKind::Bar,
            DataProducer::constant(ChartData::new()),
            chart_bind::api::OptionsProducer::none(),
            ChartBindingConfig::new(),
        )
        .expect("binding");
        binding.canvas_ref().bind(HeadlessCanvas::new("chart"));
        lifecycle.mount().expect("mount");

        for (width, height) in &sizes {
            binding.bounding().observe(Size::new(*width, *height));
        }

        let (width, height) = sizes[sizes.len() - 1];
        let size = binding.with_chart(|chart| chart.size()).expect("chart");
        prop_assert_eq!(size, Size::new(width, height));
    }
}
