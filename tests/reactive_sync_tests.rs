use std::rc::Rc;

use chart_bind::api::{ChartBinding, ChartBindingConfig, DataProducer, OptionsProducer, use_options};
use chart_bind::backend::ChartInstance;
use chart_bind::backend::headless::{
    CallLog, ChartCall, HeadlessCanvas, HeadlessChart, HeadlessChartLibrary, HeadlessContainer,
    HeadlessRegistry,
};
use chart_bind::core::{ChartData, ChartKind, ChartOptions, Dataset};
use chart_bind::reactive::{Lifecycle, Runtime, Signal};
use serde_json::json;

type HeadlessBinding = ChartBinding<HeadlessChartLibrary, HeadlessContainer>;

fn series(values: &[f64]) -> ChartData {
    ChartData::new()
        .with_labels((0..values.len()).map(|i| format!("t{i}")))
        .with_dataset(Dataset::new("series").with_values(values.iter().copied()))
}

struct Harness {
    lifecycle: Lifecycle,
    log: CallLog,
    values: Signal<Vec<f64>>,
    options: Signal<ChartOptions>,
    binding: HeadlessBinding,
}

fn harness(auto_init: bool) -> Harness {
    let runtime = Runtime::new();
    let lifecycle = Lifecycle::new(&runtime);
    let log = CallLog::new();
    let values = Signal::new(&runtime, vec![1.0, 2.0]);
    let options = Signal::new(&runtime, ChartOptions::new(json!({ "animation": false })));

    let reader = values.clone();
    let binding = ChartBinding::new(
        &lifecycle,
        HeadlessChartLibrary::new(log.clone()),
        Rc::new(HeadlessRegistry::new()),
        ChartKind::Line,
        DataProducer::new(move |_: Option<&HeadlessChart>| series(&reader.get())),
        use_options(options.clone()),
        ChartBindingConfig::new()
            .with_auto_init(auto_init)
            .watch_source(values.clone()),
    )
    .expect("binding");
    binding.canvas_ref().bind(HeadlessCanvas::new("chart"));

    Harness {
        lifecycle,
        log,
        values,
        options,
        binding,
    }
}

#[test]
fn data_changes_before_initialization_are_ignored() {
    let h = harness(false);
    h.values.set(vec![9.0]);

    assert!(h.log.is_empty());
    assert!(!h.binding.has_chart());

    h.binding.initialize().expect("init");
    let data = h.binding.with_chart(|chart| chart.data().clone());
    assert_eq!(data, Some(series(&[9.0])));
}

#[test]
fn data_change_applies_options_data_and_updates() {
    let h = harness(true);
    h.lifecycle.mount().expect("mount");
    h.log.clear();

    h.values.set(vec![4.0, 5.0, 6.0]);

    assert_eq!(
        h.log.entries(),
        vec![
            ChartCall::SetOptions { chart_id: 1 },
            ChartCall::SetData { chart_id: 1 },
            ChartCall::Update { chart_id: 1 },
        ]
    );
    let data = h.binding.with_chart(|chart| chart.data().clone());
    assert_eq!(data, Some(series(&[4.0, 5.0, 6.0])));
}

#[test]
fn options_signal_is_tracked_without_explicit_source() {
    let h = harness(true);
    h.lifecycle.mount().expect("mount");

    let next = ChartOptions::new(json!({ "animation": false, "responsive": true }));
    h.options.set(next.clone());

    let applied = h.binding.with_chart(|chart| chart.options().clone());
    assert_eq!(applied, Some(next));
}

#[test]
fn unchanged_producer_output_does_not_update() {
    let h = harness(true);
    h.lifecycle.mount().expect("mount");
    let before = h.log.len();

    h.values.set(vec![1.0, 2.0]);

    assert_eq!(h.log.len(), before);
}

#[test]
fn batched_source_changes_update_once_with_latest_values() {
    let h = harness(true);
    h.lifecycle.mount().expect("mount");
    h.log.clear();

    let next_options = ChartOptions::new(json!({ "indexAxis": "y" }));
    h.binding.runtime().batch(|| {
        h.values.set(vec![7.0]);
        h.options.set(next_options.clone());
        h.values.set(vec![7.0, 8.0]);
    });

    assert_eq!(h.log.count(|call| matches!(call, ChartCall::Update { .. })), 1);
    let (data, options) = h
        .binding
        .with_chart(|chart| (chart.data().clone(), chart.options().clone()))
        .expect("chart");
    assert_eq!(data, series(&[7.0, 8.0]));
    assert_eq!(options, next_options);
}

#[test]
fn absent_options_leave_instance_options_alone() {
    let runtime = Runtime::new();
    let lifecycle = Lifecycle::new(&runtime);
    let log = CallLog::new();
    let values = Signal::new(&runtime, vec![1.0]);

    let reader = values.clone();
    let binding: HeadlessBinding = ChartBinding::new(
        &lifecycle,
        HeadlessChartLibrary::new(log.clone()),
        Rc::new(HeadlessRegistry::new()),
        ChartKind::Bar,
        DataProducer::new(move |_: Option<&HeadlessChart>| series(&reader.get())),
        OptionsProducer::none(),
        ChartBindingConfig::new(),
    )
    .expect("binding");
    binding.track(&values);
    binding.canvas_ref().bind(HeadlessCanvas::new("bars"));
    lifecycle.mount().expect("mount");

    values.set(vec![2.0]);

    assert_eq!(log.count(|call| matches!(call, ChartCall::SetOptions { .. })), 0);
    assert_eq!(
        binding.with_chart(|chart| chart.options().clone()),
        Some(ChartOptions::default())
    );
    assert_eq!(
        binding.with_chart(|chart| chart.data().clone()),
        Some(series(&[2.0]))
    );
}

#[test]
fn data_producer_receives_current_instance() {
    let runtime = Runtime::new();
    let lifecycle = Lifecycle::new(&runtime);
    let tick = Signal::new(&runtime, 0u32);

    let reader = tick.clone();
    let binding: HeadlessBinding = ChartBinding::new(
        &lifecycle,
        HeadlessChartLibrary::default(),
        Rc::new(HeadlessRegistry::new()),
        ChartKind::Line,
        DataProducer::new(move |chart: Option<&HeadlessChart>| {
            let label = chart.map_or("none".to_owned(), |chart| format!("chart-{}", chart.id()));
            ChartData::new().with_labels([format!("{label}@{}", reader.get())])
        }),
        OptionsProducer::none(),
        ChartBindingConfig::new().watch_source(tick.clone()),
    )
    .expect("binding");
    binding.canvas_ref().bind(HeadlessCanvas::new("chart"));
    lifecycle.mount().expect("mount");

    assert_eq!(
        binding.with_chart(|chart| chart.data().labels.clone()),
        Some(vec!["chart-1@0".to_owned()])
    );

    tick.set(1);
    assert_eq!(
        binding.with_chart(|chart| chart.data().labels.clone()),
        Some(vec!["chart-1@1".to_owned()])
    );
}
