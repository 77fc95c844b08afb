use std::cell::RefCell;
use std::rc::Rc;

use chart_bind::api::{ChartBindingConfig, use_chart_components, use_data, use_options};
use chart_bind::backend::{ChartInstance, ChartRegistry};
use chart_bind::backend::headless::{
    CallLog, HeadlessCanvas, HeadlessChart, HeadlessChartLibrary, HeadlessContainer,
    HeadlessRegistry,
};
use chart_bind::core::{ChartData, ChartKind, ChartOptions, DataValue, Dataset, Size};
use chart_bind::extensions::{
    ComponentDescriptor, EventRecorder, ModuleExport, ModuleSource, PluginEvent, SharedPlugin,
};
use chart_bind::reactive::{Lifecycle, MaybeSignal, Runtime, Signal};
use chart_bind::{ChartBinding, telemetry};
use futures::executor::block_on;
use serde_json::json;

#[test]
fn binding_smoke_flow() {
    let _ = telemetry::init_default_tracing();

    let runtime = Runtime::new();
    let lifecycle = Lifecycle::new(&runtime);
    let log = CallLog::new();
    let registry = Rc::new(HeadlessRegistry::with_log(log.clone()));
    let library = HeadlessChartLibrary::new(log.clone()).with_registry(Rc::clone(&registry));
    let recorder = Rc::new(RefCell::new(EventRecorder::new("recorder")));

    let visits = Signal::new(&runtime, vec![12.0, 19.0, 3.0]);
    let reader = visits.clone();
    let data = use_data(move |_: Option<&HeadlessChart>| {
        ChartData::new()
            .with_labels(["red", "blue", "yellow"])
            .with_dataset(Dataset::new("votes").with_values(reader.get()))
    });
    let options = use_options(MaybeSignal::getter(|| {
        ChartOptions::new(json!({ "responsive": true, "maintainAspectRatio": false }))
    }));

    let binding: ChartBinding<HeadlessChartLibrary, HeadlessContainer> = ChartBinding::new(
        &lifecycle,
        library,
        Rc::clone(&registry) as Rc<dyn ChartRegistry>,
        ChartKind::Custom("funnel".to_owned()),
        data,
        options,
        ChartBindingConfig::new()
            .with_modules([ModuleSource::deferred("funnel", || async {
                Ok(ModuleExport::new(ComponentDescriptor::controller("funnel")))
            })])
            .with_plugin(Rc::clone(&recorder) as SharedPlugin)
            .with_auto_init(false)
            .watch_source(visits.clone()),
    )
    .expect("binding");

    let (container, canvas) = use_chart_components(&binding);
    let _tree = container.render(None);
    canvas.bind(HeadlessCanvas::new("funnel-canvas"));
    container.bind(HeadlessContainer::new(Size::new(800.0, 600.0)));
    lifecycle.mount().expect("mount");

    assert!(binding.initialize().is_err());

    let registered = block_on(binding.take_pending_modules().expect("pending")).expect("modules");
    assert_eq!(registered, 1);
    binding.initialize().expect("init after controller registration");

    visits.set(vec![1.0, 2.0, 3.0]);
    binding.bounding().observe(Size::new(400.0, 300.0));

    let (values, size, responsive) = binding
        .with_chart(|chart| {
            (
                chart.data().datasets[0].data.clone(),
                chart.size(),
                chart.options().get("responsive").cloned(),
            )
        })
        .expect("chart");
    assert_eq!(
        values,
        vec![
            DataValue::Number(1.0),
            DataValue::Number(2.0),
            DataValue::Number(3.0),
        ]
    );
    assert_eq!(size, Size::new(400.0, 300.0));
    assert_eq!(responsive, Some(json!(true)));

    let events = recorder.borrow().events().to_vec();
    assert_eq!(events.first(), Some(&PluginEvent::Installed));
    assert!(events.contains(&PluginEvent::Resized {
        width: 400.0,
        height: 300.0,
    }));
    assert!(!log.is_empty());
}
