use std::rc::Rc;

use chart_bind::api::{
    ChartBinding, ChartBindingConfig, ChartCanvas, ChartContainer, DataProducer, OptionsProducer,
    RefSlot, ViewNode, use_chart_components,
};
use chart_bind::backend::headless::{
    ChartCall, HeadlessCanvas, HeadlessChartLibrary, HeadlessContainer, HeadlessRegistry,
};
use chart_bind::core::{ChartData, ChartKind, Size};
use chart_bind::reactive::{Lifecycle, Runtime};

type HeadlessBinding = ChartBinding<HeadlessChartLibrary, HeadlessContainer>;

fn binding(lifecycle: &Lifecycle) -> HeadlessBinding {
    ChartBinding::new(
        lifecycle,
        HeadlessChartLibrary::default(),
        Rc::new(HeadlessRegistry::new()),
        ChartKind::Scatter,
        DataProducer::constant(ChartData::new()),
        OptionsProducer::none(),
        ChartBindingConfig::new(),
    )
    .expect("binding")
}

#[test]
fn container_wraps_canvas_by_default() {
    let lifecycle = Lifecycle::new(&Runtime::new());
    let binding = binding(&lifecycle);
    let (container, _canvas) = use_chart_components(&binding);

    let tree = container.render(None);
    let root = tree.as_element().expect("root element");
    assert_eq!(root.tag, "div");
    assert_eq!(root.ref_slot, Some(RefSlot::Container));
    assert_eq!(root.style.get("position").map(String::as_str), Some("relative"));
    assert_eq!(root.children.len(), 1);

    let child = root.children[0].as_element().expect("canvas element");
    assert_eq!(child.tag, "canvas");
    assert_eq!(child.ref_slot, Some(RefSlot::Canvas));

    assert_eq!(
        tree.to_markup(),
        "<div data-ref=\"container\" style=\"position: relative; width: 100%; height: 100%\">\
         <canvas data-ref=\"canvas\"></canvas></div>"
    );
}

#[test]
fn slot_content_replaces_default_canvas() {
    let lifecycle = Lifecycle::new(&Runtime::new());
    let binding = binding(&lifecycle);
    let (container, canvas) = use_chart_components(&binding);

    let tree = container.render(Some(vec![
        ViewNode::text("Revenue <2024>"),
        canvas.render(),
    ]));

    assert_eq!(
        tree.to_markup(),
        "<div data-ref=\"container\" style=\"position: relative; width: 100%; height: 100%\">\
         Revenue &lt;2024&gt;<canvas data-ref=\"canvas\"></canvas></div>"
    );
}

#[test]
fn binding_rendered_elements_initializes_chart_on_mount() {
    let lifecycle = Lifecycle::new(&Runtime::new());
    let binding = binding(&lifecycle);
    let (container, canvas) = use_chart_components(&binding);

    canvas.bind(HeadlessCanvas::new("scatter"));
    container.bind(HeadlessContainer::new(Size::new(320.0, 240.0)));
    lifecycle.mount().expect("mount");

    assert!(binding.has_chart());
    assert_eq!(binding.bounding().size(), Size::new(320.0, 240.0));
    assert_eq!(
        binding.with_chart(|chart| chart.size()),
        Some(Size::new(320.0, 240.0))
    );
    let log = binding.library().log();
    assert_eq!(log.count(|call| matches!(call, ChartCall::Resize { .. })), 1);
    let entries = log.entries();
    let resize_at = entries
        .iter()
        .position(|call| matches!(call, ChartCall::Resize { .. }))
        .expect("resize logged");
    let update_at = entries
        .iter()
        .position(|call| matches!(call, ChartCall::Update { .. }))
        .expect("update logged");
    assert!(resize_at < update_at);
}

#[test]
fn component_names_match_host_registration() {
    assert_eq!(ChartCanvas::<HeadlessCanvas>::NAME, "ChartCanvas");
    assert_eq!(
        ChartContainer::<HeadlessCanvas, HeadlessContainer>::NAME,
        "ChartComponent"
    );
}
