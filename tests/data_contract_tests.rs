use approx::assert_relative_eq;
use chart_bind::core::{ChartData, ChartKind, ChartOptions, DataValue, Dataset};
use chart_bind::error::BindingError;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::json;

#[test]
fn chart_data_parses_numbers_points_and_gaps() {
    let data = ChartData::from_json_str(
        r##"{
            "labels": ["a", "b", "c"],
            "datasets": [{
                "label": "mixed",
                "data": [1, {"x": 2.5, "y": 4}, null],
                "borderColor": "#36a2eb",
                "tension": 0.4
            }]
        }"##,
    )
    .expect("parse");

    let dataset = &data.datasets[0];
    assert_eq!(dataset.label.as_deref(), Some("mixed"));
    assert_eq!(
        dataset.data,
        vec![
            DataValue::Number(1.0),
            DataValue::Point { x: 2.5, y: 4.0 },
            DataValue::Missing,
        ]
    );
    assert_eq!(dataset.extra.get("borderColor"), Some(&json!("#36a2eb")));
    assert_eq!(
        dataset.extra.keys().collect::<Vec<_>>(),
        vec!["borderColor", "tension"]
    );
}

#[test]
fn chart_data_json_keeps_extra_keys() {
    let data = ChartData::new()
        .with_labels(["q1"])
        .with_dataset(
            Dataset::new("revenue")
                .with_values([Some(10.0), None])
                .with_extra("fill", true),
        );

    let text = data.to_json_pretty().expect("serialize");
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value["datasets"][0]["fill"], json!(true));
    assert_eq!(value["datasets"][0]["data"], json!([10.0, null]));
    assert_eq!(ChartData::from_json_str(&text).expect("parse back"), data);
}

#[test]
fn malformed_json_maps_to_invalid_data() {
    let err = ChartData::from_json_str("{\"labels\": 3}").expect_err("bad labels");
    assert!(matches!(err, BindingError::InvalidData(message) if message.contains("chart data")));
}

#[test]
fn chart_kind_uses_library_names() {
    assert_eq!(serde_json::to_value(ChartKind::PolarArea).expect("kind"), json!("polarArea"));
    assert_eq!(
        serde_json::from_value::<ChartKind>(json!("doughnut")).expect("builtin"),
        ChartKind::Doughnut
    );
    assert_eq!(
        serde_json::from_value::<ChartKind>(json!("sankey")).expect("custom"),
        ChartKind::Custom("sankey".to_owned())
    );
    assert_eq!(ChartKind::Custom("sankey".to_owned()).to_string(), "sankey");
}

#[test]
fn decimal_and_time_values_convert() {
    let value = DataValue::from_decimal(Decimal::new(12_345, 2)).expect("decimal");
    assert_relative_eq!(value.y().expect("y"), 123.45);

    let time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().expect("time");
    let point = DataValue::time_point(time, 7.5);
    assert_eq!(
        point,
        DataValue::Point {
            x: 1_704_164_645.0,
            y: 7.5,
        }
    );
    assert_eq!(DataValue::Missing.y(), None);
}

#[test]
fn options_parse_requires_object() {
    let options = ChartOptions::from_json_str(r#"{"plugins": {"legend": {"display": false}}}"#)
        .expect("options");
    assert_eq!(options.get("plugins.legend.display"), Some(&json!(false)));
    assert!(matches!(
        ChartOptions::from_json_str("true"),
        Err(BindingError::InvalidData(_))
    ));
}
