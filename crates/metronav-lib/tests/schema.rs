mod common;

use common::{sample_document, sample_map};
use metronav_lib::{Error, MetroMap, StationStatus};
use serde_json::json;

#[test]
fn decodes_the_current_format() {
    let map = sample_map();
    assert_eq!(map.version.to_string(), "2.3");
    assert_eq!(map.stations.len(), 7);
    assert_eq!(map.lines.len(), 3);

    let central = map.station("中央站").unwrap();
    assert_eq!(central.name.get("en"), Some("Central Station"));
    assert_eq!(central.status, StationStatus::Enabled);
    assert_eq!(map.station("旧城").unwrap().status, StationStatus::Disabled);

    assert!(map.lines["环线"].circular);
    assert!(!map.lines["1号线"].circular);
}

#[test]
fn line_edges_use_manhattan_weights() {
    let document = json!({
        "version": "2.1",
        "stations": {
            "a": {"coordinates": [0.0, 0.0], "name": {"zh": "a"}},
            "b": {"coordinates": [3.0, 4.0], "name": {"zh": "b"}},
        },
        "lines": {
            "l": {"name": {"zh": "l"}, "stations": ["a", "b"]},
        },
    });
    let map = MetroMap::from_value(&document).unwrap();
    assert_eq!(map.navigation_graph().weight("a", "b"), Some(7.0));
}

#[test]
fn circular_lines_close_the_loop() {
    let map = sample_map();
    let ring = map.lines["环线"].graph();
    assert_eq!(ring.weight("西岭", "中央站"), Some(1800.0));
    let open = map.lines["1号线"].graph();
    assert_eq!(open.weight("东港", "中央站"), None);
}

#[test]
fn unknown_station_references_are_dropped() {
    let mut document = sample_document();
    document["lines"]["1号线"]["stations"]
        .as_array_mut()
        .unwrap()
        .push(json!("幽灵站"));
    let map = MetroMap::from_value(&document).unwrap();
    let line = &map.lines["1号线"];
    assert_eq!(line.stations, ["中央站", "河畔", "东港"]);
    assert!(!line.graph().contains("幽灵站"));
}

#[test]
fn a_line_with_no_resolvable_stations_is_an_error() {
    let mut document = sample_document();
    document["lines"]["1号线"]["stations"] = json!(["幽灵站", "无名站"]);
    match MetroMap::from_value(&document) {
        Err(Error::EmptyLine { id }) => assert_eq!(id, "1号线"),
        other => panic!("expected EmptyLine, got {other:?}"),
    }
}

#[test]
fn version_field_is_mandatory_and_checked() {
    assert!(matches!(
        MetroMap::from_value(&json!({"stations": {}, "lines": {}})),
        Err(Error::MissingVersion)
    ));
    assert!(matches!(
        MetroMap::from_value(&json!({"version": "fish", "stations": {}, "lines": {}})),
        Err(Error::InvalidVersion { .. })
    ));
    assert!(matches!(
        MetroMap::from_value(&json!({"version": "3.1", "stations": {}, "lines": {}})),
        Err(Error::UnsupportedFormat { format_ver: 3 })
    ));
}

#[test]
fn malformed_station_records_name_the_station() {
    let mut document = sample_document();
    document["stations"]["河畔"] = json!({"coordinates": "north", "name": {"zh": "河畔"}});
    match MetroMap::from_value(&document) {
        Err(Error::MalformedStation { id, .. }) => assert_eq!(id, "河畔"),
        other => panic!("expected MalformedStation, got {other:?}"),
    }

    let mut document = sample_document();
    document["stations"]["河畔"]["status"] = json!("closed");
    assert!(matches!(
        MetroMap::from_value(&document),
        Err(Error::MalformedStation { .. })
    ));
}

#[test]
fn parsing_is_deterministic() {
    let first = sample_map();
    let second = sample_map();
    assert_eq!(
        first.stations.keys().collect::<Vec<_>>(),
        second.stations.keys().collect::<Vec<_>>()
    );
    assert_eq!(
        first.lines.keys().collect::<Vec<_>>(),
        second.lines.keys().collect::<Vec<_>>()
    );
    assert_eq!(first.navigation_graph(), second.navigation_graph());
}

#[test]
fn decodes_the_legacy_format() {
    let document = json!({
        "version": "1.7",
        "stations": {
            "甲": [0.0, 0.0],
            "乙": [10.0, 0.0],
            "丙": [30.0, 0.0],
        },
        "lines": {
            "L1": ["甲", "乙", "丙"],
        },
        "linesCode": {
            "L1": ["一号线", "Line 1"],
        },
    });
    let map = MetroMap::from_value(&document).unwrap();
    assert_eq!(map.version.format_ver, 1);

    // Legacy stations have no name table and are all in service.
    let station = map.station("乙").unwrap();
    assert_eq!(station.name.to_string(), "乙");
    assert!(station.status.is_enabled());

    let line = &map.lines["L1"];
    assert_eq!(line.name.get("zh"), Some("一号线"));
    assert_eq!(line.name.get("en"), Some("Line 1"));
    assert!(!line.circular);
    assert_eq!(line.graph().weight("乙", "丙"), Some(20.0));
}

#[test]
fn legacy_version_may_be_a_bare_number() {
    let document = json!({
        "version": 1.7,
        "stations": {"甲": [0.0, 0.0]},
        "lines": {},
        "linesCode": {},
    });
    let map = MetroMap::from_value(&document).unwrap();
    assert_eq!(map.version.format_ver, 1);
    assert_eq!(map.version.data_ver, 7);
}

#[test]
fn legacy_line_without_a_route_is_an_error() {
    let document = json!({
        "version": "1.2",
        "stations": {"甲": [0.0, 0.0]},
        "lines": {},
        "linesCode": {"L9": ["九号线", "Line 9"]},
    });
    match MetroMap::from_value(&document) {
        Err(Error::MalformedLine { id, .. }) => assert_eq!(id, "L9"),
        other => panic!("expected MalformedLine, got {other:?}"),
    }
}
