use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use metronav_lib::{find_route, navigate, MetroMap, NavigateQuery};

const GRID: usize = 10;

/// A 10x10 station grid with one line per row and per column, so every
/// station is a transfer between two lines.
fn grid_document() -> Value {
    let mut stations = serde_json::Map::new();
    for row in 0..GRID {
        for col in 0..GRID {
            stations.insert(
                format!("s{row:02}{col:02}"),
                json!({
                    "coordinates": [col as f64 * 1000.0, row as f64 * 1000.0],
                    "name": {"zh": format!("站{row:02}{col:02}")},
                }),
            );
        }
    }
    let mut lines = serde_json::Map::new();
    for row in 0..GRID {
        let ids: Vec<String> = (0..GRID).map(|col| format!("s{row:02}{col:02}")).collect();
        lines.insert(
            format!("横{row:02}"),
            json!({"name": {"zh": format!("横{row:02}号线")}, "stations": ids}),
        );
    }
    for col in 0..GRID {
        let ids: Vec<String> = (0..GRID).map(|row| format!("s{row:02}{col:02}")).collect();
        lines.insert(
            format!("纵{col:02}"),
            json!({"name": {"zh": format!("纵{col:02}号线")}, "stations": ids}),
        );
    }
    json!({"version": "2.9", "stations": stations, "lines": lines})
}

static DOCUMENT: Lazy<Value> = Lazy::new(grid_document);
static MAP: Lazy<MetroMap> = Lazy::new(|| MetroMap::from_value(&DOCUMENT).unwrap());

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_grid_document", |b| {
        b.iter(|| MetroMap::from_value(black_box(&DOCUMENT)).unwrap())
    });
}

fn bench_route(c: &mut Criterion) {
    let graph = MAP.navigation_graph();
    let start = MAP.station("s0000").unwrap();
    let goal = MAP.station("s0909").unwrap();
    c.bench_function("route_corner_to_corner", |b| {
        b.iter(|| find_route(black_box(&graph), &MAP.stations, start, goal).unwrap())
    });
}

fn bench_navigate(c: &mut Criterion) {
    let query = NavigateQuery::TwoNames {
        start: "s0000".to_string(),
        goal: "s0909".to_string(),
    };
    c.bench_function("navigate_corner_to_corner", |b| {
        b.iter(|| navigate(black_box(&MAP), &query).unwrap())
    });
}

criterion_group!(benches, bench_parse, bench_route, bench_navigate);
criterion_main!(benches);
