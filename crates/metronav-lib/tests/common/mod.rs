use metronav_lib::MetroMap;
use serde_json::{json, Value};

/// A small format-2 network.
///
/// 1号线 and 2号线 meet at 东港; 环线 is a circular line through 中央站,
/// 河畔, 南湖 and 西岭; 旧城 is disabled and served by no line.
pub fn sample_document() -> Value {
    json!({
        "version": "2.3",
        "stations": {
            "中央站": {
                "coordinates": [0.0, 0.0],
                "name": {"zh": "中央站", "en": "Central Station"},
            },
            "河畔": {"coordinates": [1200.0, 0.0], "name": {"zh": "河畔"}},
            "东港": {
                "coordinates": [2600.0, 0.0],
                "name": {"zh": "东港", "en": "East Harbour"},
            },
            "博物馆": {"coordinates": [2600.0, 1800.0], "name": {"zh": "博物馆"}},
            "南湖": {"coordinates": [1200.0, 1800.0], "name": {"zh": "南湖"}},
            "西岭": {"coordinates": [0.0, 1800.0], "name": {"zh": "西岭"}},
            "旧城": {
                "coordinates": [-800.0, -800.0],
                "name": {"zh": "旧城"},
                "status": "disabled",
            },
        },
        "lines": {
            "1号线": {
                "name": {"zh": "1号线"},
                "stations": ["中央站", "河畔", "东港"],
            },
            "2号线": {
                "name": {"zh": "2号线"},
                "stations": ["东港", "博物馆", "南湖"],
            },
            "环线": {
                "name": {"zh": "环线"},
                "stations": ["中央站", "河畔", "南湖", "西岭"],
                "circle": "true",
            },
        },
    })
}

pub fn sample_map() -> MetroMap {
    MetroMap::from_value(&sample_document()).expect("sample document decodes")
}
