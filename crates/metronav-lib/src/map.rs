use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;
use strsim::jaro_winkler;
use tracing::warn;

use crate::error::{Error, Result};
use crate::geometry::{Coord2D, DistanceMode};
use crate::graph::NaviGraph;
use crate::l10n::LocalizedText;

/// Unique station key within a map.
pub type StationId = String;

/// Unique line key within a map.
pub type LineId = String;

/// Station table keyed by id, in ascending id order.
pub type StationBank = BTreeMap<StationId, Station>;

/// Minimum Jaro-Winkler similarity for a name to count as a suggestion.
const FUZZY_MATCH_THRESHOLD: f64 = 0.6;

/// Parsed `<format>.<data>[-suffix]` map version.
///
/// `format_ver` selects the document schema, `data_ver` orders content
/// revisions. The suffix is carried for display but never compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapVersion {
    pub format_ver: u32,
    pub data_ver: u64,
    pub suffix: Option<String>,
}

impl MapVersion {
    /// True when `self` carries strictly newer data than `other`.
    ///
    /// Only `data_ver` participates; format and suffix are ignored.
    pub fn is_newer_than(&self, other: &MapVersion) -> bool {
        self.data_ver > other.data_ver
    }
}

impl FromStr for MapVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidVersion {
            value: s.to_string(),
        };
        let (format_part, rest) = s.split_once('.').ok_or_else(invalid)?;
        let (data_part, suffix) = match rest.split_once('-') {
            Some((data, suffix)) => (data, Some(suffix.to_string())),
            None => (rest, None),
        };
        Ok(MapVersion {
            format_ver: format_part.parse().map_err(|_| invalid())?,
            data_ver: data_part.parse().map_err(|_| invalid())?,
            suffix,
        })
    }
}

impl fmt::Display for MapVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suffix {
            Some(suffix) => write!(f, "{}.{}-{}", self.format_ver, self.data_ver, suffix),
            None => write!(f, "{}.{}", self.format_ver, self.data_ver),
        }
    }
}

/// Whether a station is open for service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StationStatus {
    #[default]
    Enabled,
    Disabled,
}

impl StationStatus {
    pub fn is_enabled(self) -> bool {
        matches!(self, StationStatus::Enabled)
    }
}

/// A single metro stop.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: StationId,
    pub location: Coord2D,
    pub name: LocalizedText,
    pub status: StationStatus,
}

impl Station {
    /// Manhattan distance between the two stations' platforms.
    pub fn distance_to(&self, other: &Station) -> f64 {
        self.location
            .distance_to(other.location, DistanceMode::Manhattan)
    }
}

// Station identity is the id alone; coordinates and names do not
// participate.
impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// One service line: an ordered walk over stations, optionally circular.
///
/// The line stores station ids and a derived id-keyed adjacency; station
/// data itself lives only in the owning [`MetroMap`].
#[derive(Debug, Clone)]
pub struct Line {
    pub id: LineId,
    pub name: LocalizedText,
    pub circular: bool,
    /// Station ids in canonical order, unresolvable references dropped.
    pub stations: Vec<StationId>,
    graph: NaviGraph,
}

impl Line {
    /// Build a line over resolved stations, wiring an edge between each
    /// consecutive pair (plus the closing edge for circular lines with at
    /// least two stations), weighted by Manhattan distance.
    pub(crate) fn new(id: LineId, name: LocalizedText, circular: bool, members: &[&Station]) -> Line {
        let mut graph = NaviGraph::new();
        for station in members {
            graph.add_node(station.id.clone());
        }
        for pair in members.windows(2) {
            graph.add_route(&pair[0].id, &pair[1].id, pair[0].distance_to(pair[1]));
        }
        if circular && members.len() > 1 {
            let first = members[0];
            let last = members[members.len() - 1];
            graph.add_route(&last.id, &first.id, last.distance_to(first));
        }
        Line {
            id,
            name,
            circular,
            stations: members.iter().map(|s| s.id.clone()).collect(),
            graph,
        }
    }

    /// The line's own adjacency: edges only between consecutive stops.
    pub fn graph(&self) -> &NaviGraph {
        &self.graph
    }

    /// True when the run, taken in order, is a connected walk along this
    /// line: every station is a member and every consecutive pair has a
    /// direct line edge. Empty runs are vacuously included.
    pub fn includes(&self, run: &[StationId]) -> bool {
        let mut last: Option<&StationId> = None;
        for id in run {
            if !self.graph.contains(id) {
                return false;
            }
            if let Some(previous) = last {
                if self.graph.weight(previous, id).is_none() {
                    return false;
                }
            }
            last = Some(id);
        }
        true
    }
}

/// Document schema generations this library can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// Legacy flat tables: bare coordinates, names in a side table.
    V1,
    /// Current self-describing station and line records.
    V2,
}

impl SchemaVersion {
    pub fn for_format(format_ver: u32) -> Result<SchemaVersion> {
        match format_ver {
            1 => Ok(SchemaVersion::V1),
            2 => Ok(SchemaVersion::V2),
            other => Err(Error::UnsupportedFormat { format_ver: other }),
        }
    }
}

/// The whole network: versioned station and line tables.
///
/// Built wholesale by [`MetroMap::from_value`] and immutable afterwards;
/// loading newer data means building a new map and swapping it in.
#[derive(Debug, Clone)]
pub struct MetroMap {
    pub version: MapVersion,
    pub stations: StationBank,
    pub lines: BTreeMap<LineId, Line>,
}

impl MetroMap {
    /// Decode a map document, dispatching on its format version.
    pub fn from_value(document: &Value) -> Result<MetroMap> {
        let version = read_version(document)?;
        match SchemaVersion::for_format(version.format_ver)? {
            SchemaVersion::V1 => decode_v1(document, version),
            SchemaVersion::V2 => decode_v2(document, version),
        }
    }

    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.get(id)
    }

    /// Look a station up by id, then by any localized display name.
    ///
    /// The name scan visits stations in ascending id order; the first
    /// carrier of the name wins.
    pub fn station_by_name(&self, name: &str) -> Option<&Station> {
        if let Some(station) = self.stations.get(name) {
            return Some(station);
        }
        self.stations
            .values()
            .find(|station| station.name.variants().any(|text| text == name))
    }

    /// Closest station to `location` by Manhattan distance, with that
    /// distance. The scan visits stations in ascending id order and only a
    /// strictly smaller distance replaces the candidate, so ties go to the
    /// first minimum found.
    pub fn nearest_station(&self, location: Coord2D) -> Option<(&Station, f64)> {
        self.nearest_station_where(location, |_| true)
    }

    /// Nearest-station search restricted to stations accepted by `filter`.
    pub fn nearest_station_where<F>(&self, location: Coord2D, mut filter: F) -> Option<(&Station, f64)>
    where
        F: FnMut(&Station) -> bool,
    {
        let mut best: Option<(&Station, f64)> = None;
        for station in self.stations.values() {
            if !filter(station) {
                continue;
            }
            let distance = location.distance_to(station.location, DistanceMode::Manhattan);
            match best {
                Some((_, nearest)) if distance >= nearest => {}
                _ => best = Some((station, distance)),
            }
        }
        best
    }

    /// Union of every line's adjacency. Stations served by no line are not
    /// nodes of this graph.
    pub fn navigation_graph(&self) -> NaviGraph {
        let mut graph = NaviGraph::new();
        for line in self.lines.values() {
            graph.merge(line.graph());
        }
        graph
    }

    /// Stations split into (enabled, disabled), each in ascending id order.
    pub fn stations_by_status(&self) -> (Vec<&Station>, Vec<&Station>) {
        let mut enabled = Vec::new();
        let mut disabled = Vec::new();
        for station in self.stations.values() {
            if station.status.is_enabled() {
                enabled.push(station);
            } else {
                disabled.push(station);
            }
        }
        (enabled, disabled)
    }

    /// Display names closest to `name`, best match first.
    ///
    /// Similarity is the best Jaro-Winkler score across the station id and
    /// every translation; candidates below the threshold are dropped.
    pub fn fuzzy_station_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let mut scored: Vec<(f64, String)> = Vec::new();
        for station in self.stations.values() {
            let score = station
                .name
                .variants()
                .map(|text| jaro_winkler(name, text))
                .fold(jaro_winkler(name, &station.id), f64::max);
            if score >= FUZZY_MATCH_THRESHOLD {
                scored.push((score, station.name.to_string()));
            }
        }
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        let mut names: Vec<String> = Vec::new();
        for (_, name) in scored {
            if names.len() == limit {
                break;
            }
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

fn read_version(document: &Value) -> Result<MapVersion> {
    let value = document.get("version").ok_or(Error::MissingVersion)?;
    match value {
        Value::String(s) => s.parse(),
        // Historic format-1 files wrote the version as a bare number.
        Value::Number(n) => n.to_string().parse(),
        other => Err(Error::InvalidVersion {
            value: other.to_string(),
        }),
    }
}

fn table<'a>(document: &'a Value, name: &'static str) -> Result<&'a serde_json::Map<String, Value>> {
    document
        .get(name)
        .ok_or(Error::MissingTable { table: name })?
        .as_object()
        .ok_or(Error::MalformedTable { table: name })
}

/// Raw format-2 station record.
#[derive(Debug, Deserialize)]
struct RawStation {
    coordinates: (f64, f64),
    name: LocalizedText,
    #[serde(default)]
    status: Option<String>,
}

/// Raw format-2 line record.
#[derive(Debug, Deserialize)]
struct RawLine {
    name: LocalizedText,
    stations: Vec<StationId>,
    #[serde(default)]
    circle: Option<Value>,
}

fn parse_status(id: &str, status: Option<&str>) -> Result<StationStatus> {
    match status {
        None => Ok(StationStatus::Enabled),
        // "enable" appears in older data files.
        Some("enabled") | Some("enable") => Ok(StationStatus::Enabled),
        Some("disabled") => Ok(StationStatus::Disabled),
        Some(other) => Err(Error::MalformedStation {
            id: id.to_string(),
            message: format!("unknown status `{other}`"),
        }),
    }
}

/// Truthiness of the `circle` flag: JSON booleans pass through, the string
/// spellings "true"/"yes"/"1" (any case) count as circular, everything
/// else does not.
fn circle_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(s)) => {
            matches!(s.to_lowercase().as_str(), "true" | "yes" | "1")
        }
        _ => false,
    }
}

fn resolve_members<'a>(
    line_id: &str,
    ids: &[StationId],
    stations: &'a StationBank,
) -> Result<Vec<&'a Station>> {
    let mut members = Vec::with_capacity(ids.len());
    for id in ids {
        match stations.get(id) {
            Some(station) => members.push(station),
            None => warn!(line = %line_id, station = %id, "line references unknown station, dropping"),
        }
    }
    if members.is_empty() {
        return Err(Error::EmptyLine {
            id: line_id.to_string(),
        });
    }
    Ok(members)
}

fn decode_v2(document: &Value, version: MapVersion) -> Result<MetroMap> {
    let mut stations = StationBank::new();
    for (id, value) in table(document, "stations")? {
        let raw: RawStation =
            serde_json::from_value(value.clone()).map_err(|err| Error::MalformedStation {
                id: id.clone(),
                message: err.to_string(),
            })?;
        if raw.name.is_empty() {
            return Err(Error::MalformedStation {
                id: id.clone(),
                message: "empty name table".to_string(),
            });
        }
        let status = parse_status(id, raw.status.as_deref())?;
        stations.insert(
            id.clone(),
            Station {
                id: id.clone(),
                location: Coord2D::new(raw.coordinates.0, raw.coordinates.1),
                name: raw.name,
                status,
            },
        );
    }

    let mut lines = BTreeMap::new();
    for (id, value) in table(document, "lines")? {
        let raw: RawLine =
            serde_json::from_value(value.clone()).map_err(|err| Error::MalformedLine {
                id: id.clone(),
                message: err.to_string(),
            })?;
        if raw.name.is_empty() {
            return Err(Error::MalformedLine {
                id: id.clone(),
                message: "empty name table".to_string(),
            });
        }
        let members = resolve_members(id, &raw.stations, &stations)?;
        let circular = circle_flag(raw.circle.as_ref());
        lines.insert(id.clone(), Line::new(id.clone(), raw.name, circular, &members));
    }

    Ok(MetroMap {
        version,
        stations,
        lines,
    })
}

fn decode_v1(document: &Value, version: MapVersion) -> Result<MetroMap> {
    let mut stations = StationBank::new();
    for (id, value) in table(document, "stations")? {
        let (x, z): (f64, f64) =
            serde_json::from_value(value.clone()).map_err(|err| Error::MalformedStation {
                id: id.clone(),
                message: err.to_string(),
            })?;
        stations.insert(
            id.clone(),
            Station {
                id: id.clone(),
                location: Coord2D::new(x, z),
                // Legacy files have no name table; the id is the display name.
                name: LocalizedText::single("zh", id),
                status: StationStatus::Enabled,
            },
        );
    }

    let raw_lines = table(document, "lines")?;
    let mut lines = BTreeMap::new();
    // Lines are enumerated from the code table; entries in `lines` without
    // a code carry no display name and are not part of the network.
    for (id, value) in table(document, "linesCode")? {
        let (zh, en): (String, String) =
            serde_json::from_value(value.clone()).map_err(|err| Error::MalformedLine {
                id: id.clone(),
                message: err.to_string(),
            })?;
        let ids: Vec<StationId> = match raw_lines.get(id) {
            Some(entry) => {
                serde_json::from_value(entry.clone()).map_err(|err| Error::MalformedLine {
                    id: id.clone(),
                    message: err.to_string(),
                })?
            }
            None => {
                return Err(Error::MalformedLine {
                    id: id.clone(),
                    message: "missing from the lines table".to_string(),
                })
            }
        };
        let members = resolve_members(id, &ids, &stations)?;
        let mut name = LocalizedText::single("zh", &zh);
        name.insert("en", &en);
        lines.insert(id.clone(), Line::new(id.clone(), name, false, &members));
    }

    Ok(MetroMap {
        version,
        stations,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parses_format_data_and_suffix() {
        let version: MapVersion = "2.13-beta".parse().unwrap();
        assert_eq!(version.format_ver, 2);
        assert_eq!(version.data_ver, 13);
        assert_eq!(version.suffix.as_deref(), Some("beta"));
        assert_eq!(version.to_string(), "2.13-beta");
    }

    #[test]
    fn version_without_suffix_round_trips() {
        let version: MapVersion = "1.7".parse().unwrap();
        assert_eq!(version.suffix, None);
        assert_eq!(version.to_string(), "1.7");
    }

    #[test]
    fn version_rejects_garbage() {
        assert!("".parse::<MapVersion>().is_err());
        assert!("2".parse::<MapVersion>().is_err());
        assert!("two.three".parse::<MapVersion>().is_err());
        assert!("2.x-beta".parse::<MapVersion>().is_err());
    }

    #[test]
    fn newer_compares_data_version_only() {
        let old: MapVersion = "2.2".parse().unwrap();
        let new: MapVersion = "2.13".parse().unwrap();
        let other_format: MapVersion = "1.13-rc".parse().unwrap();
        assert!(new.is_newer_than(&old));
        assert!(!old.is_newer_than(&new));
        assert!(!new.is_newer_than(&other_format));
        assert!(!other_format.is_newer_than(&new));
    }

    #[test]
    fn station_identity_is_id_only() {
        let a = Station {
            id: "x".to_string(),
            location: Coord2D::new(0.0, 0.0),
            name: LocalizedText::single("zh", "甲"),
            status: StationStatus::Enabled,
        };
        let b = Station {
            id: "x".to_string(),
            location: Coord2D::new(99.0, 99.0),
            name: LocalizedText::single("zh", "乙"),
            status: StationStatus::Disabled,
        };
        assert_eq!(a, b);
    }

    #[test]
    fn status_accepts_the_legacy_spelling() {
        assert_eq!(parse_status("s", Some("enable")).unwrap(), StationStatus::Enabled);
        assert_eq!(parse_status("s", None).unwrap(), StationStatus::Enabled);
        assert_eq!(
            parse_status("s", Some("disabled")).unwrap(),
            StationStatus::Disabled
        );
        assert!(parse_status("s", Some("closed")).is_err());
    }

    #[test]
    fn circle_flag_accepts_bool_and_string_forms() {
        use serde_json::json;
        assert!(circle_flag(Some(&json!(true))));
        assert!(circle_flag(Some(&json!("true"))));
        assert!(circle_flag(Some(&json!("YES"))));
        assert!(circle_flag(Some(&json!("1"))));
        assert!(!circle_flag(Some(&json!(false))));
        assert!(!circle_flag(Some(&json!("no"))));
        assert!(!circle_flag(Some(&json!(1))));
        assert!(!circle_flag(None));
    }
}
