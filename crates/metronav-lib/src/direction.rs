use std::fmt;

use crate::geometry::cross;
use crate::map::{Line, StationBank, StationId};

/// Separator between alternative direction labels.
pub const DIRECTION_SEPARATOR: &str = "/";

/// Where a ride along a line is headed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TravelDirection {
    /// Towards the named end of an open line.
    Terminus(String),
    /// Around a circular line with the platform on the outside.
    OuterLoop,
    /// Around a circular line with the platform on the inside.
    InnerLoop,
    /// The run is too short to orient.
    Unknown,
}

impl fmt::Display for TravelDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TravelDirection::Terminus(name) => f.write_str(name),
            TravelDirection::OuterLoop => f.write_str("外环"),
            TravelDirection::InnerLoop => f.write_str("内环"),
            TravelDirection::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Label for the direction of travel of `run` along `line`, suitable for
/// signage. When the run could continue to several ends the labels are
/// joined with [`DIRECTION_SEPARATOR`], duplicates removed, in the order
/// the candidates are found.
pub fn find_direction(line: &Line, stations: &StationBank, run: &[StationId]) -> String {
    let mut labels: Vec<String> = Vec::new();
    for candidate in direction_candidates(line, stations, run) {
        let label = candidate.to_string();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels.join(DIRECTION_SEPARATOR)
}

/// Every direction the run could be headed in.
///
/// The run is extended station by station along the line's own edges until
/// it can go no further; each dead end contributes its terminus. A run
/// that arrives back at its own first station with at least three distinct
/// stations visited is a lap instead, and contributes the ring label for
/// its winding. Runs handed in already closed are oriented directly.
pub fn direction_candidates(
    line: &Line,
    stations: &StationBank,
    run: &[StationId],
) -> Vec<TravelDirection> {
    if run.is_empty() {
        return vec![TravelDirection::Unknown];
    }
    if run.first() == run.last() {
        return match run.len() {
            1 => vec![TravelDirection::Unknown],
            2 => vec![terminus_direction(stations, &run[1])],
            _ => vec![loop_direction(stations, &run[..run.len() - 1])],
        };
    }

    let graph = line.graph();
    let mut results = Vec::new();
    let mut work: Vec<Vec<StationId>> = vec![run.to_vec()];
    while let Some(current) = work.pop() {
        let last = &current[current.len() - 1];
        let mut extended = false;
        let neighbours: Vec<&StationId> = graph.neighbours(last).map(|(id, _)| id).collect();
        // Reversed push so the stack explores neighbours in ascending order.
        for next in neighbours.into_iter().rev() {
            if next == &current[0] {
                if current.len() >= 3 {
                    results.push(loop_direction(stations, &current));
                    extended = true;
                }
                continue;
            }
            if current.contains(next) {
                continue;
            }
            let mut longer = current.clone();
            longer.push(next.clone());
            work.push(longer);
            extended = true;
        }
        if !extended {
            results.push(terminus_direction(stations, last));
        }
    }
    results
}

/// Ring label for one full lap, decided by the lap's winding.
///
/// The signed area of the polygon through the stations, wrap edge
/// included, is positive for one winding and negative for the other; a
/// lap through a station the bank does not know cannot be oriented.
fn loop_direction(stations: &StationBank, lap: &[StationId]) -> TravelDirection {
    let mut points = Vec::with_capacity(lap.len());
    for id in lap {
        match stations.get(id) {
            Some(station) => points.push(station.location),
            None => return TravelDirection::Unknown,
        }
    }
    let mut area = 0.0;
    for pair in points.windows(2) {
        area += cross(pair[0], pair[1]);
    }
    if points.len() > 1 {
        area += cross(points[points.len() - 1], points[0]);
    }
    if area > 0.0 {
        TravelDirection::OuterLoop
    } else {
        TravelDirection::InnerLoop
    }
}

fn terminus_direction(stations: &StationBank, id: &StationId) -> TravelDirection {
    match stations.get(id) {
        Some(station) => TravelDirection::Terminus(station.name.to_string()),
        None => TravelDirection::Terminus(id.clone()),
    }
}
