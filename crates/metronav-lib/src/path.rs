use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::warn;

use crate::geometry::DistanceMode;
use crate::graph::NaviGraph;
use crate::map::{Station, StationBank, StationId};

/// Default scale applied to the straight-line heuristic.
///
/// At 1.0 the Manhattan estimate never exceeds the Manhattan-weighted
/// edges, so the search stays optimal; larger values trade optimality for
/// fewer expansions.
pub const DEFAULT_HEURISTIC_WEIGHT: f64 = 1.0;

/// Total float ordering for heap scores.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FloatOrd(f64);

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Open-set entry. Ordering is reversed so the max-heap pops the lowest
/// score, and the insertion sequence breaks score ties first-in first-out,
/// which keeps equal-cost searches reproducible.
#[derive(Debug, Clone)]
struct QueueEntry {
    score: FloatOrd,
    seq: u64,
    travelled: f64,
    station: StationId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Cheapest route between two stations with the default heuristic weight.
pub fn find_route(
    graph: &NaviGraph,
    stations: &StationBank,
    start: &Station,
    goal: &Station,
) -> Option<(Vec<Station>, f64)> {
    find_route_weighted(graph, stations, start, goal, DEFAULT_HEURISTIC_WEIGHT)
}

/// A* over the graph's edge weights, guided by Manhattan distance to the
/// goal scaled by `heuristic_weight`.
///
/// Returns the station sequence from `start` to `goal` and its travelled
/// cost, or `None` when either endpoint is off the graph or no connection
/// exists. Routing a station to itself yields the single-station path at
/// zero cost.
pub fn find_route_weighted(
    graph: &NaviGraph,
    stations: &StationBank,
    start: &Station,
    goal: &Station,
    heuristic_weight: f64,
) -> Option<(Vec<Station>, f64)> {
    if start.id == goal.id {
        return Some((vec![start.clone()], 0.0));
    }
    if !graph.contains(&start.id) || !graph.contains(&goal.id) {
        warn!(start = %start.id, goal = %goal.id, "endpoint is not on the network");
        return None;
    }

    let estimate = |id: &StationId| -> f64 {
        match stations.get(id) {
            Some(station) => {
                station
                    .location
                    .distance_to(goal.location, DistanceMode::Manhattan)
                    * heuristic_weight
            }
            None => 0.0,
        }
    };

    let mut dist: HashMap<StationId, f64> = HashMap::new();
    let mut parents: HashMap<StationId, StationId> = HashMap::new();
    let mut open = BinaryHeap::new();
    let mut seq: u64 = 0;

    dist.insert(start.id.clone(), 0.0);
    open.push(QueueEntry {
        score: FloatOrd(estimate(&start.id)),
        seq,
        travelled: 0.0,
        station: start.id.clone(),
    });

    while let Some(entry) = open.pop() {
        if entry.station == goal.id {
            return rebuild(stations, &parents, start, goal).map(|path| (path, entry.travelled));
        }
        match dist.get(&entry.station) {
            Some(best) if entry.travelled > *best => continue,
            _ => {}
        }
        for (next, weight) in graph.neighbours(&entry.station) {
            let travelled = entry.travelled + weight;
            let known = dist.get(next).copied().unwrap_or(f64::INFINITY);
            if travelled < known {
                dist.insert(next.clone(), travelled);
                parents.insert(next.clone(), entry.station.clone());
                seq += 1;
                open.push(QueueEntry {
                    score: FloatOrd(travelled + estimate(next)),
                    seq,
                    travelled,
                    station: next.clone(),
                });
            }
        }
    }

    warn!(start = %start.id, goal = %goal.id, "no route between the stations");
    None
}

fn rebuild(
    stations: &StationBank,
    parents: &HashMap<StationId, StationId>,
    start: &Station,
    goal: &Station,
) -> Option<Vec<Station>> {
    let mut ids = vec![goal.id.clone()];
    let mut cursor = &goal.id;
    while cursor != &start.id {
        cursor = parents.get(cursor)?;
        ids.push(cursor.clone());
    }
    ids.reverse();
    ids.into_iter()
        .map(|id| stations.get(&id).cloned())
        .collect()
}
