use tracing::debug;

use crate::direction::find_direction;
use crate::error::{Error, Result};
use crate::geometry::Coord2D;
use crate::map::{Line, MetroMap, Station, StationId};
use crate::path::{find_route_weighted, DEFAULT_HEURISTIC_WEIGHT};

/// Combined walking distance at or under which two queries that snap to
/// the same station are "too close" to ride. Zero walking distance is not
/// too close, it simply has no itinerary.
pub const TOO_CLOSE_MAX: f64 = 50.0;

/// Combined walking distance at or over which the query is considered off
/// the network entirely.
pub const TOO_FAR_MIN: f64 = 200_000.0;

const MAX_SUGGESTIONS: usize = 3;

/// A navigation request, one of the four accepted endpoint shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigateQuery {
    TwoCoordinates { start: Coord2D, goal: Coord2D },
    TwoNames { start: String, goal: String },
    NameThenCoordinate { start: String, goal: Coord2D },
    CoordinateThenName { start: Coord2D, goal: String },
}

impl NavigateQuery {
    /// Classify 2 to 4 positional tokens into a query shape.
    ///
    /// A token is a coordinate component iff it parses as a number;
    /// anything else is a station name. Shapes are: four numbers, two
    /// names, a name then a coordinate pair, or a coordinate pair then a
    /// name.
    pub fn parse_tokens(tokens: &[String]) -> Result<NavigateQuery> {
        let numbers: Vec<Option<f64>> = tokens
            .iter()
            .map(|token| token.parse::<f64>().ok())
            .collect();
        match numbers.as_slice() {
            [Some(x1), Some(z1), Some(x2), Some(z2)] => Ok(NavigateQuery::TwoCoordinates {
                start: Coord2D::new(*x1, *z1),
                goal: Coord2D::new(*x2, *z2),
            }),
            [None, None] => Ok(NavigateQuery::TwoNames {
                start: tokens[0].clone(),
                goal: tokens[1].clone(),
            }),
            [None, Some(x), Some(z)] => Ok(NavigateQuery::NameThenCoordinate {
                start: tokens[0].clone(),
                goal: Coord2D::new(*x, *z),
            }),
            [Some(x), Some(z), None] => Ok(NavigateQuery::CoordinateThenName {
                start: Coord2D::new(*x, *z),
                goal: tokens[2].clone(),
            }),
            _ => Err(Error::InvalidQuery {
                reason: format!(
                    "expected two names, four coordinates, or a name and a coordinate pair, got {} token(s)",
                    tokens.len()
                ),
            }),
        }
    }

    fn endpoints(&self) -> (Endpoint<'_>, Endpoint<'_>) {
        match self {
            NavigateQuery::TwoCoordinates { start, goal } => {
                (Endpoint::Position(*start), Endpoint::Position(*goal))
            }
            NavigateQuery::TwoNames { start, goal } => {
                (Endpoint::Name(start), Endpoint::Name(goal))
            }
            NavigateQuery::NameThenCoordinate { start, goal } => {
                (Endpoint::Name(start), Endpoint::Position(*goal))
            }
            NavigateQuery::CoordinateThenName { start, goal } => {
                (Endpoint::Position(*start), Endpoint::Name(goal))
            }
        }
    }
}

enum Endpoint<'a> {
    Name(&'a str),
    Position(Coord2D),
}

/// Tunable thresholds and search parameters for [`navigate_with`].
#[derive(Debug, Clone, Copy)]
pub struct NavigateOptions {
    pub too_close_max: f64,
    pub too_far_min: f64,
    pub heuristic_weight: f64,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        NavigateOptions {
            too_close_max: TOO_CLOSE_MAX,
            too_far_min: TOO_FAR_MIN,
            heuristic_weight: DEFAULT_HEURISTIC_WEIGHT,
        }
    }
}

/// One step of a rendered journey. Station and line fields carry display
/// names, ready for signage.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationRecord {
    /// Walk from the query position to the entry station. Present even
    /// when the walking distance is zero.
    Enter { station: String, walk_distance: f64 },
    /// Ride one line for `stops` stops.
    Ride {
        line: String,
        direction: String,
        stops: usize,
        from: String,
        to: String,
    },
    /// Change lines without leaving the station.
    Transfer {
        at: String,
        from_line: String,
        to_line: String,
    },
    /// Walk from the exit station to the query position. Present even
    /// when the walking distance is zero.
    Exit { station: String, walk_distance: f64 },
}

/// A complete journey with its distance totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub records: Vec<NavigationRecord>,
    pub walk_distance: f64,
    pub ride_distance: f64,
}

/// What a navigation query resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigateOutcome {
    Itinerary(Itinerary),
    /// Both endpoints snap to the same station within walking range.
    TooClose,
    /// Both endpoints snap to the same station from much too far away.
    TooFar,
    /// Same station, or no rideable plan between the endpoints.
    NoItinerary,
    /// The endpoints are on the network but not connected.
    NoRoute { start: String, goal: String },
}

/// Resolve a query against the map with the default options.
pub fn navigate(map: &MetroMap, query: &NavigateQuery) -> Result<NavigateOutcome> {
    navigate_with(map, query, &NavigateOptions::default())
}

/// Resolve a query against the map.
///
/// Coordinates snap to the nearest station, keeping the walking distance;
/// names must match a station id or display name. When both endpoints
/// resolve to the same station the combined walking distance decides
/// between the degenerate outcomes. Otherwise the shortest path over the
/// whole network is split into single-line rides, longest ride first, with
/// a transfer between consecutive rides.
pub fn navigate_with(
    map: &MetroMap,
    query: &NavigateQuery,
    options: &NavigateOptions,
) -> Result<NavigateOutcome> {
    let (from, to) = query.endpoints();
    let (start, start_walk) = resolve_endpoint(map, &from)?;
    let (goal, goal_walk) = resolve_endpoint(map, &to)?;
    let total_walk = start_walk + goal_walk;

    if start.id == goal.id {
        return Ok(degenerate_outcome(total_walk, options));
    }

    let graph = map.navigation_graph();
    let route = find_route_weighted(&graph, &map.stations, start, goal, options.heuristic_weight);
    let Some((path, ride_distance)) = route else {
        return Ok(NavigateOutcome::NoRoute {
            start: start.name.to_string(),
            goal: goal.name.to_string(),
        });
    };

    let ids: Vec<StationId> = path.iter().map(|station| station.id.clone()).collect();
    let mut records = vec![NavigationRecord::Enter {
        station: display_name(map, &ids[0]),
        walk_distance: start_walk,
    }];

    let mut cursor = 0;
    let mut previous: Option<&Line> = None;
    while cursor + 1 < ids.len() {
        let (line, stops) = longest_ride(map, &ids[cursor..])?;
        let run = &ids[cursor..cursor + stops + 1];
        let direction = find_direction(line, &map.stations, run);
        debug!(
            line = %line.id,
            stops,
            from = %run[0],
            to = %run[run.len() - 1],
            "ride segment"
        );
        if let Some(previous) = previous {
            records.push(NavigationRecord::Transfer {
                at: display_name(map, &run[0]),
                from_line: previous.name.to_string(),
                to_line: line.name.to_string(),
            });
        }
        records.push(NavigationRecord::Ride {
            line: line.name.to_string(),
            direction,
            stops,
            from: display_name(map, &run[0]),
            to: display_name(map, &run[run.len() - 1]),
        });
        previous = Some(line);
        cursor += stops;
    }

    records.push(NavigationRecord::Exit {
        station: display_name(map, &ids[ids.len() - 1]),
        walk_distance: goal_walk,
    });

    Ok(NavigateOutcome::Itinerary(Itinerary {
        records,
        walk_distance: total_walk,
        ride_distance,
    }))
}

fn resolve_endpoint<'a>(map: &'a MetroMap, endpoint: &Endpoint<'_>) -> Result<(&'a Station, f64)> {
    match endpoint {
        Endpoint::Name(name) => {
            let station = map.station_by_name(name).ok_or_else(|| Error::UnknownStation {
                name: (*name).to_string(),
                suggestions: map.fuzzy_station_matches(name, MAX_SUGGESTIONS),
            })?;
            Ok((station, 0.0))
        }
        Endpoint::Position(location) => {
            let (station, distance) = map.nearest_station(*location).ok_or(Error::NoStations)?;
            Ok((station, distance))
        }
    }
}

fn degenerate_outcome(total_walk: f64, options: &NavigateOptions) -> NavigateOutcome {
    if total_walk > 0.0 && total_walk <= options.too_close_max {
        NavigateOutcome::TooClose
    } else if total_walk >= options.too_far_min {
        NavigateOutcome::TooFar
    } else {
        NavigateOutcome::NoItinerary
    }
}

/// The longest prefix of `remaining` that a single line carries, with that
/// line and its stop count. Lines are tried in id order, so a tie between
/// lines goes to the id-smallest one.
fn longest_ride<'a>(map: &'a MetroMap, remaining: &[StationId]) -> Result<(&'a Line, usize)> {
    for len in (2..=remaining.len()).rev() {
        let prefix = &remaining[..len];
        for line in map.lines.values() {
            if line.includes(prefix) {
                return Ok((line, len - 1));
            }
        }
    }
    Err(Error::UncoveredSegment {
        from: remaining[0].clone(),
        to: remaining[1].clone(),
    })
}

fn display_name(map: &MetroMap, id: &StationId) -> String {
    match map.station(id) {
        Some(station) => station.name.to_string(),
        None => id.clone(),
    }
}
