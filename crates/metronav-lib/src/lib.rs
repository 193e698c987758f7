//! Core library for the Metronav metro network tools.
//!
//! Decodes versioned map documents into an in-memory network of stations
//! and lines, finds cheapest routes over the Manhattan-weighted line
//! graph, folds a route into a rideable itinerary with directions and
//! transfers, and keeps the local map document up to date from a remote
//! source.

#![deny(warnings)]

pub mod direction;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod l10n;
pub mod map;
pub mod navigate;
pub mod output;
pub mod path;
pub mod refresh;
pub mod store;

pub use direction::{direction_candidates, find_direction, TravelDirection, DIRECTION_SEPARATOR};
pub use error::{Error, Result};
pub use geometry::{Coord2D, DistanceMode};
pub use graph::NaviGraph;
pub use l10n::{LocalizedText, PREFERRED_LANG};
pub use map::{
    Line, LineId, MapVersion, MetroMap, SchemaVersion, Station, StationBank, StationId,
    StationStatus,
};
pub use navigate::{
    navigate, navigate_with, Itinerary, NavigateOptions, NavigateOutcome, NavigateQuery,
    NavigationRecord, TOO_CLOSE_MAX, TOO_FAR_MIN,
};
pub use output::{render_itinerary, render_outcome, render_station_list};
pub use path::{find_route, find_route_weighted, DEFAULT_HEURISTIC_WEIGHT};
pub use refresh::{
    refresh_map, refresh_map_from_document, RefreshOutcome, DATA_SOURCE_ENV, DEFAULT_DATA_URL,
};
pub use store::{default_map_path, MapStore, MAP_FILENAME};
