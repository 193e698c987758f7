use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the Metronav library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when the map document has no top-level version field.
    #[error("map document is missing a version field")]
    MissingVersion,

    /// Raised when the version field does not parse as `<format>.<data>[-suffix]`.
    #[error("invalid map version `{value}`")]
    InvalidVersion { value: String },

    /// Raised when the version names a format this library cannot decode.
    #[error("unsupported map format version {format_ver}")]
    UnsupportedFormat { format_ver: u32 },

    /// Raised when a required top-level table is absent from the document.
    #[error("map document is missing the `{table}` table")]
    MissingTable { table: &'static str },

    /// Raised when a top-level table is not a JSON object.
    #[error("map document table `{table}` is not an object")]
    MalformedTable { table: &'static str },

    /// Raised when a station entry fails to decode.
    #[error("malformed station `{id}`: {message}")]
    MalformedStation { id: String, message: String },

    /// Raised when a line entry fails to decode.
    #[error("malformed line `{id}`: {message}")]
    MalformedLine { id: String, message: String },

    /// Raised when every station a line references is missing from the map.
    #[error("line `{id}` has no usable stations")]
    EmptyLine { id: String },

    /// Raised when a station name could not be found in the map.
    #[error("unknown station `{name}`{}", format_suggestions(.suggestions))]
    UnknownStation {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a navigation query matches none of the accepted shapes.
    #[error("invalid navigation query: {reason}")]
    InvalidQuery { reason: String },

    /// Raised when a coordinate endpoint has no station to snap to.
    #[error("the map has no stations to search")]
    NoStations,

    /// Raised when a path segment is carried by no line. The navigation
    /// graph is the union of line graphs, so this cannot happen for maps
    /// built by ingestion; it keeps segmentation total for merged graphs.
    #[error("path segment {from} -> {to} is not covered by any line")]
    UncoveredSegment { from: String, to: String },

    /// Map document could not be located at the resolved path.
    #[error("map data not found at {}", .path.display())]
    DataFileNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for map data")]
    ProjectDirsUnavailable,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON parse errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
