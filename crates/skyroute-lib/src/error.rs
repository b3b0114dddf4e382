use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the skyroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// An airport code or city name was inserted twice.
    #[error("duplicate {kind} key: {key}")]
    DuplicateKey { kind: NodeKind, key: String },

    /// An operation referenced an airport or city that is not in the store.
    #[error("unknown {kind}: {key}")]
    UnknownNode { kind: NodeKind, key: String },

    /// An edge failed structural validation (price, timestamps, distance).
    #[error("invalid edge {from} -> {to}: {reason}")]
    InvalidEdge {
        from: String,
        to: String,
        reason: String,
    },

    /// A bulk-load record was malformed before it could reach the store.
    #[error("invalid {kind} record: {reason}")]
    InvalidRecord { kind: RecordKind, reason: String },

    /// A place name matched neither an airport nor a city.
    #[error("unknown place: {name}{}", format_suggestions(.suggestions))]
    UnknownPlace {
        name: String,
        suggestions: Vec<String>,
    },

    /// A city was found but has no nearest-airport relation to follow.
    #[error("no reachable airport for city {city}")]
    NoReachableAirport { city: String },

    /// No path satisfies the requested constraints.
    #[error("no route found between {from} and {to}")]
    NotFound { from: String, to: String },

    /// The search was aborted by a cancellation flag or deadline.
    #[error("route search between {from} and {to} was cancelled")]
    Cancelled { from: String, to: String },

    /// Dataset could not be located at the resolved path.
    #[error("dataset not found at {}", .path.display())]
    DatasetNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the dataset location")]
    ProjectDirsUnavailable,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for dataset decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error is a normal outcome of a query rather than a fault.
    ///
    /// Callers should not log these at error level.
    pub fn is_expected(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::Cancelled { .. })
    }
}

/// Node families held by the graph store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Airport,
    City,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            NodeKind::Airport => "airport",
            NodeKind::City => "city",
        })
    }
}

/// Record families accepted by the bulk loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Airport,
    City,
    NearestAirport,
    Flight,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RecordKind::Airport => "airport",
            RecordKind::City => "city",
            RecordKind::NearestAirport => "nearest airport",
            RecordKind::Flight => "flight",
        })
    }
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
