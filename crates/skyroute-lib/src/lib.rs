//! skyroute library entry points.
//!
//! This crate holds an in-memory flight graph, resolves place names to
//! airports, and runs constrained weighted path searches over scheduled
//! flights. Higher-level consumers (the CLI) should only depend on the
//! functions exported here instead of reimplementing behavior.
//!
//! A graph is bulk-loaded once and then shared read-only, typically as an
//! `Arc<FlightGraph>`; every search owns its own frontier, so searches on the
//! same graph can run in parallel.

#![deny(warnings)]

pub mod dataset;
pub mod error;
pub mod loader;
pub mod output;
pub mod resolver;
pub mod routing;
pub mod search;
pub mod store;

pub use dataset::{default_dataset_path, load_dataset, resolve_dataset_path, DATASET_ENV_VAR};
pub use error::{Error, NodeKind, RecordKind, Result};
pub use loader::{
    load_records, AirportRecord, CityRecord, DatasetRecords, FlightRecord, LoadReport,
    NearestAirportRecord, Numeric, RejectedRecord,
};
pub use output::{RouteEndpoint, RouteLeg, RouteRenderMode, RouteSummary};
pub use resolver::{resolve_place, ResolvedPlace};
pub use routing::{
    cheapest_direct_flight, cheapest_route, fastest_route, plan_route, Itinerary, RouteQuery,
    RouteRequest, DEFAULT_MAX_DAYS,
};
pub use search::{
    search, search_many, Admissibility, CancelFlag, ConnectedWithin, DirectOnly, EdgeWeight,
    Path, PathView, SearchLimits, SearchOutcome, Weight,
};
pub use store::{Airport, City, Flight, FlightGraph, FlightId, NearestAirport, NewFlight};
