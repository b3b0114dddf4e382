//! Common test utilities and fixture helpers.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use skyroute_lib::{load_dataset, FlightGraph, FlightId, NewFlight};

/// Path to the checked-in sample dataset.
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/flights_sample.json")
}

/// Load the sample dataset into a fresh graph.
#[allow(dead_code)]
pub fn fixture_graph() -> FlightGraph {
    load_dataset(&fixture_path()).expect("fixture loads").graph
}

/// Timestamp on `day` of June 2024.
#[allow(dead_code)]
pub fn june(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid timestamp")
}

/// Small builder for hand-made graphs.
#[allow(dead_code)]
pub struct GraphBuilder {
    graph: FlightGraph,
}

#[allow(dead_code)]
impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: FlightGraph::new(),
        }
    }

    pub fn airports(mut self, codes: &[&str]) -> Self {
        for code in codes {
            self.graph
                .add_airport(*code, *code, "Testland")
                .expect("unique airport");
        }
        self
    }

    /// Add a flight; the duration is derived from the timestamps.
    pub fn flight(
        &mut self,
        from: &str,
        to: &str,
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
        price: f64,
    ) -> FlightId {
        let duration_minutes =
            u32::try_from((arrival - departure).num_minutes()).expect("arrival after departure");
        self.graph
            .add_flight(NewFlight {
                from: from.to_string(),
                to: to.to_string(),
                carrier: format!("{from}-{to}"),
                departure,
                arrival,
                duration_minutes,
                price: Some(price),
            })
            .expect("valid flight")
    }

    pub fn graph_mut(&mut self) -> &mut FlightGraph {
        &mut self.graph
    }

    pub fn build(self) -> FlightGraph {
        self.graph
    }
}
