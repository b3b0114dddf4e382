//! Route queries over the flight graph.
//!
//! This module provides:
//! - [`RouteQuery`] - Supported query shapes (cheapest direct, cheapest, fastest)
//! - [`RouteRequest`] - High-level route request naming two places
//! - [`Itinerary`] - The winning flights plus how each place was resolved
//! - [`plan_route`] - Main entry point; [`cheapest_direct_flight`],
//!   [`cheapest_route`] and [`fastest_route`] are shorthands
//!
//! # Example
//!
//! ```ignore
//! use skyroute_lib::{load_dataset, plan_route, RouteRequest};
//!
//! let report = load_dataset("flights.json".as_ref())?;
//! let request = RouteRequest::cheapest("Zagreb", "Porto", 2);
//! let itinerary = plan_route(&report.graph, &request)?;
//! println!("{} flights, {:.2} total", itinerary.hops(), itinerary.total_price);
//! ```

mod planner;

pub use planner::{select_planner, ConnectingPlanner, DirectFlightPlanner, RoutePlanner};

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::resolver::{resolve_place, ResolvedPlace};
use crate::search::{SearchLimits, SearchOutcome};
use crate::store::{Flight, FlightGraph};

/// Default calendar-day cap for connecting itineraries.
pub const DEFAULT_MAX_DAYS: u32 = 1;

/// Supported query shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RouteQuery {
    /// One flight, lowest price; ties go to the earliest departure.
    CheapestDirect,
    /// Connected flights within the day cap, lowest total price.
    #[default]
    Cheapest,
    /// Connected flights within the day cap, lowest total flight time.
    Fastest,
}

impl fmt::Display for RouteQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteQuery::CheapestDirect => "cheapest-direct",
            RouteQuery::Cheapest => "cheapest",
            RouteQuery::Fastest => "fastest",
        };
        f.write_str(value)
    }
}

/// High-level route request.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub from: String,
    pub to: String,
    pub query: RouteQuery,
    /// Calendar-day cap; ignored by [`RouteQuery::CheapestDirect`].
    pub max_days: u32,
    pub limits: SearchLimits,
}

impl RouteRequest {
    pub fn cheapest_direct(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from, to, RouteQuery::CheapestDirect, DEFAULT_MAX_DAYS)
    }

    pub fn cheapest(from: impl Into<String>, to: impl Into<String>, max_days: u32) -> Self {
        Self::new(from, to, RouteQuery::Cheapest, max_days)
    }

    pub fn fastest(from: impl Into<String>, to: impl Into<String>, max_days: u32) -> Self {
        Self::new(from, to, RouteQuery::Fastest, max_days)
    }

    fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        query: RouteQuery,
        max_days: u32,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            query,
            max_days,
            limits: SearchLimits::default(),
        }
    }

    /// Attach search limits (hop cap, deadline, cancellation).
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Planned itinerary returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    pub query: RouteQuery,
    pub departure: ResolvedPlace,
    pub destination: ResolvedPlace,
    /// Flights in travel order. Never empty.
    pub flights: Vec<Flight>,
    pub total_price: f64,
    pub total_duration_minutes: u64,
    /// Accumulated weight the search minimised (price or minutes).
    pub weight: f64,
}

impl Itinerary {
    /// Number of flights taken.
    pub fn hops(&self) -> usize {
        self.flights.len()
    }

    pub fn departure_time(&self) -> Option<NaiveDateTime> {
        self.flights.first().map(|flight| flight.departure)
    }

    pub fn arrival_time(&self) -> Option<NaiveDateTime> {
        self.flights.last().map(|flight| flight.arrival)
    }

    /// Codes of the airports visited, origin first.
    pub fn airports(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.flights.iter().map(|f| f.from.as_str()).collect();
        if let Some(last) = self.flights.last() {
            codes.push(last.to.as_str());
        }
        codes
    }
}

/// Answer a route request.
///
/// This is the main entry point for route queries. It:
/// 1. Resolves both place names to airport codes
/// 2. Selects the planner for the query
/// 3. Runs the constrained search
/// 4. Packages the winning flights into an [`Itinerary`]
pub fn plan_route(graph: &FlightGraph, request: &RouteRequest) -> Result<Itinerary> {
    let departure = resolve_place(graph, &request.from)?;
    let destination = resolve_place(graph, &request.to)?;

    let planner = select_planner(request);
    let outcome = planner.find_path(
        graph,
        &departure.airports,
        &destination.airports,
        &request.limits,
    )?;

    let path = match outcome {
        SearchOutcome::Found(path) => path,
        SearchOutcome::NotFound => {
            debug!(from = %request.from, to = %request.to, query = %request.query, "no route");
            return Err(Error::NotFound {
                from: request.from.clone(),
                to: request.to.clone(),
            });
        }
        SearchOutcome::Cancelled => {
            debug!(from = %request.from, to = %request.to, query = %request.query, "route search cancelled");
            return Err(Error::Cancelled {
                from: request.from.clone(),
                to: request.to.clone(),
            });
        }
    };

    let flights: Vec<Flight> = path.legs(graph).cloned().collect();
    let total_price: f64 = flights.iter().map(|flight| flight.price).sum();
    let total_duration_minutes: u64 = flights
        .iter()
        .map(|flight| u64::from(flight.duration_minutes))
        .sum();

    Ok(Itinerary {
        query: planner.query(),
        departure,
        destination,
        flights,
        total_price,
        total_duration_minutes,
        weight: path.weight,
    })
}

/// Cheapest single flight between two places.
pub fn cheapest_direct_flight(graph: &FlightGraph, from: &str, to: &str) -> Result<Itinerary> {
    plan_route(graph, &RouteRequest::cheapest_direct(from, to))
}

/// Cheapest connected itinerary whose span stays within `max_days` calendar days.
pub fn cheapest_route(
    graph: &FlightGraph,
    from: &str,
    to: &str,
    max_days: u32,
) -> Result<Itinerary> {
    plan_route(graph, &RouteRequest::cheapest(from, to, max_days))
}

/// Fastest connected itinerary (by summed flight time) within `max_days` calendar days.
pub fn fastest_route(graph: &FlightGraph, from: &str, to: &str, max_days: u32) -> Result<Itinerary> {
    plan_route(graph, &RouteRequest::fastest(from, to, max_days))
}
