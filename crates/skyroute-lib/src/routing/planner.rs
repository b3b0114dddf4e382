//! Route planning strategies implementing the Strategy pattern.
//!
//! Each query kind pairs a weight accumulator with an admissibility rule.
//! `plan_route` only talks to the [`RoutePlanner`] trait, so a new query
//! shape is one more planner.

use crate::error::Result;
use crate::search::{
    search_many, ConnectedWithin, DirectOnly, SearchLimits, SearchOutcome, Weight,
};
use crate::store::FlightGraph;

use super::{RouteQuery, RouteRequest};

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The query this planner answers.
    fn query(&self) -> RouteQuery;

    /// Quantity being minimised.
    fn weight(&self) -> Weight;

    /// Run the search between resolved airport sets.
    fn find_path(
        &self,
        graph: &FlightGraph,
        sources: &[String],
        destinations: &[String],
        limits: &SearchLimits,
    ) -> Result<SearchOutcome>;
}

/// Cheapest single flight between two places.
#[derive(Debug, Clone, Default)]
pub struct DirectFlightPlanner;

impl RoutePlanner for DirectFlightPlanner {
    fn query(&self) -> RouteQuery {
        RouteQuery::CheapestDirect
    }

    fn weight(&self) -> Weight {
        Weight::Price
    }

    fn find_path(
        &self,
        graph: &FlightGraph,
        sources: &[String],
        destinations: &[String],
        limits: &SearchLimits,
    ) -> Result<SearchOutcome> {
        search_many(graph, sources, destinations, &Weight::Price, &DirectOnly, limits)
    }
}

/// Multi-hop planner minimising either price or flight time within a
/// calendar-day cap.
#[derive(Debug, Clone)]
pub struct ConnectingPlanner {
    weight: Weight,
    rule: ConnectedWithin,
}

impl ConnectingPlanner {
    /// Create a price-minimising planner.
    pub fn cheapest(max_days: u32) -> Self {
        Self {
            weight: Weight::Price,
            rule: ConnectedWithin::days(max_days),
        }
    }

    /// Create a duration-minimising planner.
    pub fn fastest(max_days: u32) -> Self {
        Self {
            weight: Weight::Duration,
            rule: ConnectedWithin::days(max_days),
        }
    }

    pub fn max_days(&self) -> u32 {
        self.rule.max_days
    }
}

impl RoutePlanner for ConnectingPlanner {
    fn query(&self) -> RouteQuery {
        match self.weight {
            Weight::Price => RouteQuery::Cheapest,
            Weight::Duration => RouteQuery::Fastest,
        }
    }

    fn weight(&self) -> Weight {
        self.weight
    }

    fn find_path(
        &self,
        graph: &FlightGraph,
        sources: &[String],
        destinations: &[String],
        limits: &SearchLimits,
    ) -> Result<SearchOutcome> {
        search_many(graph, sources, destinations, &self.weight, &self.rule, limits)
    }
}

/// Select the appropriate planner for a given request.
pub fn select_planner(request: &RouteRequest) -> Box<dyn RoutePlanner> {
    match request.query {
        RouteQuery::CheapestDirect => Box::new(DirectFlightPlanner),
        RouteQuery::Cheapest => Box::new(ConnectingPlanner::cheapest(request.max_days)),
        RouteQuery::Fastest => Box::new(ConnectingPlanner::fastest(request.max_days)),
    }
}
