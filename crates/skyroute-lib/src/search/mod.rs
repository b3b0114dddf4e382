//! Constrained weighted path search over the flight graph.
//!
//! This module provides:
//! - [`search`] / [`search_many`] - Dijkstra over partial itineraries
//! - [`Admissibility`] - pluggable rule deciding whether a flight may extend a path
//! - [`EdgeWeight`] - pluggable per-flight cost (price, duration, or a closure)
//! - [`SearchLimits`] - hop cap, deadline and cancellation flag
//!
//! # State compression
//!
//! Admissibility may depend on the path's first and last flight, so a plain
//! per-airport distance table is not enough. The frontier holds labels keyed
//! by `(first flight, last flight)`; the last flight fixes the current airport.
//! When a hop cap is set the hop count joins the key. Each key keeps only its
//! best `(weight, hops)`, which bounds the work by the number of flight pairs
//! rather than the number of paths.

mod admissibility;
mod weight;

pub use admissibility::{Admissibility, ConnectedWithin, DirectOnly, PathView};
pub use weight::{EdgeWeight, Weight};

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, NodeKind, Result};
use crate::store::{Flight, FlightGraph, FlightId};

/// Shared flag that aborts in-flight searches when set.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Bounds applied to a single search.
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    /// Maximum number of flights in the returned path.
    pub max_hops: Option<usize>,
    /// Abort with [`SearchOutcome::Cancelled`] once this instant has passed.
    pub deadline: Option<Instant>,
    /// Abort with [`SearchOutcome::Cancelled`] once the flag is set.
    pub cancel: Option<CancelFlag>,
}

impl SearchLimits {
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = Some(max_hops);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn should_stop(&self) -> bool {
        if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
            return true;
        }
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Minimum-weight itinerary found by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    /// Flights in travel order. Never empty.
    pub flights: Vec<FlightId>,
    /// Accumulated weight under the weight function used for the search.
    pub weight: f64,
}

impl Path {
    /// Number of flights taken.
    pub fn hops(&self) -> usize {
        self.flights.len()
    }

    pub fn first(&self) -> Option<FlightId> {
        self.flights.first().copied()
    }

    pub fn last(&self) -> Option<FlightId> {
        self.flights.last().copied()
    }

    /// Resolve the flight identifiers against the graph they came from.
    pub fn legs<'a>(&'a self, graph: &'a FlightGraph) -> impl Iterator<Item = &'a Flight> + 'a {
        self.flights.iter().filter_map(move |&id| graph.flight(id))
    }
}

/// Result of a search. `NotFound` and `Cancelled` are normal outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Path),
    NotFound,
    Cancelled,
}

impl SearchOutcome {
    pub fn found(self) -> Option<Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NotFound | SearchOutcome::Cancelled => None,
        }
    }
}

/// Find the minimum-weight path from `source` to `destination`.
///
/// Every extension must satisfy `admissible`. Ties on weight are broken by
/// fewer flights, then the earlier first departure, then discovery order.
/// Returns [`Error::UnknownNode`] if either airport is missing.
pub fn search<W, A>(
    graph: &FlightGraph,
    source: &str,
    destination: &str,
    weight: &W,
    admissible: &A,
    limits: &SearchLimits,
) -> Result<SearchOutcome>
where
    W: EdgeWeight + ?Sized,
    A: Admissibility + ?Sized,
{
    search_many(graph, &[source], &[destination], weight, admissible, limits)
}

/// Multi-source, multi-destination variant of [`search`].
///
/// Used when a place resolves to several airports; the best path from any
/// source to any destination wins.
pub fn search_many<S, W, A>(
    graph: &FlightGraph,
    sources: &[S],
    destinations: &[S],
    weight: &W,
    admissible: &A,
    limits: &SearchLimits,
) -> Result<SearchOutcome>
where
    S: AsRef<str>,
    W: EdgeWeight + ?Sized,
    A: Admissibility + ?Sized,
{
    for code in sources.iter().chain(destinations) {
        let code = code.as_ref();
        if graph.airport(code).is_none() {
            return Err(Error::UnknownNode {
                kind: NodeKind::Airport,
                key: code.to_string(),
            });
        }
    }

    let targets: HashSet<&str> = destinations.iter().map(|code| code.as_ref()).collect();
    let mut frontier = Frontier::new(limits.max_hops.is_some());

    for source in sources {
        for flight in graph.outgoing_flights(source.as_ref()) {
            if !admissible.admits(PathView::empty(), flight) {
                continue;
            }
            if let Some(cost) = edge_cost(weight, flight) {
                frontier.offer(flight, flight, None, cost, 1, limits);
            }
        }
    }

    let mut expanded = 0usize;
    while let Some(entry) = frontier.queue.pop() {
        if limits.should_stop() {
            debug!(expanded, "search cancelled");
            return Ok(SearchOutcome::Cancelled);
        }
        if !frontier.is_current(&entry) {
            continue;
        }
        expanded += 1;

        let label = &frontier.labels[entry.label];
        let (last_id, first_id, cost, hops) = (label.flight, label.first, label.cost, label.hops);
        let (Some(last), Some(first)) = (graph.flight(last_id), graph.flight(first_id)) else {
            continue;
        };

        if targets.contains(last.to.as_str()) {
            let path = frontier.reconstruct(entry.label, cost);
            debug!(
                expanded,
                labels = frontier.labels.len(),
                hops = path.hops(),
                weight = path.weight,
                "search found path"
            );
            return Ok(SearchOutcome::Found(path));
        }

        let view = PathView::new(first, last);
        for next in graph.outgoing_flights(&last.to) {
            if !admissible.admits(view, next) {
                continue;
            }
            if let Some(step) = edge_cost(weight, next) {
                frontier.offer(first, next, Some(entry.label), cost + step, hops + 1, limits);
            }
        }
    }

    debug!(expanded, labels = frontier.labels.len(), "search exhausted frontier");
    Ok(SearchOutcome::NotFound)
}

fn edge_cost<W: EdgeWeight + ?Sized>(weight: &W, flight: &Flight) -> Option<f64> {
    let cost = weight.weight(flight);
    if cost.is_finite() && cost >= 0.0 {
        Some(cost)
    } else {
        debug!(flight = flight.id, cost, "skipping flight with unusable weight");
        None
    }
}

/// Compressed search state: the first flight and the flight just taken, plus
/// the hop count when a hop cap is in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct StateKey {
    first: FlightId,
    last: FlightId,
    hops: Option<usize>,
}

#[derive(Debug, Clone)]
struct Label {
    flight: FlightId,
    first: FlightId,
    parent: Option<usize>,
    cost: f64,
    hops: usize,
}

struct Frontier {
    labels: Vec<Label>,
    best: HashMap<StateKey, (FloatOrd, usize, usize)>,
    queue: BinaryHeap<QueueEntry>,
    track_hops: bool,
}

impl Frontier {
    fn new(track_hops: bool) -> Self {
        Self {
            labels: Vec::new(),
            best: HashMap::new(),
            queue: BinaryHeap::new(),
            track_hops,
        }
    }

    /// Record a label for `next` if it improves on the best known for its state.
    fn offer(
        &mut self,
        first: &Flight,
        next: &Flight,
        parent: Option<usize>,
        cost: f64,
        hops: usize,
        limits: &SearchLimits,
    ) {
        if limits.max_hops.is_some_and(|max| hops > max) {
            return;
        }

        let key = StateKey {
            first: first.id,
            last: next.id,
            hops: self.track_hops.then_some(hops),
        };
        let index = self.labels.len();
        let candidate = (FloatOrd(cost), hops);

        match self.best.entry(key) {
            Entry::Occupied(mut slot) => {
                let (best_cost, best_hops, _) = *slot.get();
                if candidate >= (best_cost, best_hops) {
                    return;
                }
                slot.insert((candidate.0, hops, index));
            }
            Entry::Vacant(slot) => {
                slot.insert((candidate.0, hops, index));
            }
        }

        self.labels.push(Label {
            flight: next.id,
            first: first.id,
            parent,
            cost,
            hops,
        });
        self.queue.push(QueueEntry {
            cost: FloatOrd(cost),
            hops,
            departure: first.departure,
            label: index,
            key,
        });
    }

    /// Whether the entry still holds the best label for its state.
    fn is_current(&self, entry: &QueueEntry) -> bool {
        self.best
            .get(&entry.key)
            .is_some_and(|&(_, _, label)| label == entry.label)
    }

    fn reconstruct(&self, label: usize, cost: f64) -> Path {
        let mut flights = Vec::new();
        let mut current = Some(label);
        while let Some(index) = current {
            let label = &self.labels[index];
            flights.push(label.flight);
            current = label.parent;
        }
        flights.reverse();
        Path {
            flights,
            weight: cost,
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

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

#[derive(Clone, Debug, PartialEq, Eq)]
struct QueueEntry {
    cost: FloatOrd,
    hops: usize,
    departure: NaiveDateTime,
    /// Index into the label arena; doubles as discovery order.
    label: usize,
    key: StateKey,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.hops.cmp(&self.hops))
            .then_with(|| other.departure.cmp(&self.departure))
            .then_with(|| other.label.cmp(&self.label))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
