//! Translate user-supplied place names into airport codes.
//!
//! Resolution order:
//! 1. an airport code (`ZAG`),
//! 2. airports whose city attribute matches (`Zagreb`),
//! 3. a city, through its nearest-airport relation (`Cakovec`).
//!
//! A place that is both an airport city and a city node resolves to its own
//! airport(s), never to the nearest airport of itself.

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::{FlightGraph, NearestAirport};

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;
const MAX_SUGGESTIONS: usize = 3;

/// Outcome of resolving one place name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPlace {
    /// The name as the caller supplied it.
    pub query: String,
    /// Candidate airport codes, sorted ascending. Never empty.
    pub airports: Vec<String>,
    /// The nearest-airport edge followed, when the place is a city without
    /// its own airport.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<NearestAirport>,
}

impl ResolvedPlace {
    /// First candidate airport code.
    pub fn primary_airport(&self) -> &str {
        self.airports.first().map(String::as_str).unwrap_or_default()
    }
}

/// Resolve `place` to one or more airport codes.
pub fn resolve_place(graph: &FlightGraph, place: &str) -> Result<ResolvedPlace> {
    let query = place.trim();

    if let Some(airport) = graph.find_airport(query) {
        debug!(place = query, airport = %airport.code, "resolved airport code");
        return Ok(ResolvedPlace {
            query: place.to_string(),
            airports: vec![airport.code.clone()],
            via: None,
        });
    }

    let by_city = graph.airports_in_city(query);
    if !by_city.is_empty() {
        debug!(place = query, airports = ?by_city, "resolved airport city");
        return Ok(ResolvedPlace {
            query: place.to_string(),
            airports: by_city.to_vec(),
            via: None,
        });
    }

    if let Some(city) = graph.find_city(query) {
        let edge = graph
            .nearest_airport_of(&city.name)
            .ok_or_else(|| Error::NoReachableAirport {
                city: city.name.clone(),
            })?;
        debug!(
            place = query,
            airport = %edge.airport,
            distance_km = edge.distance_km,
            "resolved via nearest airport"
        );
        return Ok(ResolvedPlace {
            query: place.to_string(),
            airports: vec![edge.airport.clone()],
            via: Some(edge.clone()),
        });
    }

    Err(Error::UnknownPlace {
        name: place.to_string(),
        suggestions: fuzzy_place_matches(graph, query, MAX_SUGGESTIONS),
    })
}

/// Known place names most similar to `query`, best first.
pub fn fuzzy_place_matches(graph: &FlightGraph, query: &str, limit: usize) -> Vec<String> {
    let needle = query.to_lowercase();
    let mut scored: Vec<(f64, String)> = graph
        .place_names()
        .into_iter()
        .map(|name| (strsim::jaro_winkler(&needle, &name.to_lowercase()), name))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored.into_iter().take(limit).map(|(_, name)| name).collect()
}
