use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{Error, NodeKind, Result};

/// Dense identifier assigned to each flight at insertion time.
pub type FlightId = usize;

/// Airport node keyed by its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Airport {
    pub code: String,
    pub city: String,
    pub country: String,
}

/// City node keyed by its name. A city may or may not have its own airport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct City {
    pub name: String,
    pub population: u64,
    pub country: String,
}

/// Directed relation from a city to the airport its travellers use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestAirport {
    pub city: String,
    pub airport: String,
    pub distance_km: f64,
}

/// One scheduled, priced flight between two airports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flight {
    pub id: FlightId,
    pub from: String,
    pub to: String,
    pub carrier: String,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub duration_minutes: u32,
    pub price: f64,
}

/// Flight attributes supplied when inserting an edge.
///
/// `price` is optional because upstream records may omit it; such flights
/// are rejected rather than stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFlight {
    pub from: String,
    pub to: String,
    pub carrier: String,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub duration_minutes: u32,
    pub price: Option<f64>,
}

/// In-memory directed multigraph of airports, cities and flights.
///
/// The store is built by a single writer and then shared read-only (usually
/// behind an `Arc`). It carries no interior mutability, so concurrent readers
/// need no locking.
#[derive(Debug, Clone, Default)]
pub struct FlightGraph {
    airports: HashMap<String, Airport>,
    cities: HashMap<String, City>,
    flights: Vec<Flight>,
    outgoing: HashMap<String, Vec<FlightId>>,
    nearest: HashMap<String, Vec<NearestAirport>>,
    // Case-insensitive indexes used by place resolution.
    code_index: HashMap<String, String>,
    city_index: HashMap<String, String>,
    airports_by_city: HashMap<String, Vec<String>>,
}

impl FlightGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an airport. Fails with [`Error::DuplicateKey`] if the code exists,
    /// ignoring case.
    pub fn add_airport(
        &mut self,
        code: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<()> {
        let code = code.into().trim().to_string();
        if self.code_index.contains_key(&normalize_key(&code)) {
            return Err(Error::DuplicateKey {
                kind: NodeKind::Airport,
                key: code,
            });
        }

        let airport = Airport {
            code: code.clone(),
            city: city.into().trim().to_string(),
            country: country.into().trim().to_string(),
        };

        let by_city = self
            .airports_by_city
            .entry(normalize_key(&airport.city))
            .or_default();
        by_city.push(code.clone());
        by_city.sort();

        self.code_index.insert(normalize_key(&code), code.clone());
        self.outgoing.entry(code.clone()).or_default();
        self.airports.insert(code, airport);
        Ok(())
    }

    /// Insert a city. Fails with [`Error::DuplicateKey`] if the name exists,
    /// ignoring case.
    pub fn add_city(
        &mut self,
        name: impl Into<String>,
        population: u64,
        country: impl Into<String>,
    ) -> Result<()> {
        let name = name.into().trim().to_string();
        if self.city_index.contains_key(&normalize_key(&name)) {
            return Err(Error::DuplicateKey {
                kind: NodeKind::City,
                key: name,
            });
        }

        self.city_index.insert(normalize_key(&name), name.clone());
        self.cities.insert(
            name.clone(),
            City {
                name,
                population,
                country: country.into().trim().to_string(),
            },
        );
        Ok(())
    }

    /// Link a city to an airport it can use for departures and arrivals.
    pub fn add_nearest_airport(
        &mut self,
        city_name: &str,
        airport_code: &str,
        distance_km: f64,
    ) -> Result<()> {
        let city_name = city_name.trim();
        let airport_code = airport_code.trim();
        if !self.cities.contains_key(city_name) {
            return Err(Error::UnknownNode {
                kind: NodeKind::City,
                key: city_name.to_string(),
            });
        }
        if !self.airports.contains_key(airport_code) {
            return Err(Error::UnknownNode {
                kind: NodeKind::Airport,
                key: airport_code.to_string(),
            });
        }
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(Error::InvalidEdge {
                from: city_name.to_string(),
                to: airport_code.to_string(),
                reason: format!("distance must be a non-negative number, got {distance_km}"),
            });
        }

        let edges = self.nearest.entry(city_name.to_string()).or_default();
        edges.push(NearestAirport {
            city: city_name.to_string(),
            airport: airport_code.to_string(),
            distance_km,
        });
        // Closest first, so `nearest_airport_of` is a deterministic head lookup.
        edges.sort_by(|a, b| {
            compare_distance(a.distance_km, b.distance_km).then_with(|| a.airport.cmp(&b.airport))
        });
        Ok(())
    }

    /// Insert a flight edge and return its identifier.
    ///
    /// Fails with [`Error::UnknownNode`] if either endpoint is missing and with
    /// [`Error::InvalidEdge`] if the price is absent, negative or not finite, or
    /// the flight arrives before it departs. The duration is stored as given.
    pub fn add_flight(&mut self, flight: NewFlight) -> Result<FlightId> {
        let from = flight.from.trim().to_string();
        let to = flight.to.trim().to_string();
        for code in [&from, &to] {
            if !self.airports.contains_key(code) {
                return Err(Error::UnknownNode {
                    kind: NodeKind::Airport,
                    key: code.clone(),
                });
            }
        }

        let invalid = |reason: String| Error::InvalidEdge {
            from: from.clone(),
            to: to.clone(),
            reason,
        };

        let price = match flight.price {
            None => return Err(invalid("price is missing".to_string())),
            Some(price) if !price.is_finite() || price < 0.0 => {
                return Err(invalid(format!(
                    "price must be a non-negative number, got {price}"
                )))
            }
            Some(price) => price,
        };
        if flight.arrival < flight.departure {
            return Err(invalid(format!(
                "arrival {} precedes departure {}",
                flight.arrival, flight.departure
            )));
        }

        let id = self.flights.len();
        self.outgoing.entry(from.clone()).or_default().push(id);
        self.flights.push(Flight {
            id,
            from,
            to,
            carrier: flight.carrier.trim().to_string(),
            departure: flight.departure,
            arrival: flight.arrival,
            duration_minutes: flight.duration_minutes,
            price,
        });
        Ok(id)
    }

    /// Flights leaving `airport_code`, in insertion order.
    pub fn outgoing_flights<'a>(&'a self, airport_code: &str) -> impl Iterator<Item = &'a Flight> {
        self.outgoing_flight_ids(airport_code)
            .iter()
            .map(move |&id| &self.flights[id])
    }

    /// Identifiers of the flights leaving `airport_code`, in insertion order.
    pub fn outgoing_flight_ids(&self, airport_code: &str) -> &[FlightId] {
        self.outgoing
            .get(airport_code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The closest nearest-airport edge for a city, if any.
    ///
    /// When several exist the smallest distance wins, then the lowest code.
    pub fn nearest_airport_of(&self, city_name: &str) -> Option<&NearestAirport> {
        self.nearest.get(city_name).and_then(|edges| edges.first())
    }

    pub fn airport(&self, code: &str) -> Option<&Airport> {
        self.airports.get(code)
    }

    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.get(name)
    }

    /// Look up a flight by identifier.
    pub fn flight(&self, id: FlightId) -> Option<&Flight> {
        self.flights.get(id)
    }

    /// Airport whose code matches `query` ignoring case.
    pub fn find_airport(&self, query: &str) -> Option<&Airport> {
        self.code_index
            .get(&normalize_key(query))
            .and_then(|code| self.airports.get(code))
    }

    /// City whose name matches `query` ignoring case.
    pub fn find_city(&self, query: &str) -> Option<&City> {
        self.city_index
            .get(&normalize_key(query))
            .and_then(|name| self.cities.get(name))
    }

    /// Codes of the airports whose `city` attribute matches `city`, ignoring
    /// case, sorted ascending.
    pub fn airports_in_city(&self, city: &str) -> &[String] {
        self.airports_by_city
            .get(&normalize_key(city))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every name a user could type to refer to a place: airport codes,
    /// airport cities and city names. Sorted and de-duplicated.
    pub fn place_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .airports
            .values()
            .flat_map(|airport| [airport.code.clone(), airport.city.clone()])
            .chain(self.cities.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn airport_count(&self) -> usize {
        self.airports.len()
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn flight_count(&self) -> usize {
        self.flights.len()
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }
}

fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

fn compare_distance(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Greater)
}
