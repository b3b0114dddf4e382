//! Bulk loading of external records into a [`FlightGraph`].
//!
//! Records arrive in any order. Nodes are inserted in a first pass and edges
//! in a second, so an edge listed before its endpoints still loads. A record
//! that fails validation is skipped and reported in [`LoadReport::rejected`];
//! it never aborts the rest of the load.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, RecordKind, Result};
use crate::store::{FlightGraph, NewFlight};

/// Timestamp layouts accepted for flight departure and arrival fields.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A numeric field as it appeared upstream.
///
/// Values that do not fit `T` (text such as `"N/A"`, negatives for unsigned
/// fields, fractions for whole minutes) are kept as raw JSON so the owning
/// record can be rejected on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric<T> {
    Number(T),
    Invalid(serde_json::Value),
}

impl<T: Copy> Numeric<T> {
    /// The number, or [`Error::InvalidRecord`] naming `field`.
    pub fn value(&self, kind: RecordKind, field: &str) -> Result<T> {
        match self {
            Numeric::Number(value) => Ok(*value),
            Numeric::Invalid(raw) => Err(Error::InvalidRecord {
                kind,
                reason: format!("{field} {raw} is not a valid number"),
            }),
        }
    }
}

impl<T> From<T> for Numeric<T> {
    fn from(value: T) -> Self {
        Numeric::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    pub code: String,
    pub city: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    #[serde(default)]
    pub population: Option<Numeric<u64>>,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestAirportRecord {
    pub city: String,
    pub airport: String,
    #[serde(default)]
    pub distance_km: Option<Numeric<f64>>,
}

/// Flight row as supplied upstream. Timestamps are kept as text and numbers
/// as [`Numeric`] so that a malformed value rejects one record instead of
/// failing the whole decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub carrier: String,
    pub departure: String,
    pub arrival: String,
    #[serde(default)]
    pub duration_minutes: Option<Numeric<u32>>,
    #[serde(default)]
    pub price: Option<Numeric<f64>>,
}

/// Complete record set for one graph snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecords {
    #[serde(default)]
    pub airports: Vec<AirportRecord>,
    #[serde(default)]
    pub cities: Vec<CityRecord>,
    #[serde(default)]
    pub nearest_airports: Vec<NearestAirportRecord>,
    #[serde(default)]
    pub flights: Vec<FlightRecord>,
}

/// A record that was skipped during loading and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub kind: RecordKind,
    /// Position of the record within its list in [`DatasetRecords`].
    pub index: usize,
    /// Human-readable key (`ZAG`, `Cakovec -> VZN`, ...).
    pub key: String,
    pub reason: String,
}

/// Result of a bulk load: the populated graph plus every rejected record.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub graph: FlightGraph,
    pub rejected: Vec<RejectedRecord>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Build a fresh graph from `records`.
pub fn load_records(records: &DatasetRecords) -> LoadReport {
    let mut graph = FlightGraph::new();
    let mut rejected = Vec::new();

    for (index, record) in records.airports.iter().enumerate() {
        let outcome = require_key(RecordKind::Airport, "code", &record.code)
            .and_then(|_| graph.add_airport(&record.code, &record.city, &record.country));
        track(&mut rejected, RecordKind::Airport, index, &record.code, outcome);
    }

    for (index, record) in records.cities.iter().enumerate() {
        let outcome = require_key(RecordKind::City, "name", &record.name)
            .and_then(|_| {
                record
                    .population
                    .as_ref()
                    .map(|population| population.value(RecordKind::City, "population"))
                    .transpose()
            })
            .and_then(|population| {
                graph.add_city(&record.name, population.unwrap_or_default(), &record.country)
            });
        track(&mut rejected, RecordKind::City, index, &record.name, outcome);
    }

    for (index, record) in records.nearest_airports.iter().enumerate() {
        let key = format!("{} -> {}", record.city, record.airport);
        let outcome = record
            .distance_km
            .as_ref()
            .ok_or_else(|| Error::InvalidRecord {
                kind: RecordKind::NearestAirport,
                reason: "distance_km is missing".to_string(),
            })
            .and_then(|distance| distance.value(RecordKind::NearestAirport, "distance_km"))
            .and_then(|distance| {
                graph.add_nearest_airport(&record.city, &record.airport, distance)
            });
        track(&mut rejected, RecordKind::NearestAirport, index, &key, outcome);
    }

    for (index, record) in records.flights.iter().enumerate() {
        let key = format!(
            "{} -> {} {} {}",
            record.from, record.to, record.carrier, record.departure
        );
        let outcome = flight_from_record(record).and_then(|flight| graph.add_flight(flight));
        track(&mut rejected, RecordKind::Flight, index, &key, outcome);
    }

    debug!(
        airports = graph.airport_count(),
        cities = graph.city_count(),
        flights = graph.flight_count(),
        rejected = rejected.len(),
        "flight graph loaded"
    );

    LoadReport { graph, rejected }
}

fn flight_from_record(record: &FlightRecord) -> Result<NewFlight> {
    let departure = parse_timestamp("departure", &record.departure)?;
    let arrival = parse_timestamp("arrival", &record.arrival)?;
    let duration_minutes = record
        .duration_minutes
        .as_ref()
        .ok_or_else(|| Error::InvalidRecord {
            kind: RecordKind::Flight,
            reason: "duration_minutes is missing".to_string(),
        })?
        .value(RecordKind::Flight, "duration_minutes")?;
    let price = record
        .price
        .as_ref()
        .map(|price| price.value(RecordKind::Flight, "price"))
        .transpose()?;

    Ok(NewFlight {
        from: record.from.clone(),
        to: record.to.clone(),
        carrier: record.carrier.clone(),
        departure,
        arrival,
        duration_minutes,
        price,
    })
}

/// Parse a local civil timestamp in one of [`TIMESTAMP_FORMATS`].
pub fn parse_timestamp(field: &str, value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| Error::InvalidRecord {
            kind: RecordKind::Flight,
            reason: format!("{field} timestamp '{value}' is not recognised"),
        })
}

fn require_key(kind: RecordKind, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidRecord {
            kind,
            reason: format!("{field} is empty"),
        });
    }
    Ok(())
}

fn track<T>(
    rejected: &mut Vec<RejectedRecord>,
    kind: RecordKind,
    index: usize,
    key: &str,
    outcome: Result<T>,
) {
    if let Err(err) = outcome {
        warn!(%kind, index, key, error = %err, "rejected record");
        rejected.push(RejectedRecord {
            kind,
            index,
            key: key.to_string(),
            reason: err.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(from: &str, to: &str, price: Option<f64>) -> FlightRecord {
        FlightRecord {
            from: from.to_string(),
            to: to.to_string(),
            carrier: "TAP".to_string(),
            departure: "2024-05-01T08:00:00".to_string(),
            arrival: "2024-05-01 11:30".to_string(),
            duration_minutes: Some(210.into()),
            price: price.map(Numeric::from),
        }
    }

    #[test]
    fn edges_listed_before_nodes_still_load() {
        let records = DatasetRecords {
            flights: vec![flight("ZAG", "OPO", Some(120.0))],
            airports: vec![
                AirportRecord {
                    code: "ZAG".into(),
                    city: "Zagreb".into(),
                    country: "Croatia".into(),
                },
                AirportRecord {
                    code: "OPO".into(),
                    city: "Porto".into(),
                    country: "Portugal".into(),
                },
            ],
            ..DatasetRecords::default()
        };

        let report = load_records(&records);
        assert!(report.is_clean(), "{:?}", report.rejected);
        assert_eq!(report.graph.flight_count(), 1);
    }

    #[test]
    fn bad_records_are_collected_not_fatal() {
        let records = DatasetRecords {
            airports: vec![
                AirportRecord {
                    code: "ZAG".into(),
                    city: "Zagreb".into(),
                    country: "Croatia".into(),
                },
                AirportRecord {
                    code: "ZAG".into(),
                    city: "Zagreb".into(),
                    country: "Croatia".into(),
                },
                AirportRecord {
                    code: " ".into(),
                    city: "Nowhere".into(),
                    country: String::new(),
                },
            ],
            flights: vec![
                flight("ZAG", "ZAG", None),
                flight("ZAG", "OPO", Some(10.0)),
                FlightRecord {
                    departure: "yesterday".into(),
                    ..flight("ZAG", "ZAG", Some(10.0))
                },
                flight("ZAG", "ZAG", Some(10.0)),
            ],
            ..DatasetRecords::default()
        };

        let report = load_records(&records);
        let kinds: Vec<(RecordKind, usize)> =
            report.rejected.iter().map(|r| (r.kind, r.index)).collect();
        assert_eq!(
            kinds,
            vec![
                (RecordKind::Airport, 1),
                (RecordKind::Airport, 2),
                (RecordKind::Flight, 0),
                (RecordKind::Flight, 1),
                (RecordKind::Flight, 2),
            ]
        );
        assert_eq!(report.graph.airport_count(), 1);
        assert_eq!(report.graph.flight_count(), 1);
    }

    #[test]
    fn non_numeric_fields_reject_only_their_record() {
        let json = r#"{
            "airports": [
                {"code": "ZAG", "city": "Zagreb", "country": "Croatia"},
                {"code": "OPO", "city": "Porto", "country": "Portugal"}
            ],
            "cities": [
                {"name": "Cakovec", "population": -3, "country": "Croatia"},
                {"name": "Varazdin", "population": 46946, "country": "Croatia"}
            ],
            "nearest_airports": [
                {"city": "Varazdin", "airport": "ZAG", "distance_km": "far"}
            ],
            "flights": [
                {"from": "ZAG", "to": "OPO", "carrier": "TAP",
                 "departure": "2024-05-01T08:00", "arrival": "2024-05-01T11:00",
                 "duration_minutes": 180, "price": "N/A"},
                {"from": "ZAG", "to": "OPO", "carrier": "TAP",
                 "departure": "2024-05-01T09:00", "arrival": "2024-05-01T12:00",
                 "duration_minutes": 180.5, "price": 99},
                {"from": "ZAG", "to": "OPO", "carrier": "TAP",
                 "departure": "2024-05-01T10:00", "arrival": "2024-05-01T13:00",
                 "duration_minutes": 180, "price": 99}
            ]
        }"#;
        let records: DatasetRecords = serde_json::from_str(json).expect("decodes");
        let report = load_records(&records);

        let kinds: Vec<(RecordKind, usize)> =
            report.rejected.iter().map(|r| (r.kind, r.index)).collect();
        assert_eq!(
            kinds,
            vec![
                (RecordKind::City, 0),
                (RecordKind::NearestAirport, 0),
                (RecordKind::Flight, 0),
                (RecordKind::Flight, 1),
            ]
        );
        assert!(report.rejected[2].reason.contains("price \"N/A\""));
        assert_eq!(report.graph.city_count(), 1);
        assert_eq!(report.graph.flight_count(), 1);
        assert_eq!(report.graph.flights()[0].price, 99.0);
    }

    #[test]
    fn timestamp_formats() {
        assert!(parse_timestamp("departure", "2024-05-01T08:00:00").is_ok());
        assert!(parse_timestamp("departure", "2024-05-01 08:00").is_ok());
        assert!(parse_timestamp("departure", "01.05.2024 08:00").is_err());
    }
}
