use std::fmt::Write;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::resolver::ResolvedPlace;
use crate::routing::{Itinerary, RouteQuery};

/// Timestamp layout used in textual renderings.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
}

/// How a requested place mapped onto an airport.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteEndpoint {
    /// Place name as requested.
    pub place: String,
    pub airport: String,
    /// Distance from the requested city to `airport` when a nearest-airport
    /// relation was followed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearest_airport_km: Option<f64>,
}

impl RouteEndpoint {
    fn new(place: &ResolvedPlace, airport: &str) -> Self {
        Self {
            place: place.query.clone(),
            airport: airport.to_string(),
            nearest_airport_km: place.via.as_ref().map(|edge| edge.distance_km),
        }
    }

    fn display_name(&self) -> String {
        match self.nearest_airport_km {
            Some(km) => format!("{} (via {}, {:.0} km)", self.place, self.airport, km),
            None if self.place.eq_ignore_ascii_case(&self.airport) => self.airport.clone(),
            None => format!("{} ({})", self.place, self.airport),
        }
    }
}

/// One flight within a rendered itinerary.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteLeg {
    pub index: usize,
    pub from: String,
    pub to: String,
    pub carrier: String,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub duration_minutes: u32,
    pub price: f64,
}

/// Structured representation of an itinerary that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub query: RouteQuery,
    pub hops: usize,
    pub departure: RouteEndpoint,
    pub destination: RouteEndpoint,
    pub legs: Vec<RouteLeg>,
    pub total_price: f64,
    pub total_duration_minutes: u64,
    /// Calendar days between the first departure and the last arrival.
    pub trip_days: i64,
}

impl RouteSummary {
    /// Convert an [`Itinerary`] into a flat summary.
    pub fn from_itinerary(itinerary: &Itinerary) -> Result<Self> {
        let (Some(first), Some(last)) = (itinerary.flights.first(), itinerary.flights.last()) else {
            return Err(Error::NotFound {
                from: itinerary.departure.query.clone(),
                to: itinerary.destination.query.clone(),
            });
        };

        let legs = itinerary
            .flights
            .iter()
            .enumerate()
            .map(|(index, flight)| RouteLeg {
                index: index + 1,
                from: flight.from.clone(),
                to: flight.to.clone(),
                carrier: flight.carrier.clone(),
                departure: flight.departure,
                arrival: flight.arrival,
                duration_minutes: flight.duration_minutes,
                price: flight.price,
            })
            .collect::<Vec<_>>();

        Ok(Self {
            query: itinerary.query,
            hops: itinerary.hops(),
            departure: RouteEndpoint::new(&itinerary.departure, &first.from),
            destination: RouteEndpoint::new(&itinerary.destination, &last.to),
            legs,
            total_price: itinerary.total_price,
            total_duration_minutes: itinerary.total_duration_minutes,
            trip_days: (last.arrival.date() - first.departure.date()).num_days(),
        })
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route from {} to {} ({} flights; query: {}):",
            self.departure.display_name(),
            self.destination.display_name(),
            self.hops,
            self.query
        );
        for leg in &self.legs {
            let _ = writeln!(
                buffer,
                "{:>3}: {} -> {} {} dep {} arr {} ({} min, {:.2})",
                leg.index,
                leg.from,
                leg.to,
                leg.carrier,
                leg.departure.format(TIME_FORMAT),
                leg.arrival.format(TIME_FORMAT),
                leg.duration_minutes,
                leg.price
            );
        }
        let _ = writeln!(buffer, "Total price: {:.2}", self.total_price);
        let _ = writeln!(
            buffer,
            "Total flight time: {}",
            format_minutes(self.total_duration_minutes)
        );
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Route** _{} → {}_ ({} flights, query: `{}`)",
            self.departure.display_name(),
            self.destination.display_name(),
            self.hops,
            self.query
        );
        for leg in &self.legs {
            let _ = writeln!(
                buffer,
                "* {:>2}. **{} → {}** `{}` {} → {} · {:.2}",
                leg.index,
                leg.from,
                leg.to,
                leg.carrier,
                leg.departure.format(TIME_FORMAT),
                leg.arrival.format(TIME_FORMAT),
                leg.price
            );
        }
        let _ = writeln!(
            buffer,
            "_Total: {:.2}, {} in the air_",
            self.total_price,
            format_minutes(self.total_duration_minutes)
        );
        buffer
    }
}

/// Format a minute count as `5h 05m`.
pub fn format_minutes(minutes: u64) -> String {
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}
