use std::fmt;

use serde::Serialize;

use crate::store::Flight;

/// Cost contributed by a single flight to the accumulated path weight.
///
/// Weights must be non-negative and finite; the engine treats any other value
/// as an inadmissible edge.
pub trait EdgeWeight {
    fn weight(&self, flight: &Flight) -> f64;
}

impl<F> EdgeWeight for F
where
    F: Fn(&Flight) -> f64,
{
    fn weight(&self, flight: &Flight) -> f64 {
        self(flight)
    }
}

/// Built-in weight accumulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Weight {
    /// Ticket price in currency units.
    Price,
    /// Scheduled flight time in minutes. Layovers are not counted.
    Duration,
}

impl EdgeWeight for Weight {
    fn weight(&self, flight: &Flight) -> f64 {
        match self {
            Weight::Price => flight.price,
            Weight::Duration => f64::from(flight.duration_minutes),
        }
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Weight::Price => "price",
            Weight::Duration => "duration",
        })
    }
}
