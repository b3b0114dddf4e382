use chrono::Days;

use crate::store::Flight;

/// Read-only view of the partial path a candidate flight would extend.
///
/// Only the first and last flights are visible. The engine compresses its
/// search state to exactly this pair, so a predicate that looked further into
/// the path interior would not be honoured.
#[derive(Debug, Clone, Copy)]
pub struct PathView<'a> {
    first: Option<&'a Flight>,
    last: Option<&'a Flight>,
}

impl<'a> PathView<'a> {
    pub fn empty() -> Self {
        Self {
            first: None,
            last: None,
        }
    }

    pub fn new(first: &'a Flight, last: &'a Flight) -> Self {
        Self {
            first: Some(first),
            last: Some(last),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    pub fn first(&self) -> Option<&'a Flight> {
        self.first
    }

    pub fn last(&self) -> Option<&'a Flight> {
        self.last
    }
}

/// Decides whether `next` may extend `path`.
pub trait Admissibility {
    fn admits(&self, path: PathView<'_>, next: &Flight) -> bool;
}

impl<F> Admissibility for F
where
    F: Fn(PathView<'_>, &Flight) -> bool,
{
    fn admits(&self, path: PathView<'_>, next: &Flight) -> bool {
        self(path, next)
    }
}

/// Only single-flight paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectOnly;

impl Admissibility for DirectOnly {
    fn admits(&self, path: PathView<'_>, _next: &Flight) -> bool {
        path.is_empty()
    }
}

/// Connected itineraries whose span is capped in calendar days.
///
/// A connection must depart strictly after the previous flight arrives, and
/// on a calendar date earlier than the first flight's arrival date plus
/// `max_days`. Dates are real calendar dates, so the cap behaves across month
/// and year boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectedWithin {
    pub max_days: u32,
}

impl ConnectedWithin {
    pub fn days(max_days: u32) -> Self {
        Self { max_days }
    }
}

impl Admissibility for ConnectedWithin {
    fn admits(&self, path: PathView<'_>, next: &Flight) -> bool {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return true;
        };

        if last.arrival >= next.departure {
            return false;
        }

        match first
            .arrival
            .date()
            .checked_add_days(Days::new(u64::from(self.max_days)))
        {
            Some(limit) => limit > next.departure.date(),
            // Past the end of the calendar: nothing can depart later.
            None => true,
        }
    }
}
