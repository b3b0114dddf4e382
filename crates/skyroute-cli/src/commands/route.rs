//! Route command handler for the `direct`, `cheapest` and `fastest` subcommands.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use skyroute_lib::{
    plan_route, Error as RouteError, RouteQuery, RouteRequest, RouteSummary, SearchLimits,
};

use crate::commands::load_graph;
use skyroute_cli::output::{write_stdout, OutputFormat};

/// Arguments for a route query.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Departure place name or airport code.
    pub from: String,
    /// Destination place name or airport code.
    pub to: String,
    pub query: RouteQuery,
    /// Calendar-day cap for connecting itineraries.
    pub max_days: u32,
    /// Maximum number of flights.
    pub max_hops: Option<usize>,
    /// Abort the search after this many milliseconds.
    pub timeout_ms: Option<u64>,
}

impl RouteCommandArgs {
    /// Convert CLI args to a library [`RouteRequest`].
    ///
    /// The timeout clock starts here, so call this right before planning.
    pub fn to_request(&self) -> RouteRequest {
        let request = match self.query {
            RouteQuery::CheapestDirect => RouteRequest::cheapest_direct(&self.from, &self.to),
            RouteQuery::Cheapest => RouteRequest::cheapest(&self.from, &self.to, self.max_days),
            RouteQuery::Fastest => RouteRequest::fastest(&self.from, &self.to, self.max_days),
        };

        let mut limits = SearchLimits::default();
        if let Some(max_hops) = self.max_hops {
            limits = limits.with_max_hops(max_hops);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            limits = limits.with_deadline(Instant::now() + Duration::from_millis(timeout_ms));
        }
        request.with_limits(limits)
    }
}

/// Handle a route subcommand.
pub fn handle_route_command(
    target_path: Option<&Path>,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let graph = load_graph(target_path)?;

    let request = args.to_request();
    let itinerary = match plan_route(&graph, &request) {
        Ok(itinerary) => itinerary,
        Err(err) => return Err(handle_route_failure(args, err)),
    };

    let summary = RouteSummary::from_itinerary(&itinerary)
        .context("failed to build route summary for display")?;
    let rendered = format
        .format_route(&summary)
        .context("failed to serialise route summary")?;
    write_stdout(&rendered).context("failed to write output")
}

fn handle_route_failure(args: &RouteCommandArgs, err: RouteError) -> anyhow::Error {
    match err {
        RouteError::UnknownPlace { name, suggestions } => {
            anyhow::anyhow!(format_unknown_place_message(&name, &suggestions))
        }
        RouteError::NotFound { from, to } => {
            anyhow::anyhow!(format_route_not_found_message(&from, &to, args))
        }
        RouteError::Cancelled { from, to } => anyhow::anyhow!(
            "Route search between {} and {} was cancelled after {} ms. Try raising --timeout-ms.",
            from,
            to,
            args.timeout_ms.unwrap_or_default()
        ),
        other => anyhow::Error::new(other),
    }
}

fn format_unknown_place_message(name: &str, suggestions: &[String]) -> String {
    let mut message = format!("Unknown place '{}'.", name);
    match suggestions {
        [] => {}
        [only] => message.push_str(&format!(" Did you mean '{only}'?")),
        many => {
            let joined = many
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str(&format!(" Did you mean one of: {}?", joined));
        }
    }
    message
}

fn format_route_not_found_message(from: &str, to: &str, args: &RouteCommandArgs) -> String {
    let mut message = format!("No route found between {} and {}.", from, to);
    let mut tips = Vec::new();
    if args.query == RouteQuery::CheapestDirect {
        tips.push("use `cheapest` or `fastest` to allow connections".to_string());
    } else {
        tips.push(format!("increase --max-days (currently {})", args.max_days));
        if args.max_hops.is_some() {
            tips.push("raise or omit --max-hops".to_string());
        }
    }
    message.push(' ');
    message.push_str(&format!("Try {}.", tips.join(", ")));
    message
}
