//! Output formatting for route and resolution results.
//!
//! Text and rich formats reuse the library's [`RouteSummary::render`]; JSON
//! serialises the summary as-is so scripts see the same fields.

use std::fmt::Write as _;
use std::io::{self, Write};

use clap::ValueEnum;
use skyroute_lib::{FlightGraph, ResolvedPlace, RouteRenderMode, RouteSummary};

use crate::terminal::{format_with_separators, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one line per flight.
    #[default]
    Text,
    /// Markdown-flavoured text.
    Rich,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Format a route summary.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialisation fails.
    pub fn format_route(self, summary: &RouteSummary) -> serde_json::Result<String> {
        match self {
            OutputFormat::Text => Ok(summary.render(RouteRenderMode::PlainText)),
            OutputFormat::Rich => Ok(summary.render(RouteRenderMode::RichText)),
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(summary)?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    /// Format a resolved place. Text and rich formats look up airport and city
    /// details in `graph`; only plain text is coloured by `palette`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialisation fails.
    pub fn format_resolved(
        self,
        graph: &FlightGraph,
        resolved: &ResolvedPlace,
        palette: ColorPalette,
    ) -> serde_json::Result<String> {
        match self {
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(resolved)?;
                json.push('\n');
                Ok(json)
            }
            OutputFormat::Text => Ok(render_resolved_text(graph, resolved, palette)),
            OutputFormat::Rich => Ok(render_resolved_rich(graph, resolved)),
        }
    }
}

fn render_resolved_text(
    graph: &FlightGraph,
    resolved: &ResolvedPlace,
    palette: ColorPalette,
) -> String {
    let p = palette;
    let mut buffer = String::new();

    let population = resolved
        .via
        .as_ref()
        .and_then(|edge| graph.city(&edge.city))
        .map(|city| format!(" (population {})", format_with_separators(city.population)))
        .unwrap_or_default();
    let _ = writeln!(
        buffer,
        "{}{}{}{} resolves to:",
        p.white_bold, resolved.query, p.reset, population
    );

    for code in &resolved.airports {
        match graph.airport(code) {
            Some(airport) => {
                let _ = writeln!(
                    buffer,
                    " - {}{}{} {}({}, {}){}",
                    p.white_bold,
                    airport.code,
                    p.reset,
                    p.gray,
                    airport.city,
                    airport.country,
                    p.reset
                );
            }
            None => {
                let _ = writeln!(buffer, " - {}{}{}", p.white_bold, code, p.reset);
            }
        }
    }

    if let Some(edge) = &resolved.via {
        let _ = writeln!(
            buffer,
            "{}via nearest airport {}, {:.0} km away{}",
            p.cyan, edge.airport, edge.distance_km, p.reset
        );
    }
    buffer
}

fn render_resolved_rich(graph: &FlightGraph, resolved: &ResolvedPlace) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "**{}** resolves to {} airport(s):",
        resolved.query,
        resolved.airports.len()
    );
    for code in &resolved.airports {
        match graph.airport(code) {
            Some(airport) => {
                let _ = writeln!(
                    buffer,
                    "* `{}` _{}, {}_",
                    airport.code, airport.city, airport.country
                );
            }
            None => {
                let _ = writeln!(buffer, "* `{code}`");
            }
        }
    }
    if let Some(edge) = &resolved.via {
        let population = graph
            .city(&edge.city)
            .map(|city| format!(", population {}", format_with_separators(city.population)))
            .unwrap_or_default();
        let _ = writeln!(
            buffer,
            "_Nearest airport of {}{}: `{}`, {:.0} km_",
            edge.city, population, edge.airport, edge.distance_km
        );
    }
    buffer
}

/// Write already-formatted output to stdout.
pub fn write_stdout(rendered: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyroute_lib::resolve_place;

    fn graph() -> FlightGraph {
        let mut graph = FlightGraph::new();
        graph.add_airport("VZN", "Varazdin", "Croatia").unwrap();
        graph.add_city("Cakovec", 27_104, "Croatia").unwrap();
        graph.add_nearest_airport("Cakovec", "VZN", 200.0).unwrap();
        graph
    }

    #[test]
    fn text_resolution_mentions_nearest_airport() {
        let graph = graph();
        let resolved = resolve_place(&graph, "Cakovec").unwrap();
        let text = OutputFormat::Text
            .format_resolved(&graph, &resolved, ColorPalette::plain())
            .unwrap();
        assert!(text.starts_with("Cakovec (population 27,104) resolves to:"));
        assert!(text.contains(" - VZN (Varazdin, Croatia)"));
        assert!(text.contains("via nearest airport VZN, 200 km away"));
    }

    #[test]
    fn rich_resolution_is_markdown() {
        let graph = graph();
        let resolved = resolve_place(&graph, "Cakovec").unwrap();
        let rich = OutputFormat::Rich
            .format_resolved(&graph, &resolved, ColorPalette::colored())
            .unwrap();
        assert!(rich.starts_with("**Cakovec** resolves to 1 airport(s):"));
        assert!(rich.contains("* `VZN` _Varazdin, Croatia_"));
        assert!(rich.contains("_Nearest airport of Cakovec, population 27,104: `VZN`, 200 km_"));
        assert!(!rich.contains('\u{1b}'));

        let text = OutputFormat::Text
            .format_resolved(&graph, &resolved, ColorPalette::plain())
            .unwrap();
        assert_ne!(rich, text);
    }

    #[test]
    fn json_resolution_is_parseable() {
        let graph = graph();
        let resolved = resolve_place(&graph, "VZN").unwrap();
        let json = OutputFormat::Json
            .format_resolved(&graph, &resolved, ColorPalette::plain())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["airports"][0], "VZN");
        assert!(value.get("via").is_none());
    }
}
