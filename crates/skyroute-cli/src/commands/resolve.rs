//! Resolve command handler: show which airport(s) a place name maps to.

use std::path::Path;

use anyhow::{Context, Result};

use skyroute_lib::resolve_place;

use crate::commands::load_graph;
use skyroute_cli::output::{write_stdout, OutputFormat};
use skyroute_cli::terminal::ColorPalette;

pub fn handle_resolve_command(
    target_path: Option<&Path>,
    format: OutputFormat,
    place: &str,
) -> Result<()> {
    let graph = load_graph(target_path)?;
    let resolved = resolve_place(&graph, place)?;
    let rendered = format
        .format_resolved(&graph, &resolved, ColorPalette::detect())
        .context("failed to serialise resolution")?;
    write_stdout(&rendered).context("failed to write output")
}
