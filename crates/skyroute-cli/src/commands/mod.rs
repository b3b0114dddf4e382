// Module exports for CLI subcommands.
//
// Each module handles one subcommand; main.rs only parses arguments and
// dispatches here.

pub mod resolve;
pub mod route;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use skyroute_lib::{load_dataset, resolve_dataset_path, FlightGraph};

/// Locate and load the dataset, reporting rejected records.
pub fn load_graph(target: Option<&Path>) -> Result<FlightGraph> {
    let path = resolve_dataset_path(target).context("failed to locate the flight dataset")?;
    let report = load_dataset(&path)
        .with_context(|| format!("failed to load dataset from {}", path.display()))?;
    if !report.is_clean() {
        warn!(
            rejected = report.rejected.len(),
            path = %path.display(),
            "dataset contains rejected records"
        );
    }
    Ok(report.graph)
}
