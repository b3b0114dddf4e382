use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::loader::{load_records, DatasetRecords, LoadReport};

/// Default filename for the dataset snapshot.
const DATASET_FILENAME: &str = "flights.json";

/// Environment variable that overrides the dataset location.
pub const DATASET_ENV_VAR: &str = "SKYROUTE_DATASET";

/// Resolve the default dataset location using platform-specific project directories.
pub fn default_dataset_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "skyroute", "skyroute").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATASET_FILENAME))
}

/// Pick the dataset path: explicit argument, then `SKYROUTE_DATASET`, then the
/// platform data directory. A directory argument is joined with the default
/// filename.
pub fn resolve_dataset_path(explicit: Option<&Path>) -> Result<PathBuf> {
    let candidate = match explicit {
        Some(path) => path.to_path_buf(),
        None => match env::var_os(DATASET_ENV_VAR) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => default_dataset_path()?,
        },
    };

    let path = if candidate.is_dir() {
        candidate.join(DATASET_FILENAME)
    } else {
        candidate
    };

    if !path.is_file() {
        return Err(Error::DatasetNotFound { path });
    }
    debug!(path = %path.display(), "resolved dataset path");
    Ok(path)
}

impl DatasetRecords {
    /// Decode a JSON snapshot from a file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Decode a JSON snapshot from a reader (file or in-memory buffer).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Read and load the dataset at `path` into a fresh graph.
pub fn load_dataset(path: &Path) -> Result<LoadReport> {
    let records = DatasetRecords::from_path(path)?;
    let report = load_records(&records);
    info!(
        path = %path.display(),
        airports = report.graph.airport_count(),
        flights = report.graph.flight_count(),
        rejected = report.rejected.len(),
        "dataset loaded"
    );
    Ok(report)
}
