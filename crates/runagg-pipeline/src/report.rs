use std::fs;
use std::path::Path;

use runagg_core::errors::{AggError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::filter::SamplingPolicy;
use crate::writer::io_error;

/// Tallies of one aggregation run, persisted next to the tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub sampling: SamplingPolicy,
    pub discovered: usize,
    /// Replicates that produced a summary row.
    pub contributing: usize,
    pub summary_rows: usize,
    pub time_series_rows: usize,
    /// Sorted identifiers of replicates with missing inputs or unfinished runs.
    pub incomplete: Vec<String>,
    pub summary_header: Vec<String>,
    pub time_series_header: Vec<String>,
}

impl AggregateReport {
    pub fn write_json(&self, path: &Path) -> Result<(), AggError> {
        let bytes = serde_json::to_vec_pretty(self).map_err(|err| {
            AggError::Io(
                ErrorInfo::new("report.encode", "failed to encode aggregate report")
                    .with_hint(err.to_string()),
            )
        })?;
        fs::write(path, bytes).map_err(|err| io_error("report.write", path, err))
    }
}
