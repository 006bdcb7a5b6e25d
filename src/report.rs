use chrono::Local;
use log::info;
use serde::{Deserialize, Serialize};

use std::fs;

use crate::error::Result;
use crate::types::LinkResult;

/// Aggregated outcome of one run, serialized to `result.json`.
///
/// `accessible_count + inaccessible_count == total_count` always holds:
/// the counts are derived by a single scan over the completed result
/// collection after the fan-in barrier, never incremented from concurrent
/// resolution bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub timestamp: String,
    pub accessible_count: usize,
    pub inaccessible_count: usize,
    pub total_count: usize,
    pub link_status: Vec<LinkResult>,
}

impl RunSummary {
    /// Build the summary from the ordered result collection, stamped with
    /// the current local time.
    pub fn from_results(results: Vec<LinkResult>) -> Self {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self::with_timestamp(results, timestamp)
    }

    pub fn with_timestamp(results: Vec<LinkResult>, timestamp: String) -> Self {
        let accessible_count = results.iter().filter(|r| r.is_accessible()).count();

        Self {
            timestamp,
            accessible_count,
            inaccessible_count: results.len() - accessible_count,
            total_count: results.len(),
            link_status: results,
        }
    }
}

/// Fully overwrite `path` with the indented JSON report. Non-ASCII
/// characters are written literally, not escaped.
pub fn write_report(summary: &RunSummary, path: &str) -> Result<()> {
    let body = serde_json::to_string_pretty(summary)?;
    fs::write(path, body)?;

    info!(
        "report written to {path}: {}/{} accessible",
        summary.accessible_count, summary.total_count
    );
    Ok(())
}
