//! Standardized metrics collection for headless generation runs.
//!
//! Defines a small metrics schema exported as JSON by tests and benches so
//! regressions in generation output can be tracked across runs.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Top-level metrics report for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Test/benchmark identifier.
    pub test_name: String,

    /// Timestamp when metrics were collected (ISO 8601).
    pub timestamp: String,

    /// Overall run result.
    pub result: RunResult,

    /// Grid construction metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationMetrics>,

    /// Pathfinding metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pathfinding: Option<PathMetrics>,

    /// Snapshot persistence metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence: Option<PersistenceMetrics>,

    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

impl MetricsReport {
    /// Start a report for `test_name` with the current timestamp.
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            result: RunResult::Pass,
            generation: None,
            pathfinding: None,
            persistence: None,
            duration_ms: 0,
        }
    }

    /// Persist the report as pretty JSON, creating parent directories.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

/// Overall run result status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunResult {
    /// Run passed all validations.
    Pass,
    /// Run failed.
    Fail,
}

/// Metrics describing one constructed grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetrics {
    /// Total cell count.
    pub cells: usize,
    /// Passable cell count.
    pub passable_cells: usize,
    /// Discovered landmasses and islands.
    pub landmasses: usize,
    /// Kept bodies of water.
    pub bodies_of_water: usize,
    /// Rivers carved.
    pub rivers: usize,
}

/// Metrics describing one pathfinding query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathMetrics {
    /// Path length in cells.
    pub path_len: usize,
    /// Total traversal cost.
    pub cost: f64,
}

/// Metrics describing one snapshot round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceMetrics {
    /// Uncompressed payload size in bytes.
    pub raw_bytes: usize,
    /// On-disk snapshot size in bytes.
    pub file_bytes: usize,
}
