//! Typed errors for grid construction, classification, and queries.

use thiserror::Error;

/// Errors surfaced by grid construction and the query/terraform API.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Configuration rejected before any work was done.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A raw height value fell outside every terrain threshold.
    #[error("no terrain entry covers raw height {raw} at cell {designation}")]
    Classification {
        /// Cell designation that failed to classify.
        designation: String,
        /// Raw height value with no covering threshold.
        raw: f64,
    },

    /// A designation that names no cell in this grid.
    #[error("unknown cell designation: {0}")]
    UnknownCell(String),

    /// No traversable route exists between the requested endpoints.
    #[error("no path found from {from} to {to}")]
    NoPathFound {
        /// Start designation.
        from: String,
        /// Goal designation.
        to: String,
    },

    /// A procedural stage exhausted its retry budget.
    #[error("generation failed: {0}")]
    Generation(String),
}
