//! Error taxonomy for the clustering engines

use thiserror::Error;

/// Errors surfaced by dataset construction, configuration, and clustering.
///
/// All variants are synchronous and local; a failed run never exposes a
/// partial partition.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Malformed records: empty collection, ragged rows, or non-finite values
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Rejected configuration: bad cluster count, conflicting stopping rules,
    /// or an unrecognized linkage/metric name
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Operation not available for the configured linkage
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}
