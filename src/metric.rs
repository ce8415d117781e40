//! Pairwise distance functions over numeric records

use std::fmt;

use crate::error::ClusterError;

/// Distance function over two equal-length numeric vectors.
///
/// Implementations must be symmetric and return 0 for identical inputs; the
/// triangle inequality is not required. The default squared Euclidean metric
/// skips the square root, since linkage comparisons only need the relative
/// ordering of distances.
pub trait DistanceMetric: fmt::Debug + Send + Sync {
    /// Distance between two records of equal attribute count
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;

    /// Name under which the metric is recognized in configuration
    fn name(&self) -> &'static str;
}

/// Sum of squared component differences (no square root)
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

impl DistanceMetric for SquaredEuclidean {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum()
    }

    fn name(&self) -> &'static str {
        "squared_euclidean"
    }
}

/// Straight-line distance (square root of the default metric)
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        SquaredEuclidean.distance(a, b).sqrt()
    }

    fn name(&self) -> &'static str {
        "euclidean"
    }
}

/// Sum of absolute component differences
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl DistanceMetric for Manhattan {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
    }

    fn name(&self) -> &'static str {
        "manhattan"
    }
}

/// Resolve a metric by its configured name.
///
/// Unrecognized names fail with `InvalidConfiguration` before any distance
/// computation happens.
pub fn parse_metric(name: &str) -> Result<std::sync::Arc<dyn DistanceMetric>, ClusterError> {
    match name {
        "squared_euclidean" => Ok(std::sync::Arc::new(SquaredEuclidean)),
        "euclidean" => Ok(std::sync::Arc::new(Euclidean)),
        "manhattan" => Ok(std::sync::Arc::new(Manhattan)),
        other => Err(ClusterError::InvalidConfiguration(format!(
            "unrecognized metric name: {}",
            other
        ))),
    }
}
