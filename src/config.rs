//! Configuration for one clustering run

use crate::cluster::linkage::Linkage;
use crate::error::ClusterError;

/// Options recognized by both clustering engines.
///
/// `num_clusters` and `distance_threshold` are mutually exclusive stopping
/// rules; the threshold is only honored by the agglomerative engine.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Inter-group distance policy
    pub linkage: Linkage,

    /// Name of the record-to-record metric
    pub metric: String,

    /// Stop once the partition reaches this many groups
    pub num_clusters: Option<usize>,

    /// Stop once the minimum inter-group distance exceeds this value
    /// (agglomerative only)
    pub distance_threshold: Option<f64>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            linkage: Linkage::Single,
            metric: "squared_euclidean".to_string(),
            num_clusters: Some(1),
            distance_threshold: None,
        }
    }
}

impl ClusterConfig {
    /// Configuration targeting a fixed cluster count
    pub fn with_clusters(linkage: Linkage, num_clusters: usize) -> Self {
        Self {
            linkage,
            num_clusters: Some(num_clusters),
            distance_threshold: None,
            ..Self::default()
        }
    }

    /// Configuration stopping at a distance threshold
    pub fn with_threshold(linkage: Linkage, distance_threshold: f64) -> Self {
        Self {
            linkage,
            num_clusters: None,
            distance_threshold: Some(distance_threshold),
            ..Self::default()
        }
    }

    /// Validate everything that does not depend on the input size.
    ///
    /// Fails with `InvalidConfiguration` before any distance is computed.
    pub fn validate(&self) -> Result<(), ClusterError> {
        if self.num_clusters.is_some() && self.distance_threshold.is_some() {
            return Err(ClusterError::InvalidConfiguration(
                "num_clusters and distance_threshold are mutually exclusive".to_string(),
            ));
        }
        if self.num_clusters == Some(0) {
            return Err(ClusterError::InvalidConfiguration(
                "cluster count must be at least 1".to_string(),
            ));
        }
        if let Some(threshold) = self.distance_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(ClusterError::InvalidConfiguration(format!(
                    "distance threshold must be finite and non-negative, got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_one_single_linkage_cluster() {
        let config = ClusterConfig::default();
        assert_eq!(config.linkage, Linkage::Single);
        assert_eq!(config.metric, "squared_euclidean");
        assert_eq!(config.num_clusters, Some(1));
        assert_eq!(config.distance_threshold, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn combined_stopping_rules_are_rejected() {
        let config = ClusterConfig {
            num_clusters: Some(3),
            distance_threshold: Some(10.0),
            ..ClusterConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ClusterError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn zero_clusters_are_rejected() {
        let config = ClusterConfig::with_clusters(Linkage::Average, 0);
        assert!(matches!(
            config.validate(),
            Err(ClusterError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let config = ClusterConfig::with_threshold(Linkage::Single, -1.0);
        assert!(matches!(
            config.validate(),
            Err(ClusterError::InvalidConfiguration(_))
        ));
    }
}
