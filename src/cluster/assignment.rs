//! Nearest-member assignment of unseen records

use std::sync::Arc;

use crate::error::ClusterError;
use crate::metric::DistanceMetric;

/// Retained assignment index: the original records, the metric they were
/// clustered under, and the record → cluster membership table.
///
/// Only built for configurations whose semantics reduce to "nearest existing
/// member" (single, complete, and average linkage, and DIANA).
#[derive(Debug, Clone)]
pub struct ClusterAssigner {
    records: Vec<Vec<f64>>,
    metric: Arc<dyn DistanceMetric>,
    membership: Vec<usize>,
}

impl ClusterAssigner {
    pub(crate) fn new(
        records: Vec<Vec<f64>>,
        metric: Arc<dyn DistanceMetric>,
        membership: Vec<usize>,
    ) -> Self {
        debug_assert_eq!(records.len(), membership.len());
        Self {
            records,
            metric,
            membership,
        }
    }

    /// Cluster position of the single closest original record.
    ///
    /// Ties resolve to the lowest record index.
    pub fn assign(&self, record: &[f64]) -> Result<usize, ClusterError> {
        let arity = self.records[0].len();
        if record.len() != arity {
            return Err(ClusterError::InvalidInput(format!(
                "record has {} attributes, expected {}",
                record.len(),
                arity
            )));
        }
        if let Some(value) = record.iter().find(|v| !v.is_finite()) {
            return Err(ClusterError::InvalidInput(format!(
                "record contains a non-finite value ({})",
                value
            )));
        }

        let mut nearest = 0;
        let mut nearest_distance = f64::INFINITY;
        for (index, candidate) in self.records.iter().enumerate() {
            let distance = self.metric.distance(record, candidate);
            if distance < nearest_distance {
                nearest = index;
                nearest_distance = distance;
            }
        }
        Ok(self.membership[nearest])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::SquaredEuclidean;

    fn assigner() -> ClusterAssigner {
        ClusterAssigner::new(
            vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![10.0, 1.0]],
            Arc::new(SquaredEuclidean),
            vec![0, 1, 1],
        )
    }

    #[test]
    fn assigns_to_the_cluster_of_the_nearest_record() {
        assert_eq!(assigner().assign(&[1.0, 0.0]).unwrap(), 0);
        assert_eq!(assigner().assign(&[9.0, 0.5]).unwrap(), 1);
    }

    #[test]
    fn ties_resolve_to_the_lowest_record_index() {
        // Equidistant between records 0 and 1
        assert_eq!(assigner().assign(&[5.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let err = assigner().assign(&[1.0]).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput(_)));
    }

    #[test]
    fn non_finite_queries_are_rejected() {
        let err = assigner().assign(&[f64::NAN, 0.0]).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput(_)));
    }
}
