//! Merge history recorded by the agglomerative engine

use serde::{Deserialize, Serialize};

use crate::cluster::partition::merge_sorted;
use crate::error::ClusterError;

/// One recorded merge: the partition positions joined and the inter-group
/// distance at which they were joined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeStep {
    /// Position of the left group at merge time (kept by the merged group)
    pub left: usize,

    /// Position of the right group at merge time (removed by the merge)
    pub right: usize,

    /// Inter-group distance of the merged pair
    pub distance: f64,

    /// Member count of the merged group
    pub size: usize,
}

/// The ordered merge sequence of one agglomerative run.
///
/// The height sequence is the implicit dendrogram; replaying a prefix of the
/// recorded merges re-cuts the tree at any coarser level without re-running
/// clustering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dendrogram {
    /// Number of original records
    record_count: usize,

    /// Merges from first to last
    steps: Vec<MergeStep>,
}

impl Dendrogram {
    pub fn new(record_count: usize, steps: Vec<MergeStep>) -> Self {
        Self {
            record_count,
            steps,
        }
    }

    /// Number of original records
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// The recorded merges in order
    pub fn steps(&self) -> &[MergeStep] {
        &self.steps
    }

    /// Ordered sequence of merge distances (the dendrogram heights)
    pub fn heights(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.distance).collect()
    }

    /// Distance of the final merge, if any merge happened
    pub fn final_distance(&self) -> Option<f64> {
        self.steps.last().map(|s| s.distance)
    }

    /// Re-cut the tree into `clusters` groups by replaying the recorded
    /// merges from singletons.
    ///
    /// Fails with `InvalidConfiguration` when the requested count is outside
    /// [1, n] or the recorded history stopped before reaching it (a
    /// threshold-stopped run does not record the full tree).
    pub fn cut(&self, clusters: usize) -> Result<Vec<Vec<usize>>, ClusterError> {
        if clusters < 1 || clusters > self.record_count {
            return Err(ClusterError::InvalidConfiguration(format!(
                "cluster count {} is outside [1, {}]",
                clusters, self.record_count
            )));
        }
        let merges = self.record_count - clusters;
        if merges > self.steps.len() {
            return Err(ClusterError::InvalidConfiguration(format!(
                "merge history stops at {} clusters, cannot cut to {}",
                self.record_count - self.steps.len(),
                clusters
            )));
        }

        // Same bookkeeping as the live partition: the merged group takes the
        // left position, the right position is removed.
        let mut groups: Vec<Vec<usize>> = (0..self.record_count).map(|i| vec![i]).collect();
        for step in &self.steps[..merges] {
            groups[step.left] = merge_sorted(&groups[step.left], &groups[step.right]);
            groups.remove(step.right);
        }
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dendrogram {
        // 4 records: merge (0,1) at 1.0 -> {0,1}, then (1,2) at 2.0 which
        // joins the groups holding records 2 and 3.
        Dendrogram::new(
            4,
            vec![
                MergeStep {
                    left: 0,
                    right: 1,
                    distance: 1.0,
                    size: 2,
                },
                MergeStep {
                    left: 1,
                    right: 2,
                    distance: 2.0,
                    size: 2,
                },
                MergeStep {
                    left: 0,
                    right: 1,
                    distance: 5.0,
                    size: 4,
                },
            ],
        )
    }

    #[test]
    fn heights_are_the_ordered_merge_distances() {
        assert_eq!(sample().heights(), vec![1.0, 2.0, 5.0]);
        assert_eq!(sample().final_distance(), Some(5.0));
    }

    #[test]
    fn cut_replays_the_recorded_merges() {
        let dendrogram = sample();
        assert_eq!(
            dendrogram.cut(4).unwrap(),
            vec![vec![0], vec![1], vec![2], vec![3]]
        );
        assert_eq!(
            dendrogram.cut(3).unwrap(),
            vec![vec![0, 1], vec![2], vec![3]]
        );
        assert_eq!(dendrogram.cut(2).unwrap(), vec![vec![0, 1], vec![2, 3]]);
        assert_eq!(dendrogram.cut(1).unwrap(), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn cut_rejects_counts_outside_the_valid_range() {
        let dendrogram = sample();
        assert!(matches!(
            dendrogram.cut(0),
            Err(ClusterError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            dendrogram.cut(5),
            Err(ClusterError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn cut_rejects_counts_below_a_truncated_history() {
        // A threshold-stopped run that only recorded one merge
        let dendrogram = Dendrogram::new(
            4,
            vec![MergeStep {
                left: 0,
                right: 1,
                distance: 1.0,
                size: 2,
            }],
        );
        assert!(dendrogram.cut(3).is_ok());
        assert!(matches!(
            dendrogram.cut(2),
            Err(ClusterError::InvalidConfiguration(_))
        ));
    }
}
