//! Agglomerative (bottom-up) clustering engine

use std::sync::Arc;

use itertools::Itertools;

use crate::cluster::assignment::ClusterAssigner;
use crate::cluster::dendrogram::{Dendrogram, MergeStep};
use crate::cluster::linkage::Linkage;
use crate::cluster::matrix::DistanceMatrix;
use crate::cluster::partition::{Group, Partition};
use crate::cluster::ClusterResult;
use crate::config::ClusterConfig;
use crate::data::Dataset;
use crate::error::ClusterError;
use crate::metric::{parse_metric, DistanceMetric};

/// Merges the closest pair of groups until the target cluster count is
/// reached, or until no pair lies within the distance threshold.
///
/// Each step scans all group pairs under the configured linkage; there is no
/// nearest-neighbor-chain or priority-queue shortcut, so a full run is O(n³)
/// in the worst case. All per-run state is local to one `cluster` call.
#[derive(Debug)]
pub struct AgglomerativeEngine {
    linkage: Linkage,
    metric: Arc<dyn DistanceMetric>,
    num_clusters: Option<usize>,
    distance_threshold: Option<f64>,
}

impl AgglomerativeEngine {
    /// Build an engine from a validated configuration.
    ///
    /// Fails with `InvalidConfiguration` on conflicting stopping rules or an
    /// unrecognized metric name, before any distance computation.
    pub fn new(config: &ClusterConfig) -> Result<Self, ClusterError> {
        config.validate()?;
        let metric = parse_metric(&config.metric)?;
        Ok(Self {
            linkage: config.linkage,
            metric,
            num_clusters: config.num_clusters,
            distance_threshold: config.distance_threshold,
        })
    }

    /// Cluster the dataset down to the configured stopping point
    pub fn cluster(&self, dataset: &Dataset) -> Result<ClusterResult, ClusterError> {
        let n = dataset.len();
        if n == 0 {
            return Err(ClusterError::InvalidInput(
                "record collection is empty".to_string(),
            ));
        }
        if let Some(clusters) = self.num_clusters {
            if clusters > n {
                return Err(ClusterError::InvalidConfiguration(format!(
                    "cluster count {} exceeds record count {}",
                    clusters, n
                )));
            }
        }

        // With a threshold rule the merge loop runs until nothing is close
        // enough, bottoming out at a single group.
        let target = self.num_clusters.unwrap_or(1);

        let matrix = DistanceMatrix::build(&dataset.records, self.metric.as_ref())?;
        let groups = dataset
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                Group::singleton(index, self.linkage.singleton_aggregate(record))
            })
            .collect();
        let mut partition = Partition::singletons(groups);
        let mut steps = Vec::with_capacity(n.saturating_sub(target));

        log::info!(
            "Agglomerative clustering of {} records with {} linkage",
            n,
            self.linkage
        );

        while partition.len() > target {
            let (left, right, distance) = self.closest_pair(&partition, &matrix);
            if let Some(threshold) = self.distance_threshold {
                if distance > threshold {
                    log::debug!(
                        "Minimum pair distance {} exceeds threshold {}, stopping",
                        distance,
                        threshold
                    );
                    break;
                }
            }
            partition.merge_pair(left, right);
            let size = partition.groups()[left].len();
            log::debug!(
                "Merged groups {} and {} at distance {} ({} members)",
                left,
                right,
                distance,
                size
            );
            steps.push(MergeStep {
                left,
                right,
                distance,
                size,
            });
        }

        log::info!(
            "Finished with {} clusters after {} merges",
            partition.len(),
            steps.len()
        );

        let membership = partition.membership(n);
        let assigner = self.linkage.supports_assignment().then(|| {
            ClusterAssigner::new(dataset.records.clone(), self.metric.clone(), membership)
        });
        Ok(ClusterResult::from_merges(
            partition.into_index_groups(),
            Dendrogram::new(n, steps),
            assigner,
        ))
    }

    /// Positions and distance of the closest group pair.
    ///
    /// Pairs are scanned in ascending lexicographic order with a strict
    /// comparison, so equal minima resolve to the smallest pair of
    /// positions. Only called with at least two groups present.
    fn closest_pair(&self, partition: &Partition, matrix: &DistanceMatrix) -> (usize, usize, f64) {
        let groups = partition.groups();
        let mut best = (0, 1, f64::INFINITY);
        for (i, j) in (0..groups.len()).tuple_combinations() {
            let distance = self.linkage.inter_group_distance(
                &groups[i],
                &groups[j],
                matrix,
                self.metric.as_ref(),
            );
            if distance < best.2 {
                best = (i, j, distance);
            }
        }
        best
    }
}
