//! Divisive (top-down) clustering engine, DIANA-style

use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::cluster::assignment::ClusterAssigner;
use crate::cluster::matrix::DistanceMatrix;
use crate::cluster::partition::{Group, Partition};
use crate::cluster::ClusterResult;
use crate::config::ClusterConfig;
use crate::data::Dataset;
use crate::error::ClusterError;
use crate::metric::{parse_metric, DistanceMetric};

/// One recorded split: which group position was divided and at what
/// diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitStep {
    /// Partition position of the group that was split
    pub group: usize,

    /// Diameter of that group before the split
    pub diameter: f64,

    /// Member count of the remainder (keeps the original position)
    pub remainder_size: usize,

    /// Member count of the splinter (appended at the end)
    pub splinter_size: usize,
}

/// Splits the widest group via a splinter-seed heuristic until the target
/// cluster count is reached.
///
/// Each step picks the group with the largest diameter, seeds a splinter
/// with its most-isolated member, and grows the splinter with every member
/// on average closer to it than to the group it is leaving.
#[derive(Debug)]
pub struct DivisiveEngine {
    metric: Arc<dyn DistanceMetric>,
    num_clusters: usize,
}

impl DivisiveEngine {
    /// Build an engine from a validated configuration.
    ///
    /// A distance threshold is an agglomerative-only stopping rule and is
    /// rejected here with `InvalidConfiguration`.
    pub fn new(config: &ClusterConfig) -> Result<Self, ClusterError> {
        config.validate()?;
        if config.distance_threshold.is_some() {
            return Err(ClusterError::InvalidConfiguration(
                "distance_threshold is an agglomerative-only stopping rule".to_string(),
            ));
        }
        let metric = parse_metric(&config.metric)?;
        Ok(Self {
            metric,
            num_clusters: config.num_clusters.unwrap_or(1),
        })
    }

    /// Cluster the dataset up to the configured cluster count
    pub fn cluster(&self, dataset: &Dataset) -> Result<ClusterResult, ClusterError> {
        let n = dataset.len();
        if n == 0 {
            return Err(ClusterError::InvalidInput(
                "record collection is empty".to_string(),
            ));
        }
        if self.num_clusters > n {
            return Err(ClusterError::InvalidConfiguration(format!(
                "cluster count {} exceeds record count {}",
                self.num_clusters, n
            )));
        }

        let matrix = DistanceMatrix::build(&dataset.records, self.metric.as_ref())?;
        let mut partition = Partition::whole(n);
        let mut splits = Vec::with_capacity(self.num_clusters - 1);

        log::info!(
            "Divisive clustering of {} records into {} clusters",
            n,
            self.num_clusters
        );

        while partition.len() < self.num_clusters {
            let (position, diameter) = widest_group(&partition, &matrix);
            let members = &partition.groups()[position].members;
            let (remainder, splinter) = split_group(members, &matrix);
            log::debug!(
                "Split group {} (diameter {}) into {} + {} members",
                position,
                diameter,
                remainder.len(),
                splinter.len()
            );
            splits.push(SplitStep {
                group: position,
                diameter,
                remainder_size: remainder.len(),
                splinter_size: splinter.len(),
            });
            partition.apply_split(
                position,
                Group {
                    members: remainder,
                    aggregate: None,
                },
                Group {
                    members: splinter,
                    aggregate: None,
                },
            );
        }

        log::info!("Finished with {} clusters after {} splits", partition.len(), splits.len());

        let membership = partition.membership(n);
        let assigner =
            ClusterAssigner::new(dataset.records.clone(), self.metric.clone(), membership);
        Ok(ClusterResult::from_splits(
            partition.into_index_groups(),
            splits,
            assigner,
        ))
    }
}

/// Position and diameter of the group with the largest diameter.
///
/// Singleton groups are skipped (their diameter is 0 and they cannot be
/// split); ties resolve to the lowest position. The partition always holds a
/// splittable group while it is smaller than the record count.
fn widest_group(partition: &Partition, matrix: &DistanceMatrix) -> (usize, f64) {
    let mut best: Option<(usize, f64)> = None;
    for (position, group) in partition.groups().iter().enumerate() {
        if group.len() < 2 {
            continue;
        }
        let diameter = diameter_of(&group.members, matrix);
        if best.map_or(true, |(_, widest)| diameter > widest) {
            best = Some((position, diameter));
        }
    }
    best.expect("a partition smaller than the record count has a splittable group")
}

/// Maximum intra-group pairwise distance; 0 for fewer than two members
fn diameter_of(members: &[usize], matrix: &DistanceMatrix) -> f64 {
    members
        .iter()
        .tuple_combinations()
        .map(|(&x, &y)| matrix.get(x, y))
        .fold(0.0, f64::max)
}

/// Divide one group into (remainder, splinter).
///
/// The splinter is seeded with the member whose average distance to the rest
/// is largest, then grown one member at a time: the mover is the remaining
/// member with the largest positive gap between its average distance to the
/// group it is leaving and its average distance to the splinter, both
/// recomputed after every move. Ties resolve to the lowest index.
fn split_group(members: &[usize], matrix: &DistanceMatrix) -> (Vec<usize>, Vec<usize>) {
    debug_assert!(members.len() >= 2);

    let mut seed = 0;
    let mut seed_average = f64::NEG_INFINITY;
    for (index, &member) in members.iter().enumerate() {
        let average = average_distance(member, members, matrix, Some(member));
        if average > seed_average {
            seed = index;
            seed_average = average;
        }
    }

    let mut splinter = vec![members[seed]];
    let mut rest: Vec<usize> = members
        .iter()
        .copied()
        .filter(|&m| m != members[seed])
        .collect();

    while rest.len() > 1 {
        let mut mover: Option<(usize, f64)> = None;
        for (index, &member) in rest.iter().enumerate() {
            let to_rest = average_distance(member, &rest, matrix, Some(member));
            let to_splinter = average_distance(member, &splinter, matrix, None);
            let gap = to_rest - to_splinter;
            if gap > 0.0 && mover.map_or(true, |(_, widest)| gap > widest) {
                mover = Some((index, gap));
            }
        }
        match mover {
            Some((index, _)) => splinter.push(rest.remove(index)),
            None => break,
        }
    }

    splinter.sort_unstable();
    (rest, splinter)
}

/// Mean distance from `member` to a set of records, optionally excluding one
fn average_distance(
    member: usize,
    others: &[usize],
    matrix: &DistanceMatrix,
    exclude: Option<usize>,
) -> f64 {
    let mut total = 0.0;
    let mut count = 0;
    for &other in others {
        if Some(other) == exclude {
            continue;
        }
        total += matrix.get(member, other);
        count += 1;
    }
    total / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::linkage::Linkage;
    use crate::metric::SquaredEuclidean;

    fn sample_dataset() -> Dataset {
        Dataset::from_records(vec![
            vec![10.0, 3.0],
            vec![3.0, 10.0],
            vec![2.0, 8.0],
            vec![2.0, 5.0],
            vec![3.0, 8.0],
            vec![10.0, 3.0],
            vec![1.0, 3.0],
            vec![8.0, 1.0],
            vec![2.0, 9.0],
            vec![2.0, 5.0],
            vec![3.0, 3.0],
            vec![9.0, 4.0],
        ])
        .unwrap()
    }

    fn run(clusters: usize) -> ClusterResult {
        let config = ClusterConfig::with_clusters(Linkage::Single, clusters);
        DivisiveEngine::new(&config)
            .unwrap()
            .cluster(&sample_dataset())
            .unwrap()
    }

    #[test]
    fn every_record_lands_in_exactly_one_cluster() {
        let result = run(4);
        assert_eq!(result.cluster_count(), 4);
        assert!(result.member_counts().iter().all(|&c| c > 0));
        let mut seen: Vec<usize> = result.clusters().iter().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn the_first_split_divides_the_widest_group() {
        let result = run(4);
        let matrix =
            DistanceMatrix::build(&sample_dataset().records, &SquaredEuclidean).unwrap();
        let first = &result.split_history()[0];
        assert_eq!(first.group, 0);
        assert_eq!(first.diameter, matrix.max_distance());
        assert_eq!(first.diameter, 106.0);
        assert_eq!(first.remainder_size + first.splinter_size, 12);
    }

    #[test]
    fn final_distance_is_the_last_split_diameter() {
        let result = run(3);
        let last = result.split_history().last().unwrap();
        assert_eq!(result.final_distance(), Some(last.diameter));
        assert!(result.dendrogram().is_none());
    }

    #[test]
    fn two_well_separated_blobs_split_apart() {
        let dataset = Dataset::from_records(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 0.0],
            vec![10.0, 1.0],
        ])
        .unwrap();
        let config = ClusterConfig::with_clusters(Linkage::Single, 2);
        let result = DivisiveEngine::new(&config).unwrap().cluster(&dataset).unwrap();
        let mut clusters = result.clusters().to_vec();
        clusters.sort();
        assert_eq!(clusters, vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn requesting_one_cluster_per_record_yields_singletons() {
        let result = run(12);
        assert_eq!(result.cluster_count(), 12);
        assert!(result.member_counts().iter().all(|&c| c == 1));
    }

    #[test]
    fn assignment_is_always_retained() {
        let result = run(4);
        assert!(result.supports_assignment());
        let cluster_of_two = result
            .clusters()
            .iter()
            .position(|c| c.contains(&2))
            .unwrap();
        assert_eq!(result.assign(&[0.0, 8.0]).unwrap(), cluster_of_two);
    }

    #[test]
    fn cluster_count_above_the_record_count_is_rejected() {
        let config = ClusterConfig::with_clusters(Linkage::Single, 13);
        let err = DivisiveEngine::new(&config)
            .unwrap()
            .cluster(&sample_dataset())
            .unwrap_err();
        assert!(matches!(err, ClusterError::InvalidConfiguration(_)));
    }

    #[test]
    fn distance_thresholds_are_rejected() {
        let config = ClusterConfig::with_threshold(Linkage::Single, 5.0);
        assert!(matches!(
            DivisiveEngine::new(&config),
            Err(ClusterError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn duplicate_only_groups_still_split() {
        let dataset =
            Dataset::from_records(vec![vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
        let config = ClusterConfig::with_clusters(Linkage::Single, 3);
        let result = DivisiveEngine::new(&config).unwrap().cluster(&dataset).unwrap();
        assert_eq!(result.cluster_count(), 3);
        assert!(result
            .split_history()
            .iter()
            .all(|s| s.diameter == 0.0));
    }
}
