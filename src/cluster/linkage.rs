//! Inter-group distance policies

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cluster::matrix::DistanceMatrix;
use crate::cluster::partition::{Aggregate, Group};
use crate::error::ClusterError;
use crate::metric::DistanceMetric;

/// Policy for computing the distance between two groups from pairwise
/// record distances.
///
/// `Single`, `Complete`, and `Average` read the pairwise table directly.
/// The remaining variants additionally rely on an aggregate payload carried
/// by each group and recombined at every merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Linkage {
    /// Minimum over all cross pairs; favors elongated, chained clusters
    Single,
    /// Maximum over all cross pairs; favors compact, evenly sized clusters
    Complete,
    /// Mean over all cross pairs
    Average,
    /// Midpoint of the two child distances from the most recent merge,
    /// weighting merges equally rather than points
    WeightedAverage,
    /// Distance between running group centroids
    Centroid,
    /// Distance between midpoint-recursive group centers
    Median,
    /// Size-scaled centroid distance (minimum-variance criterion)
    Ward,
}

impl FromStr for Linkage {
    type Err = ClusterError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "single" => Ok(Self::Single),
            "complete" => Ok(Self::Complete),
            "average" => Ok(Self::Average),
            "weighted_average" => Ok(Self::WeightedAverage),
            "centroid" => Ok(Self::Centroid),
            "median" => Ok(Self::Median),
            "ward" => Ok(Self::Ward),
            other => Err(ClusterError::InvalidConfiguration(format!(
                "unrecognized linkage name: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Single => "single",
            Self::Complete => "complete",
            Self::Average => "average",
            Self::WeightedAverage => "weighted_average",
            Self::Centroid => "centroid",
            Self::Median => "median",
            Self::Ward => "ward",
        };
        f.write_str(name)
    }
}

impl Linkage {
    /// Payload a freshly created singleton group must carry under this
    /// linkage, or `None` when the pairwise table suffices
    pub fn singleton_aggregate(&self, record: &[f64]) -> Option<Aggregate> {
        match self {
            Self::Single | Self::Complete | Self::Average => None,
            Self::WeightedAverage => Some(Aggregate::Weights(vec![1.0])),
            Self::Centroid | Self::Ward => Some(Aggregate::Centroid(record.to_vec())),
            Self::Median => Some(Aggregate::Midpoint(record.to_vec())),
        }
    }

    /// Whether results built under this linkage can answer nearest-member
    /// assignment queries
    pub fn supports_assignment(&self) -> bool {
        matches!(self, Self::Single | Self::Complete | Self::Average)
    }

    /// Distance between two groups under this policy.
    ///
    /// Equal minima during a pair scan must be resolved by the caller in
    /// ascending lexicographic order of the pair positions.
    pub fn inter_group_distance(
        &self,
        a: &Group,
        b: &Group,
        matrix: &DistanceMatrix,
        metric: &dyn DistanceMetric,
    ) -> f64 {
        match self {
            Self::Single => cross_pair_fold(a, b, matrix, f64::INFINITY, f64::min),
            Self::Complete => cross_pair_fold(a, b, matrix, 0.0, f64::max),
            Self::Average => {
                let total = cross_pair_fold(a, b, matrix, 0.0, |acc, d| acc + d);
                total / (a.len() * b.len()) as f64
            }
            Self::WeightedAverage => {
                let wa = weights_of(a);
                let wb = weights_of(b);
                let mut total = 0.0;
                for (i, &x) in a.members.iter().enumerate() {
                    for (j, &y) in b.members.iter().enumerate() {
                        total += wa[i] * wb[j] * matrix.get(x, y);
                    }
                }
                total
            }
            Self::Centroid | Self::Median => metric.distance(center_of(a), center_of(b)),
            Self::Ward => {
                let na = a.len() as f64;
                let nb = b.len() as f64;
                2.0 * na * nb / (na + nb) * metric.distance(center_of(a), center_of(b))
            }
        }
    }
}

/// Fold a binary reduction over all cross-pair distances of two groups
fn cross_pair_fold(
    a: &Group,
    b: &Group,
    matrix: &DistanceMatrix,
    init: f64,
    fold: impl Fn(f64, f64) -> f64,
) -> f64 {
    let mut acc = init;
    for &x in &a.members {
        for &y in &b.members {
            acc = fold(acc, matrix.get(x, y));
        }
    }
    acc
}

fn weights_of(group: &Group) -> &[f64] {
    match &group.aggregate {
        Some(Aggregate::Weights(w)) => w,
        _ => unreachable!("weighted-average groups always carry member weights"),
    }
}

fn center_of(group: &Group) -> &[f64] {
    match &group.aggregate {
        Some(Aggregate::Centroid(c)) | Some(Aggregate::Midpoint(c)) => c,
        _ => unreachable!("centroid-family groups always carry a center"),
    }
}
