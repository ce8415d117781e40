//! Hierarchical clustering engines and their shared result type

pub mod agglomerative;
pub mod assignment;
pub mod dendrogram;
pub mod divisive;
pub mod linkage;
pub mod matrix;
pub mod partition;

use serde::{Deserialize, Serialize};

use crate::cluster::assignment::ClusterAssigner;
use crate::cluster::dendrogram::Dendrogram;
use crate::cluster::divisive::SplitStep;
use crate::data::Dataset;
use crate::error::ClusterError;

/// Terminal partition of one clustering run.
///
/// Holds the index groups, the merge or split history for reporting, and,
/// for supporting configurations, the retained assignment index.
#[derive(Debug, Clone)]
pub struct ClusterResult {
    clusters: Vec<Vec<usize>>,
    dendrogram: Option<Dendrogram>,
    splits: Vec<SplitStep>,
    assigner: Option<ClusterAssigner>,
}

impl ClusterResult {
    pub(crate) fn from_merges(
        clusters: Vec<Vec<usize>>,
        dendrogram: Dendrogram,
        assigner: Option<ClusterAssigner>,
    ) -> Self {
        Self {
            clusters,
            dendrogram: Some(dendrogram),
            splits: Vec::new(),
            assigner,
        }
    }

    pub(crate) fn from_splits(
        clusters: Vec<Vec<usize>>,
        splits: Vec<SplitStep>,
        assigner: ClusterAssigner,
    ) -> Self {
        Self {
            clusters,
            dendrogram: None,
            splits,
            assigner: Some(assigner),
        }
    }

    /// The index groups of the terminal partition
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    /// Number of groups in the terminal partition
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Member count per cluster, in cluster order
    pub fn member_counts(&self) -> Vec<usize> {
        self.clusters.iter().map(|c| c.len()).collect()
    }

    /// Merge history, present for agglomerative runs
    pub fn dendrogram(&self) -> Option<&Dendrogram> {
        self.dendrogram.as_ref()
    }

    /// Split history, non-empty only for divisive runs
    pub fn split_history(&self) -> &[SplitStep] {
        &self.splits
    }

    /// Distance of the final merge, or diameter of the final split
    pub fn final_distance(&self) -> Option<f64> {
        match &self.dendrogram {
            Some(dendrogram) => dendrogram.final_distance(),
            None => self.splits.last().map(|s| s.diameter),
        }
    }

    /// Whether [`ClusterResult::assign`] is usable for this configuration
    pub fn supports_assignment(&self) -> bool {
        self.assigner.is_some()
    }

    /// Assign an unseen record to the cluster of its nearest original
    /// record.
    ///
    /// Fails with `UnsupportedOperation` when the configuration did not
    /// retain per-record distances; check `supports_assignment` first.
    pub fn assign(&self, record: &[f64]) -> Result<usize, ClusterError> {
        match &self.assigner {
            Some(assigner) => assigner.assign(record),
            None => Err(ClusterError::UnsupportedOperation(
                "assignment requires a linkage with nearest-member semantics".to_string(),
            )),
        }
    }

    /// Materialize each index group as a record collection in the caller's
    /// dataset, one dataset per cluster
    pub fn split_dataset(&self, dataset: &Dataset) -> Result<Vec<Dataset>, ClusterError> {
        let out_of_range = self
            .clusters
            .iter()
            .flatten()
            .any(|&index| index >= dataset.len());
        if out_of_range {
            return Err(ClusterError::InvalidInput(format!(
                "dataset with {} records does not cover the clustered indices",
                dataset.len()
            )));
        }
        Ok(self
            .clusters
            .iter()
            .map(|members| dataset.select(members))
            .collect())
    }

    /// Serializable summary for reporting collaborators
    pub fn report(&self) -> ClusterReport {
        ClusterReport {
            cluster_count: self.cluster_count(),
            member_counts: self.member_counts(),
            final_distance: self.final_distance(),
            merge_heights: self.dendrogram.as_ref().map(|d| d.heights()),
        }
    }
}

/// Flat summary of a run: per-cluster member counts, the final merge/split
/// distance, and (agglomerative only) the ordered merge heights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterReport {
    /// Number of clusters in the terminal partition
    pub cluster_count: usize,

    /// Member count per cluster
    pub member_counts: Vec<usize>,

    /// Distance of the final merge or split, if any happened
    pub final_distance: Option<f64>,

    /// Ordered merge distances (agglomerative runs only)
    pub merge_heights: Option<Vec<f64>>,
}
