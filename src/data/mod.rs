//! Tabular record container consumed and produced by the clustering engines

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::error::ClusterError;

/// A labeled collection of numeric records.
///
/// Every record carries one value per attribute label; records are immutable
/// during clustering. Engines consume a dataset and produce one dataset per
/// cluster through [`Dataset::select`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Attribute labels, parallel to every record's values
    pub labels: Vec<String>,

    /// Numeric records, one row per item
    pub records: Vec<Vec<f64>>,
}

impl Dataset {
    /// Create a dataset, checking that every record is rectangular, finite,
    /// and matches the label count
    pub fn new(labels: Vec<String>, records: Vec<Vec<f64>>) -> Result<Self, ClusterError> {
        for (index, record) in records.iter().enumerate() {
            if record.len() != labels.len() {
                return Err(ClusterError::InvalidInput(format!(
                    "record {} has {} attributes, expected {}",
                    index,
                    record.len(),
                    labels.len()
                )));
            }
            if let Some(value) = record.iter().find(|v| !v.is_finite()) {
                return Err(ClusterError::InvalidInput(format!(
                    "record {} contains a non-finite value ({})",
                    index, value
                )));
            }
        }
        Ok(Self { labels, records })
    }

    /// Create a dataset with generated attribute labels
    pub fn from_records(records: Vec<Vec<f64>>) -> Result<Self, ClusterError> {
        let arity = records.first().map_or(0, |r| r.len());
        let labels = (0..arity).map(|i| format!("attribute_{}", i)).collect();
        Self::new(labels, records)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the dataset holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of attributes per record
    pub fn attribute_count(&self) -> usize {
        self.labels.len()
    }

    /// Materialize the records at the given indices as a new dataset,
    /// sharing the attribute labels
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            labels: self.labels.clone(),
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_records_are_rejected() {
        let err = Dataset::new(
            vec!["x".to_string(), "y".to_string()],
            vec![vec![1.0, 2.0], vec![3.0]],
        )
        .unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput(_)));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = Dataset::from_records(vec![vec![1.0], vec![f64::INFINITY]]).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput(_)));
    }

    #[test]
    fn generated_labels_cover_every_attribute() {
        let dataset = Dataset::from_records(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        assert_eq!(dataset.labels, vec!["attribute_0", "attribute_1", "attribute_2"]);
        assert_eq!(dataset.attribute_count(), 3);
    }

    #[test]
    fn select_keeps_labels_and_picks_rows() {
        let dataset = Dataset::from_records(vec![
            vec![1.0, 2.0],
            vec![3.0, 4.0],
            vec![5.0, 6.0],
        ])
        .unwrap();
        let subset = dataset.select(&[2, 0]);
        assert_eq!(subset.labels, dataset.labels);
        assert_eq!(subset.records, vec![vec![5.0, 6.0], vec![1.0, 2.0]]);
    }
}
