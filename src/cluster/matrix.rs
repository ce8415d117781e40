//! Pairwise distance table built once per clustering run

use rayon::prelude::*;

use crate::error::ClusterError;
use crate::metric::DistanceMetric;

/// Inputs below this size are computed sequentially; the parallel build only
/// pays off once the O(n²) row work dominates thread startup.
const PARALLEL_THRESHOLD: usize = 512;

/// Strictly lower-triangular table of pairwise record distances.
///
/// Row i holds the distances from record i to records 0..i, so only one of
/// each symmetric pair is stored. The table is read-only after construction
/// and may be reused for read-only queries once a run completes.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    /// Number of records covered by the table
    size: usize,

    /// Flattened triangle: row i starts at i*(i-1)/2 and holds i entries
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// Compute all pairwise distances for the given records.
    ///
    /// Fails with `InvalidInput` on an empty collection, on ragged records,
    /// or on non-finite attribute values.
    pub fn build(
        records: &[Vec<f64>],
        metric: &dyn DistanceMetric,
    ) -> Result<Self, ClusterError> {
        if records.is_empty() {
            return Err(ClusterError::InvalidInput(
                "record collection is empty".to_string(),
            ));
        }

        let arity = records[0].len();
        for (index, record) in records.iter().enumerate() {
            if record.len() != arity {
                return Err(ClusterError::InvalidInput(format!(
                    "record {} has {} attributes, expected {}",
                    index,
                    record.len(),
                    arity
                )));
            }
            if let Some(value) = record.iter().find(|v| !v.is_finite()) {
                return Err(ClusterError::InvalidInput(format!(
                    "record {} contains a non-finite value ({})",
                    index, value
                )));
            }
        }

        let n = records.len();
        log::debug!("Building distance matrix for {} records", n);

        // Row i of the triangle holds i entries, so rows can be computed
        // independently and concatenated in order.
        let cells = if n < PARALLEL_THRESHOLD {
            let mut cells = Vec::with_capacity(n * (n - 1) / 2);
            for i in 1..n {
                for j in 0..i {
                    cells.push(metric.distance(&records[i], &records[j]));
                }
            }
            cells
        } else {
            let rows: Vec<Vec<f64>> = (1..n)
                .into_par_iter()
                .map(|i| {
                    (0..i)
                        .map(|j| metric.distance(&records[i], &records[j]))
                        .collect()
                })
                .collect();
            let mut cells = Vec::with_capacity(n * (n - 1) / 2);
            for row in rows {
                cells.extend(row);
            }
            cells
        };

        Ok(Self { size: n, cells })
    }

    /// Number of records covered by the table
    pub fn len(&self) -> usize {
        self.size
    }

    /// True when the table covers no records (never the case after `build`)
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Distance between records i and j; 0 on the diagonal.
    ///
    /// Symmetric access: only the lower triangle is stored, the mirrored
    /// entry resolves to the same cell.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return 0.0;
        }
        let (row, col) = if i > j { (i, j) } else { (j, i) };
        self.cells[row * (row - 1) / 2 + col]
    }

    /// Largest pairwise distance in the table (0 for a single record)
    pub fn max_distance(&self) -> f64 {
        self.cells.iter().copied().fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::SquaredEuclidean;

    fn sample_records() -> Vec<Vec<f64>> {
        vec![
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
        ]
    }

    #[test]
    fn distances_match_hand_computed_values() {
        let matrix = DistanceMatrix::build(&sample_records(), &SquaredEuclidean).unwrap();
        // Distances from the first record to the first four records
        assert_eq!(matrix.get(0, 0), 0.0);
        assert_eq!(matrix.get(1, 0), 98.0);
        assert_eq!(matrix.get(2, 0), 89.0);
        assert_eq!(matrix.get(3, 0), 68.0);
    }

    #[test]
    fn access_is_symmetric() {
        let matrix = DistanceMatrix::build(&sample_records(), &SquaredEuclidean).unwrap();
        for i in 0..matrix.len() {
            for j in 0..matrix.len() {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
    }

    #[test]
    fn rebuild_is_idempotent() {
        let records = sample_records();
        let first = DistanceMatrix::build(&records, &SquaredEuclidean).unwrap();
        let second = DistanceMatrix::build(&records, &SquaredEuclidean).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_records_have_zero_distance() {
        let matrix = DistanceMatrix::build(&sample_records(), &SquaredEuclidean).unwrap();
        assert_eq!(matrix.get(5, 0), 0.0); // both [10, 3]
        assert_eq!(matrix.get(9, 3), 0.0); // both [2, 5]
    }

    #[test]
    fn max_distance_matches_the_farthest_pair() {
        let matrix = DistanceMatrix::build(&sample_records(), &SquaredEuclidean).unwrap();
        // [3, 10] vs [8, 1]
        assert_eq!(matrix.max_distance(), 106.0);
    }

    #[test]
    fn single_record_yields_an_empty_triangle() {
        let matrix = DistanceMatrix::build(&[vec![1.0, 2.0]], &SquaredEuclidean).unwrap();
        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix.get(0, 0), 0.0);
        assert_eq!(matrix.max_distance(), 0.0);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = DistanceMatrix::build(&[], &SquaredEuclidean).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput(_)));
    }

    #[test]
    fn ragged_records_are_rejected() {
        let records = vec![vec![1.0, 2.0], vec![3.0]];
        let err = DistanceMatrix::build(&records, &SquaredEuclidean).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput(_)));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let records = vec![vec![1.0, 2.0], vec![f64::NAN, 0.0]];
        let err = DistanceMatrix::build(&records, &SquaredEuclidean).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput(_)));
    }
}
