use crate::error::{ProcessingError, Result};
use std::cmp::Ordering;
use tracing::debug;

/// A candidate donor row for one missing cell.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Donor {
    row: usize,
    distance: f64,
    common_columns: usize,
    /// Shares at least half of the target row's known columns
    sufficient_overlap: bool,
}

/// k-nearest-neighbour imputation over a dense matrix with missing cells.
///
/// Distances use the NaN-aware Euclidean metric: only columns known in both
/// rows count, and the sum is scaled by `total / common` so partial overlap is
/// comparable with full overlap. Donors sharing fewer than half of the target
/// row's known columns rank after every donor that shares enough; within each
/// group donors are ranked by distance, then by overlap (more common columns
/// first), then by row index, and the cell gets the plain mean of the first
/// `k`. A cell with no comparable donor takes the column mean. Distances only
/// ever see originally known values.
pub struct KnnImputer {
    n_neighbors: usize,
}

impl KnnImputer {
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors: n_neighbors.max(1),
        }
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// Fill every missing cell.
    ///
    /// Every column must have at least one known value; fully-missing columns
    /// have nothing to impute from and are rejected.
    pub fn fit_transform(&self, data: &[Vec<Option<f64>>]) -> Result<Vec<Vec<f64>>> {
        let n_cols = data.first().map_or(0, Vec::len);
        if data.iter().any(|row| row.len() != n_cols) {
            return Err(ProcessingError::Imputation(
                "rows have differing column counts".to_string(),
            ));
        }

        let column_means = (0..n_cols)
            .map(|col| {
                column_mean(data, col).ok_or_else(|| {
                    ProcessingError::Imputation(format!(
                        "column {} has no known values",
                        col
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let mut filled = 0usize;
        let result: Vec<Vec<f64>> = data
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                row.iter()
                    .enumerate()
                    .map(|(col_idx, cell)| match cell {
                        Some(value) => *value,
                        None => {
                            filled += 1;
                            self.impute_value(data, row_idx, col_idx)
                                .unwrap_or(column_means[col_idx])
                        }
                    })
                    .collect()
            })
            .collect();

        debug!(
            "KNN imputed {} cells over {} rows x {} columns (k = {})",
            filled,
            data.len(),
            n_cols,
            self.n_neighbors
        );

        Ok(result)
    }

    /// Mean of the nearest donors' values, or `None` when no row is comparable.
    fn impute_value(
        &self,
        data: &[Vec<Option<f64>>],
        target_row: usize,
        target_col: usize,
    ) -> Option<f64> {
        let min_overlap = minimum_overlap(&data[target_row]);

        let mut donors: Vec<Donor> = data
            .iter()
            .enumerate()
            .filter(|(row, values)| *row != target_row && values[target_col].is_some())
            .filter_map(|(row, values)| {
                nan_euclidean_distance(&data[target_row], values).map(
                    |(distance, common_columns)| Donor {
                        row,
                        distance,
                        common_columns,
                        sufficient_overlap: common_columns >= min_overlap,
                    },
                )
            })
            .collect();

        if donors.is_empty() {
            return None;
        }

        donors.sort_by(rank_donors);

        let k = self.n_neighbors.min(donors.len());
        let sum: f64 = donors[..k]
            .iter()
            .filter_map(|d| data[d.row][target_col])
            .sum();

        Some(sum / k as f64)
    }
}

/// Half of the row's known columns, rounded up.
fn minimum_overlap(row: &[Option<f64>]) -> usize {
    let known = row.iter().filter(|v| v.is_some()).count();
    (known + 1) / 2
}

fn rank_donors(a: &Donor, b: &Donor) -> Ordering {
    b.sufficient_overlap
        .cmp(&a.sufficient_overlap)
        .then_with(|| a.distance.total_cmp(&b.distance))
        .then_with(|| b.common_columns.cmp(&a.common_columns))
        .then_with(|| a.row.cmp(&b.row))
}

/// NaN-aware Euclidean distance and the number of columns it was computed over.
///
/// `None` when the rows share no known column.
pub fn nan_euclidean_distance(a: &[Option<f64>], b: &[Option<f64>]) -> Option<(f64, usize)> {
    let total = a.len();
    let mut sum_squared_diff = 0.0;
    let mut common = 0usize;

    for (x, y) in a.iter().zip(b) {
        if let (Some(x), Some(y)) = (x, y) {
            let diff = x - y;
            sum_squared_diff += diff * diff;
            common += 1;
        }
    }

    if common == 0 {
        return None;
    }

    let weight = total as f64 / common as f64;
    Some(((weight * sum_squared_diff).sqrt(), common))
}

fn column_mean(data: &[Vec<Option<f64>>], col: usize) -> Option<f64> {
    let (sum, count) = data
        .iter()
        .filter_map(|row| row[col])
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}
