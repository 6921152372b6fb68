//! Year x (metric, county) view of the annual summary table.
//!
//! Only the gap imputer builds and consumes this; it never leaves the crate.

use crate::error::{ProcessingError, Result};
use crate::models::{AnnualSummary, ClimateMetric};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct FeatureColumn {
    pub metric: ClimateMetric,
    pub county: String,
}

/// Whether a column carries any signal for imputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnCompleteness {
    Observed,
    FullyMissing,
}

/// Disjoint split of the column indices by completeness.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ColumnPartition {
    pub observed: Vec<usize>,
    pub fully_missing: Vec<usize>,
}

#[derive(Debug, Clone)]
pub(crate) struct WideFeatureMatrix {
    pub years: Vec<i32>,
    pub columns: Vec<FeatureColumn>,
    /// Row-major, `cells[year_index][column_index]`
    pub cells: Vec<Vec<Option<f64>>>,
}

impl WideFeatureMatrix {
    /// Pivot long rows to the wide layout.
    ///
    /// Rows are years ascending; columns are metric-major (tmax, tmin, prcp),
    /// then county ascending. County-years absent from the input stay `None`.
    pub fn from_summaries(rows: &[AnnualSummary]) -> Result<Self> {
        let years: Vec<i32> = rows
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let counties: Vec<&str> = rows
            .iter()
            .map(|r| r.county.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns: Vec<FeatureColumn> = ClimateMetric::ALL
            .iter()
            .flat_map(|metric| {
                counties.iter().map(move |county| FeatureColumn {
                    metric: *metric,
                    county: county.to_string(),
                })
            })
            .collect();

        let year_index: HashMap<i32, usize> =
            years.iter().enumerate().map(|(i, y)| (*y, i)).collect();
        let county_index: HashMap<&str, usize> =
            counties.iter().enumerate().map(|(i, c)| (*c, i)).collect();

        let mut cells = vec![vec![None; columns.len()]; years.len()];
        let mut seen = HashSet::with_capacity(rows.len());

        for row in rows {
            if !seen.insert(row.key()) {
                return Err(ProcessingError::DataMerge(format!(
                    "duplicate annual row for {} {}",
                    row.county, row.year
                )));
            }

            let r = year_index[&row.year];
            let county_offset = county_index[row.county.as_str()];
            for (metric_offset, metric) in ClimateMetric::ALL.iter().enumerate() {
                cells[r][metric_offset * counties.len() + county_offset] = row.get(*metric);
            }
        }

        Ok(Self {
            years,
            columns,
            cells,
        })
    }

    pub fn row_count(&self) -> usize {
        self.years.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn completeness(&self, column: usize) -> ColumnCompleteness {
        if self.cells.iter().any(|row| row[column].is_some()) {
            ColumnCompleteness::Observed
        } else {
            ColumnCompleteness::FullyMissing
        }
    }

    pub fn partition_columns(&self) -> ColumnPartition {
        let mut partition = ColumnPartition::default();
        for column in 0..self.column_count() {
            match self.completeness(column) {
                ColumnCompleteness::Observed => partition.observed.push(column),
                ColumnCompleteness::FullyMissing => partition.fully_missing.push(column),
            }
        }
        partition
    }

    /// Copy of the given columns, in the given order.
    pub fn select_columns(&self, columns: &[usize]) -> Vec<Vec<Option<f64>>> {
        self.cells
            .iter()
            .map(|row| columns.iter().map(|&c| row[c]).collect())
            .collect()
    }

    /// Write a block produced by [`select_columns`](Self::select_columns) back in place.
    pub fn replace_columns(&mut self, columns: &[usize], block: &[Vec<f64>]) {
        for (row, values) in self.cells.iter_mut().zip(block) {
            for (&c, value) in columns.iter().zip(values) {
                row[c] = Some(*value);
            }
        }
    }

    /// Melt back to long form for exactly the given keys, sorted by county then year.
    pub fn to_summaries(&self, keys: &[(String, i32)]) -> Vec<AnnualSummary> {
        let year_index: HashMap<i32, usize> =
            self.years.iter().enumerate().map(|(i, y)| (*y, i)).collect();
        let column_index: HashMap<(ClimateMetric, &str), usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| ((c.metric, c.county.as_str()), i))
            .collect();

        let mut sorted_keys: Vec<&(String, i32)> = keys.iter().collect();
        sorted_keys.sort();

        sorted_keys
            .into_iter()
            .map(|(county, year)| {
                let mut row = AnnualSummary::missing(county.as_str(), *year);
                if let Some(&r) = year_index.get(year) {
                    for metric in ClimateMetric::ALL {
                        if let Some(&c) = column_index.get(&(metric, county.as_str())) {
                            row.set(metric, self.cells[r][c]);
                        }
                    }
                }
                row
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(county: &str, year: i32, values: [Option<f64>; 3]) -> AnnualSummary {
        AnnualSummary::new(county.to_string(), year, values[0], values[1], values[2])
    }

    #[test]
    fn test_layout_is_metric_major_then_county() -> Result<()> {
        let rows = vec![
            row("Kern", 2021, [Some(30.0), Some(12.0), Some(100.0)]),
            row("Butte", 2020, [Some(25.0), None, Some(500.0)]),
            row("Kern", 2020, [Some(29.0), Some(11.0), None]),
        ];

        let matrix = WideFeatureMatrix::from_summaries(&rows)?;

        assert_eq!(matrix.years, vec![2020, 2021]);
        let labels: Vec<String> = matrix
            .columns
            .iter()
            .map(|c| format!("{}_{}", c.metric, c.county))
            .collect();
        assert_eq!(
            labels,
            vec![
                "tmax_mean_Butte",
                "tmax_mean_Kern",
                "tmin_mean_Butte",
                "tmin_mean_Kern",
                "prcp_total_Butte",
                "prcp_total_Kern",
            ]
        );
        assert_eq!(
            matrix.cells[0],
            vec![Some(25.0), Some(29.0), None, Some(11.0), Some(500.0), None]
        );
        // Butte 2021 was never supplied
        assert_eq!(
            matrix.cells[1],
            vec![None, Some(30.0), None, Some(12.0), None, Some(100.0)]
        );
        Ok(())
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let rows = vec![
            row("Kern", 2020, [Some(1.0), None, None]),
            row("Kern", 2020, [Some(2.0), None, None]),
        ];
        assert!(matches!(
            WideFeatureMatrix::from_summaries(&rows),
            Err(ProcessingError::DataMerge(_))
        ));
    }

    #[test]
    fn test_partition_columns() -> Result<()> {
        let rows = vec![
            row("Kern", 2020, [Some(29.0), None, None]),
            row("Kern", 2021, [None, None, Some(80.0)]),
        ];
        let matrix = WideFeatureMatrix::from_summaries(&rows)?;

        assert_eq!(matrix.completeness(0), ColumnCompleteness::Observed);
        assert_eq!(matrix.completeness(1), ColumnCompleteness::FullyMissing);
        assert_eq!(
            matrix.partition_columns(),
            ColumnPartition {
                observed: vec![0, 2],
                fully_missing: vec![1],
            }
        );
        Ok(())
    }

    #[test]
    fn test_select_and_replace_columns() -> Result<()> {
        let rows = vec![
            row("Kern", 2020, [Some(29.0), None, Some(90.0)]),
            row("Kern", 2021, [None, None, Some(80.0)]),
        ];
        let mut matrix = WideFeatureMatrix::from_summaries(&rows)?;

        let block = matrix.select_columns(&[2, 0]);
        assert_eq!(block, vec![vec![Some(90.0), Some(29.0)], vec![Some(80.0), None]]);

        matrix.replace_columns(&[2, 0], &[vec![90.0, 29.0], vec![80.0, 28.5]]);
        assert_eq!(matrix.cells[1][0], Some(28.5));
        assert_eq!(matrix.cells[1][1], None);
        Ok(())
    }

    #[test]
    fn test_round_trip_preserves_keys_and_values() -> Result<()> {
        let rows = vec![
            row("Tulare", 2020, [Some(31.0), Some(13.0), Some(200.0)]),
            row("Kings", 2021, [None, Some(12.0), None]),
            row("Kings", 2020, [Some(30.5), None, Some(150.0)]),
        ];
        let keys: Vec<(String, i32)> = rows.iter().map(|r| (r.county.clone(), r.year)).collect();

        let matrix = WideFeatureMatrix::from_summaries(&rows)?;
        let back = matrix.to_summaries(&keys);

        assert_eq!(back.len(), 3);
        assert_eq!(back[0], rows[2]);
        assert_eq!(back[1], rows[1]);
        assert_eq!(back[2], rows[0]);
        Ok(())
    }
}
