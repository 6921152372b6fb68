use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{AnnualSummary, ClimateMetric};
use crate::processors::feature_matrix::WideFeatureMatrix;
use crate::processors::knn_imputer::KnnImputer;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputedCell {
    pub county: String,
    pub year: i32,
    pub metric: ClimateMetric,
    pub value: f64,
}

/// A (metric, county) series with no observation in any year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingColumn {
    pub metric: ClimateMetric,
    pub county: String,
}

/// What the imputer changed, and what it could not.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImputationReport {
    pub imputed_cells: Vec<ImputedCell>,
    pub fully_missing_columns: Vec<MissingColumn>,
    /// Cells still missing in the output table
    pub unfilled_cells: usize,
}

impl ImputationReport {
    pub fn imputed_count(&self) -> usize {
        self.imputed_cells.len()
    }

    pub fn was_imputed(&self, county: &str, year: i32, metric: ClimateMetric) -> bool {
        self.imputed_cells
            .iter()
            .any(|c| c.county == county && c.year == year && c.metric == metric)
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Imputation Report ===\n");
        summary.push_str(&format!("Imputed cells: {}\n", self.imputed_count()));

        for metric in ClimateMetric::ALL {
            let count = self
                .imputed_cells
                .iter()
                .filter(|c| c.metric == metric)
                .count();
            summary.push_str(&format!("  {}: {}\n", metric, count));
        }

        summary.push_str(&format!(
            "Fully missing series left empty: {}\n",
            self.fully_missing_columns.len()
        ));
        for column in &self.fully_missing_columns {
            summary.push_str(&format!("  {} / {}\n", column.county, column.metric));
        }
        summary.push_str(&format!("Cells still missing: {}\n", self.unfilled_cells));

        summary
    }
}

#[derive(Debug, Clone)]
pub struct ImputationOutcome {
    pub records: Vec<AnnualSummary>,
    pub report: ImputationReport,
}

/// Fills missing annual values from similar years across all county series.
///
/// Takes a long (county, year) table and returns one with the same key set,
/// sorted by county then year. Series with no observation at all are left
/// missing.
pub struct GapImputer {
    knn: KnnImputer,
}

impl GapImputer {
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            knn: KnnImputer::new(n_neighbors),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.neighbors)
    }

    pub fn n_neighbors(&self) -> usize {
        self.knn.n_neighbors()
    }

    pub fn impute(&self, rows: &[AnnualSummary]) -> Result<ImputationOutcome> {
        if rows.is_empty() {
            return Err(ProcessingError::MissingData(
                "no annual summary rows to impute".to_string(),
            ));
        }

        let keys: Vec<(String, i32)> = rows.iter().map(|r| (r.county.clone(), r.year)).collect();
        let mut matrix = WideFeatureMatrix::from_summaries(rows)?;
        let partition = matrix.partition_columns();

        info!(
            "Imputing {} years x {} series ({} fully missing, k = {})",
            matrix.row_count(),
            matrix.column_count(),
            partition.fully_missing.len(),
            self.n_neighbors()
        );

        let fully_missing_columns: Vec<MissingColumn> = partition
            .fully_missing
            .iter()
            .map(|&c| MissingColumn {
                metric: matrix.columns[c].metric,
                county: matrix.columns[c].county.clone(),
            })
            .collect();
        for column in &fully_missing_columns {
            warn!(
                "No {} observations for {} in any year, leaving missing",
                column.metric.source_column(),
                column.county
            );
        }

        if !partition.observed.is_empty() {
            let observed = matrix.select_columns(&partition.observed);
            let imputed = self.knn.fit_transform(&observed)?;
            matrix.replace_columns(&partition.observed, &imputed);
        }

        let records = matrix.to_summaries(&keys);
        let report = Self::build_report(rows, &records, fully_missing_columns);

        info!(
            "Imputed {} cells; {} cells remain missing",
            report.imputed_count(),
            report.unfilled_cells
        );

        Ok(ImputationOutcome { records, report })
    }

    fn build_report(
        original: &[AnnualSummary],
        imputed: &[AnnualSummary],
        fully_missing_columns: Vec<MissingColumn>,
    ) -> ImputationReport {
        let mut by_key: Vec<&AnnualSummary> = original.iter().collect();
        by_key.sort_by(|a, b| a.key().cmp(&b.key()));

        let mut report = ImputationReport {
            fully_missing_columns,
            ..ImputationReport::default()
        };

        for (before, after) in by_key.into_iter().zip(imputed) {
            for metric in ClimateMetric::ALL {
                match (before.get(metric), after.get(metric)) {
                    (None, Some(value)) => report.imputed_cells.push(ImputedCell {
                        county: after.county.clone(),
                        year: after.year,
                        metric,
                        value,
                    }),
                    (_, None) => report.unfilled_cells += 1,
                    _ => {}
                }
            }
        }

        report
    }
}

impl Default for GapImputer {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}
