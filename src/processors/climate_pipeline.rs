use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::AnnualSummary;
use crate::processors::{
    AnnualSummarizer, GapImputer, ImputationReport, MissingDataLog, SummaryOutcome,
};
use crate::utils::progress::ProgressReporter;
use serde::Serialize;

/// Diagnostics for a full run: county-years with no source data, kept apart
/// from the cells the imputer filled.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub start_year: i32,
    pub end_year: i32,
    pub counties: usize,
    pub rows: usize,
    pub files_read: usize,
    pub missing_data: MissingDataLog,
    pub imputation: ImputationReport,
}

impl PipelineReport {
    pub fn generate_summary(&self) -> String {
        format!(
            "Window: {}-{}, {} counties, {} rows ({} source files read)\n\n{}\n{}",
            self.start_year,
            self.end_year,
            self.counties,
            self.rows,
            self.files_read,
            self.missing_data.generate_summary(),
            self.imputation.generate_summary()
        )
    }
}

/// Summarize then gap-fill, as one run over a configured window.
pub struct ClimatePipeline {
    config: PipelineConfig,
}

impl ClimatePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Annual rows only, without gap filling.
    pub fn summarize(&self, progress: Option<&ProgressReporter>) -> Result<SummaryOutcome> {
        AnnualSummarizer::new(&self.config).summarize(&self.config.input_dir, progress)
    }

    pub fn run(
        &self,
        progress: Option<&ProgressReporter>,
    ) -> Result<(Vec<AnnualSummary>, PipelineReport)> {
        let summary = self.summarize(progress)?;

        if let Some(p) = progress {
            p.set_message("Imputing missing annual values...");
        }

        let counties = summary.county_count();
        let imputer = GapImputer::from_config(&self.config);
        let outcome = imputer.impute(&summary.rows)?;

        if let Some(p) = progress {
            p.finish_with_message(&format!("Built {} county-year rows", outcome.records.len()));
        }

        let report = PipelineReport {
            start_year: self.config.start_year,
            end_year: self.config.end_year,
            counties,
            rows: outcome.records.len(),
            files_read: summary.files_read,
            missing_data: summary.missing,
            imputation: outcome.report,
        };

        Ok((outcome.records, report))
    }
}
