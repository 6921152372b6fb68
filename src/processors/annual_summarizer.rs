use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{AnnualStatistics, AnnualSummary, ClimateMetric};
use crate::processors::missing_data::{MissingDataLog, MissingReason};
use crate::readers::{CountyScanner, ObservationReader};
use crate::utils::filename::source_file_path;
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Annual rows for every county-year plus the log of county-years without data.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub rows: Vec<AnnualSummary>,
    pub missing: MissingDataLog,
    pub files_read: usize,
}

impl SummaryOutcome {
    pub fn county_count(&self) -> usize {
        let mut counties: Vec<&str> = self.rows.iter().map(|r| r.county.as_str()).collect();
        counties.dedup();
        counties.len()
    }
}

enum SourceOutcome {
    Absent,
    Unreadable(String),
    Read(AnnualStatistics),
}

/// Reduces the `{county}/{county}_{year}.csv` tree to one row per county-year.
pub struct AnnualSummarizer {
    years: RangeInclusive<i32>,
    metrics: Vec<ClimateMetric>,
    max_workers: usize,
}

impl AnnualSummarizer {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            years: config.years(),
            metrics: config.metrics.clone(),
            max_workers: config.max_workers.max(1),
        }
    }

    /// Summarize every county-year under `root`.
    ///
    /// Missing or unreadable files never abort the run; they become all-missing
    /// rows and entries in the missing-data log. A root that does not exist or
    /// holds no county directories is an error.
    pub fn summarize(
        &self,
        root: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<SummaryOutcome> {
        let counties = CountyScanner::discover_counties(root)?;
        if counties.is_empty() {
            return Err(ProcessingError::MissingData(format!(
                "no county directories found under {}",
                root.display()
            )));
        }

        let tasks: Vec<(&str, i32)> = counties
            .iter()
            .flat_map(|county| self.years.clone().map(move |year| (county.as_str(), year)))
            .collect();

        info!(
            "Summarizing {} counties x {} years from {}",
            counties.len(),
            self.years.clone().count(),
            root.display()
        );
        if let Some(p) = progress {
            p.set_length(tasks.len() as u64);
            p.set_message("Summarizing daily observations...");
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let reader = ObservationReader::with_metrics(&self.metrics);

        // Indexed collect keeps (county, year) order regardless of scheduling
        let outcomes: Vec<SourceOutcome> = pool.install(|| {
            tasks
                .par_iter()
                .map(|(county, year)| {
                    let outcome = Self::read_source(&reader, root, county, *year);
                    if let Some(p) = progress {
                        p.increment(1);
                    }
                    outcome
                })
                .collect()
        });

        let mut rows = Vec::with_capacity(tasks.len());
        let mut missing = MissingDataLog::new();
        let mut files_read = 0;

        for ((county, year), outcome) in tasks.into_iter().zip(outcomes) {
            match outcome {
                SourceOutcome::Absent => {
                    warn!("Missing file: {} {}", county, year);
                    missing.record(county, year, MissingReason::NoSourceFile);
                    rows.push(AnnualSummary::missing(county, year));
                }
                SourceOutcome::Unreadable(cause) => {
                    error!(
                        "Error reading {}: {}",
                        source_file_path(root, county, year).display(),
                        cause
                    );
                    missing.record(county, year, MissingReason::Unreadable(cause));
                    rows.push(AnnualSummary::missing(county, year));
                }
                SourceOutcome::Read(stats) => {
                    files_read += 1;
                    debug!(
                        "{} {}: {} observation days",
                        county, year, stats.observation_days
                    );
                    rows.push(stats.into_summary(county, year));
                }
            }
        }

        info!("Total summary rows: {}", rows.len());
        if !missing.is_empty() {
            info!("Missing data summary:");
            for (county, entries) in missing.iter() {
                info!("  {}: missing {} years", county, entries.len());
            }
        }

        Ok(SummaryOutcome {
            rows,
            missing,
            files_read,
        })
    }

    fn read_source(
        reader: &ObservationReader,
        root: &Path,
        county: &str,
        year: i32,
    ) -> SourceOutcome {
        let path = source_file_path(root, county, year);
        if !path.is_file() {
            return SourceOutcome::Absent;
        }

        match reader.read_annual_statistics(&path, year) {
            Ok(stats) => SourceOutcome::Read(stats),
            Err(e) => SourceOutcome::Unreadable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write_source(root: &Path, county: &str, year: i32, content: &str) {
        let dir = root.join(county);
        fs::create_dir_all(&dir).unwrap();
        fs::write(source_file_path(root, county, year), content).unwrap();
    }

    fn config(start: i32, end: i32) -> PipelineConfig {
        PipelineConfig::default()
            .with_years(start, end)
            .with_max_workers(2)
    }

    #[test]
    fn test_one_row_per_county_year() -> Result<()> {
        let root = TempDir::new()?;
        write_source(root.path(), "Fresno", 2020, "date,TMAX\n2020-01-01,15.0\n");
        fs::create_dir(root.path().join("Madera"))?;

        let outcome = AnnualSummarizer::new(&config(2020, 2022)).summarize(root.path(), None)?;

        let keys: Vec<(&str, i32)> = outcome.rows.iter().map(|r| r.key()).collect();
        assert_eq!(
            keys,
            vec![
                ("Fresno", 2020),
                ("Fresno", 2021),
                ("Fresno", 2022),
                ("Madera", 2020),
                ("Madera", 2021),
                ("Madera", 2022),
            ]
        );
        assert_eq!(outcome.files_read, 1);
        assert_eq!(outcome.county_count(), 2);
        assert_eq!(outcome.rows[0].tmax_mean, Some(15.0));
        assert!(outcome.rows[1].is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_files_logged() -> Result<()> {
        let root = TempDir::new()?;
        write_source(root.path(), "Glenn", 2021, "date,PRCP\n2021-02-01,3.0\n");

        let outcome = AnnualSummarizer::new(&config(2020, 2022)).summarize(root.path(), None)?;

        assert_eq!(outcome.missing.missing_years("Glenn"), vec![2020, 2022]);
        assert!(!outcome.missing.contains("Glenn", 2021));
        Ok(())
    }

    #[test]
    fn test_unreadable_file_treated_as_missing() -> Result<()> {
        let root = TempDir::new()?;
        write_source(root.path(), "Colusa", 2020, "date,TMAX\n2020-01-01,10.0,extra\n");
        write_source(root.path(), "Colusa", 2021, "date,TMAX\n2021-01-01,11.0\n");

        let outcome = AnnualSummarizer::new(&config(2020, 2021)).summarize(root.path(), None)?;

        assert!(outcome.rows[0].is_empty());
        assert_eq!(outcome.rows[1].tmax_mean, Some(11.0));
        assert!(outcome.missing.contains("Colusa", 2020));
        assert_eq!(outcome.missing.unreadable_count(), 1);
        Ok(())
    }

    #[test]
    fn test_corrupted_tmax_keeps_other_metrics() -> Result<()> {
        let root = TempDir::new()?;
        write_source(
            root.path(),
            "Sutter",
            2020,
            "date,TMAX,TMIN,PRCP\n2020-01-01,12.0,2.0,1.0\n2020-01-02,oops,4.0,2.5\n",
        );

        let outcome = AnnualSummarizer::new(&config(2020, 2020)).summarize(root.path(), None)?;
        let row = &outcome.rows[0];

        assert_eq!(row.tmax_mean, None);
        assert_eq!(row.tmin_mean, Some(3.0));
        assert_eq!(row.prcp_total, Some(3.5));
        assert!(outcome.missing.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let result = AnnualSummarizer::new(&config(2020, 2020))
            .summarize(Path::new("/no/such/noaa/tree"), None);
        assert!(matches!(result, Err(ProcessingError::InputDirectory(_))));
    }

    #[test]
    fn test_root_without_counties_is_fatal() {
        let root = TempDir::new().unwrap();
        let result = AnnualSummarizer::new(&config(2020, 2020)).summarize(root.path(), None);
        assert!(matches!(result, Err(ProcessingError::MissingData(_))));
    }
}
