use crate::error::{ProcessingError, Result};
use crate::models::{AnnualStatistics, ClimateMetric, MetricAccumulator};
use crate::utils::constants::{DATE_COLUMN, NULL_TOKENS};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Reads one county-year daily observation CSV and reduces it to annual values.
///
/// Column failures are isolated: a non-numeric cell disables only the metric it
/// belongs to. Structural problems (unreadable file, missing header, ragged
/// rows) fail the whole file.
pub struct ObservationReader {
    metrics: Vec<ClimateMetric>,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self {
            metrics: ClimateMetric::ALL.to_vec(),
        }
    }

    pub fn with_metrics(metrics: &[ClimateMetric]) -> Self {
        Self {
            metrics: metrics.to_vec(),
        }
    }

    /// Read a `{county}_{year}.csv` file and compute its annual statistics.
    pub fn read_annual_statistics(&self, path: &Path, year: i32) -> Result<AnnualStatistics> {
        let file = File::open(path)?;
        let stats = self.summarize_reader(file, year)?;

        for metric in &stats.rejected_metrics {
            warn!(
                "{}: non-numeric {} value, {} left missing",
                path.display(),
                metric.source_column(),
                metric.output_column()
            );
        }
        if stats.out_of_year_days > 0 {
            warn!(
                "{}: {} observation(s) dated outside {}",
                path.display(),
                stats.out_of_year_days,
                year
            );
        }

        Ok(stats)
    }

    /// Reduce CSV content from any reader.
    pub fn summarize_reader<R: Read>(&self, source: R, year: i32) -> Result<AnnualStatistics> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(Trim::All)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ProcessingError::InvalidFormat(
                "file has no header row".to_string(),
            ));
        }

        let date_index = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(DATE_COLUMN));
        let metric_columns = self.locate_metric_columns(&headers);

        let mut accumulators: Vec<MetricAccumulator> =
            vec![MetricAccumulator::new(); metric_columns.len()];
        let mut stats = AnnualStatistics::default();

        let mut record = StringRecord::new();
        while reader.read_record(&mut record)? {
            stats.observation_days += 1;

            if let Some(index) = date_index {
                self.observe_date(record.get(index).unwrap_or(""), year, &mut stats);
            }

            for ((_, index), acc) in metric_columns.iter().zip(accumulators.iter_mut()) {
                let raw = record.get(*index).unwrap_or("");
                match parse_cell(raw) {
                    Cell::Empty => {}
                    Cell::Value(value) => acc.push(value),
                    Cell::Invalid => acc.reject(raw),
                }
            }
        }

        for ((metric, _), acc) in metric_columns.iter().zip(&accumulators) {
            if let Some(raw) = acc.rejected_value() {
                debug!("{} column rejected at value '{}'", metric.source_column(), raw);
                stats.rejected_metrics.push(*metric);
            }
            stats.set(*metric, acc.finish(metric.aggregation()));
        }

        Ok(stats)
    }

    /// First header for each configured metric, in metric order.
    fn locate_metric_columns(&self, headers: &StringRecord) -> Vec<(ClimateMetric, usize)> {
        let mut located: Vec<(ClimateMetric, usize)> = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            match ClimateMetric::from_source_column(header) {
                Some(metric)
                    if self.metrics.contains(&metric)
                        && !located.iter().any(|(m, _)| *m == metric) =>
                {
                    located.push((metric, index))
                }
                _ => {}
            }
        }
        located.sort();
        located
    }

    fn observe_date(&self, raw: &str, year: i32, stats: &mut AnnualStatistics) {
        match parse_observation_date(raw) {
            Some(date) => {
                if date.year() != year {
                    stats.out_of_year_days += 1;
                }
                stats.observe_date(date);
            }
            None => debug!("Unparseable observation date '{}'", raw),
        }
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell {
    Empty,
    Value(f64),
    Invalid,
}

fn parse_cell(raw: &str) -> Cell {
    if NULL_TOKENS.contains(&raw) {
        return Cell::Empty;
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Cell::Value(value),
        Ok(_) => Cell::Empty,
        Err(_) => Cell::Invalid,
    }
}

/// Accepts `2020-01-01` and the `2020-01-01T00:00:00` form the NOAA API returns.
pub fn parse_observation_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}
