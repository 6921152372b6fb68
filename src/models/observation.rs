use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Aggregation, AnnualSummary, ClimateMetric};

/// Running state for one metric column of a daily observation file.
#[derive(Debug, Clone, Default)]
pub struct MetricAccumulator {
    sum: f64,
    count: usize,
    rejected: Option<String>,
}

impl MetricAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Marks the whole column unusable. Only the first offending value is kept.
    pub fn reject(&mut self, raw_value: &str) {
        if self.rejected.is_none() {
            self.rejected = Some(raw_value.to_string());
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected.is_some()
    }

    pub fn rejected_value(&self) -> Option<&str> {
        self.rejected.as_deref()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Annual value for a column present in the file.
    ///
    /// A rejected column is `None`. With no numeric cells a mean is `None`
    /// while a sum is `0.0`.
    pub fn finish(&self, aggregation: Aggregation) -> Option<f64> {
        if self.is_rejected() {
            return None;
        }

        match aggregation {
            Aggregation::Mean if self.count == 0 => None,
            Aggregation::Mean => Some(self.sum / self.count as f64),
            Aggregation::Sum => Some(self.sum),
        }
    }
}

/// Reduced contents of one `{county}_{year}.csv` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualStatistics {
    pub observation_days: usize,
    pub out_of_year_days: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub tmax_mean: Option<f64>,
    pub tmin_mean: Option<f64>,
    pub prcp_total: Option<f64>,
    /// Metrics whose column held a non-numeric value.
    pub rejected_metrics: Vec<ClimateMetric>,
}

impl AnnualStatistics {
    pub fn set(&mut self, metric: ClimateMetric, value: Option<f64>) {
        match metric {
            ClimateMetric::MaxTemperature => self.tmax_mean = value,
            ClimateMetric::MinTemperature => self.tmin_mean = value,
            ClimateMetric::Precipitation => self.prcp_total = value,
        }
    }

    pub fn observe_date(&mut self, date: NaiveDate) {
        self.first_date = Some(self.first_date.map_or(date, |d| d.min(date)));
        self.last_date = Some(self.last_date.map_or(date, |d| d.max(date)));
    }

    pub fn into_summary(self, county: &str, year: i32) -> AnnualSummary {
        AnnualSummary::new(
            county.to_string(),
            year,
            self.tmax_mean,
            self.tmin_mean,
            self.prcp_total,
        )
    }
}
