use serde::{Deserialize, Serialize};

use crate::models::ClimateMetric;

/// One county-year of annual climate statistics.
///
/// Used both for the raw summarizer output and for the final gap-filled table;
/// `None` marks a value that is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualSummary {
    pub county: String,
    pub year: i32,
    pub tmax_mean: Option<f64>,
    pub tmin_mean: Option<f64>,
    pub prcp_total: Option<f64>,
}

impl AnnualSummary {
    pub fn new(
        county: String,
        year: i32,
        tmax_mean: Option<f64>,
        tmin_mean: Option<f64>,
        prcp_total: Option<f64>,
    ) -> Self {
        Self {
            county,
            year,
            tmax_mean,
            tmin_mean,
            prcp_total,
        }
    }

    /// Row for a county-year with no usable source data.
    pub fn missing(county: impl Into<String>, year: i32) -> Self {
        Self::new(county.into(), year, None, None, None)
    }

    pub fn get(&self, metric: ClimateMetric) -> Option<f64> {
        match metric {
            ClimateMetric::MaxTemperature => self.tmax_mean,
            ClimateMetric::MinTemperature => self.tmin_mean,
            ClimateMetric::Precipitation => self.prcp_total,
        }
    }

    pub fn set(&mut self, metric: ClimateMetric, value: Option<f64>) {
        match metric {
            ClimateMetric::MaxTemperature => self.tmax_mean = value,
            ClimateMetric::MinTemperature => self.tmin_mean = value,
            ClimateMetric::Precipitation => self.prcp_total = value,
        }
    }

    pub fn key(&self) -> (&str, i32) {
        (self.county.as_str(), self.year)
    }

    pub fn missing_count(&self) -> usize {
        ClimateMetric::ALL
            .iter()
            .filter(|metric| self.get(**metric).is_none())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_count() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.missing_count() == ClimateMetric::ALL.len()
    }
}
