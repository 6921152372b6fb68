use serde::{Deserialize, Serialize};

/// How daily values of a metric reduce to one annual value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aggregation {
    Mean,
    Sum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClimateMetric {
    #[serde(rename = "TMAX")]
    MaxTemperature,
    #[serde(rename = "TMIN")]
    MinTemperature,
    #[serde(rename = "PRCP")]
    Precipitation,
}

impl ClimateMetric {
    /// Every metric, in output column order.
    pub const ALL: [ClimateMetric; 3] = [
        ClimateMetric::MaxTemperature,
        ClimateMetric::MinTemperature,
        ClimateMetric::Precipitation,
    ];

    pub fn from_source_column(name: &str) -> Option<Self> {
        match name {
            "TMAX" => Some(ClimateMetric::MaxTemperature),
            "TMIN" => Some(ClimateMetric::MinTemperature),
            "PRCP" => Some(ClimateMetric::Precipitation),
            _ => None,
        }
    }

    /// Column name in the daily observation files.
    pub fn source_column(&self) -> &'static str {
        match self {
            ClimateMetric::MaxTemperature => "TMAX",
            ClimateMetric::MinTemperature => "TMIN",
            ClimateMetric::Precipitation => "PRCP",
        }
    }

    /// Column name in the annual feature table.
    pub fn output_column(&self) -> &'static str {
        match self {
            ClimateMetric::MaxTemperature => "tmax_mean",
            ClimateMetric::MinTemperature => "tmin_mean",
            ClimateMetric::Precipitation => "prcp_total",
        }
    }

    pub fn aggregation(&self) -> Aggregation {
        match self {
            ClimateMetric::MaxTemperature | ClimateMetric::MinTemperature => Aggregation::Mean,
            ClimateMetric::Precipitation => Aggregation::Sum,
        }
    }
}

impl std::fmt::Display for ClimateMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.output_column())
    }
}
