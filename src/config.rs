//! Run configuration shared by the summarizer and the imputer.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `CLIMATE_FEATURES_*` environment variables. The CLI applies its own
//! overrides on top and calls [`PipelineConfig::validated`] before any work starts.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

use crate::error::Result;
use crate::models::ClimateMetric;
use crate::utils::constants::{
    DEFAULT_END_YEAR, DEFAULT_INPUT_DIR, DEFAULT_NEIGHBORS, DEFAULT_OUTPUT_FILE,
    COMPRESSION_SNAPPY, DEFAULT_START_YEAR, ENV_PREFIX, SUPPORTED_COMPRESSIONS,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_year_range"))]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,

    pub start_year: i32,
    pub end_year: i32,

    #[validate(length(min = 1))]
    pub metrics: Vec<ClimateMetric>,

    #[validate(range(min = 1))]
    pub neighbors: usize,

    #[validate(range(min = 1))]
    pub max_workers: usize,

    #[validate(custom(function = "validate_compression"))]
    pub compression: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            metrics: ClimateMetric::ALL.to_vec(),
            neighbors: DEFAULT_NEIGHBORS,
            max_workers: num_cpus::get(),
            compression: COMPRESSION_SNAPPY.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load defaults, an optional config file and environment overrides.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let loaded: PipelineConfig = settings.try_deserialize()?;
        Ok(loaded)
    }

    pub fn with_years(mut self, start_year: i32, end_year: i32) -> Self {
        self.start_year = start_year;
        self.end_year = end_year;
        self
    }

    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<ClimateMetric>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_input_dir(mut self, input_dir: impl Into<PathBuf>) -> Self {
        self.input_dir = input_dir.into();
        self
    }

    /// Run the validator rules and hand the config back.
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    pub fn year_count(&self) -> usize {
        self.years().count()
    }
}

fn validate_year_range(config: &PipelineConfig) -> std::result::Result<(), ValidationError> {
    if config.start_year > config.end_year {
        let mut error = ValidationError::new("year_range");
        error.message = Some(
            format!(
                "start_year {} is after end_year {}",
                config.start_year, config.end_year
            )
            .into(),
        );
        return Err(error);
    }
    Ok(())
}

fn validate_compression(compression: &str) -> std::result::Result<(), ValidationError> {
    if SUPPORTED_COMPRESSIONS.contains(&compression.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("unsupported_compression"))
    }
}
