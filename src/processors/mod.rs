pub mod annual_summarizer;
pub mod climate_pipeline;
pub(crate) mod feature_matrix;
pub mod gap_imputer;
pub mod knn_imputer;
pub mod missing_data;

pub use annual_summarizer::{AnnualSummarizer, SummaryOutcome};
pub use climate_pipeline::{ClimatePipeline, PipelineReport};
pub use gap_imputer::{GapImputer, ImputationOutcome, ImputationReport, ImputedCell, MissingColumn};
pub use knn_imputer::{nan_euclidean_distance, KnnImputer};
pub use missing_data::{MissingDataLog, MissingReason, MissingYear};
