pub mod metric;
pub mod observation;
pub mod summary;

pub use metric::{Aggregation, ClimateMetric};
pub use observation::{AnnualStatistics, MetricAccumulator};
pub use summary::AnnualSummary;
