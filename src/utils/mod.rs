pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{parse_source_file_name, source_file_name, source_file_path};
pub use progress::ProgressReporter;
