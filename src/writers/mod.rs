pub mod csv_writer;
pub mod parquet_writer;

pub use csv_writer::CsvWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};

use crate::error::Result;
use crate::models::AnnualSummary;
use crate::utils::constants::PARQUET_EXTENSION;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    /// `.parquet` selects Parquet; any other extension is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case(PARQUET_EXTENSION) => OutputFormat::Parquet,
            _ => OutputFormat::Csv,
        }
    }
}

/// Write the feature table, creating the parent directory if needed.
pub fn write_table(records: &[AnnualSummary], path: &Path, compression: &str) -> Result<OutputFormat> {
    ensure_parent_dir(path)?;

    let format = OutputFormat::from_path(path);
    match format {
        OutputFormat::Parquet => {
            ParquetWriter::new()
                .with_compression(compression)?
                .write_records(records, path)?;
        }
        OutputFormat::Csv => CsvWriter::new().write_records(records, path)?,
    }

    info!("Wrote {} rows to {} ({:?})", records.len(), path.display(), format);
    Ok(format)
}

/// Read back a table produced by [`write_table`].
pub fn read_table(path: &Path) -> Result<Vec<AnnualSummary>> {
    match OutputFormat::from_path(path) {
        OutputFormat::Parquet => ParquetWriter::new().read_records(path),
        OutputFormat::Csv => CsvWriter::new().read_records(path),
    }
}

pub fn write_report_json<T: Serialize>(report: &T, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn records() -> Vec<AnnualSummary> {
        vec![
            AnnualSummary::new("Napa".to_string(), 2018, Some(23.4), Some(7.9), Some(640.0)),
            AnnualSummary::missing("Napa", 2019),
        ]
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out/a.parquet")), OutputFormat::Parquet);
        assert_eq!(OutputFormat::from_path(Path::new("out/a.PARQUET")), OutputFormat::Parquet);
        assert_eq!(OutputFormat::from_path(Path::new("out/a.csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("out/features")), OutputFormat::Csv);
    }

    #[test]
    fn test_write_table_creates_parent_dirs() -> Result<()> {
        let temp_dir = TempDir::new()?;

        for name in ["nested/deeper/features.csv", "nested/features.parquet"] {
            let path = temp_dir.path().join(name);
            write_table(&records(), &path, "snappy")?;
            assert!(path.exists());
            assert_eq!(read_table(&path)?, records());
        }
        Ok(())
    }

    #[test]
    fn test_write_report_json() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("reports/run.json");

        write_report_json(&records(), &path)?;

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(value[0]["county"], "Napa");
        assert!(value[1]["tmax_mean"].is_null());
        Ok(())
    }
}
