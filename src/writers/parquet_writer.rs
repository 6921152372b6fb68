use crate::error::{ProcessingError, Result};
use crate::models::AnnualSummary;
use crate::utils::constants::DEFAULT_ROW_GROUP_SIZE;
use arrow::array::{Array, ArrayRef, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            "snappy" => Compression::SNAPPY,
            "gzip" => Compression::GZIP(GzipLevel::default()),
            "lz4" => Compression::LZ4,
            "zstd" => Compression::ZSTD(ZstdLevel::default()),
            "none" => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    /// Write the annual feature table; missing values become nulls.
    pub fn write_records(&self, records: &[AnnualSummary], path: &Path) -> Result<()> {
        let schema = Self::create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        for chunk in records.chunks(self.row_group_size) {
            let batch = Self::records_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }
        writer.close()?;

        Ok(())
    }

    fn create_schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("county", DataType::Utf8, false),
            Field::new("year", DataType::Int32, false),
            Field::new("tmax_mean", DataType::Float64, true),
            Field::new("tmin_mean", DataType::Float64, true),
            Field::new("prcp_total", DataType::Float64, true),
        ]))
    }

    fn records_to_batch(records: &[AnnualSummary], schema: Arc<Schema>) -> Result<RecordBatch> {
        let counties: Vec<&str> = records.iter().map(|r| r.county.as_str()).collect();
        let years: Vec<i32> = records.iter().map(|r| r.year).collect();
        let tmax: Vec<Option<f64>> = records.iter().map(|r| r.tmax_mean).collect();
        let tmin: Vec<Option<f64>> = records.iter().map(|r| r.tmin_mean).collect();
        let prcp: Vec<Option<f64>> = records.iter().map(|r| r.prcp_total).collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(counties)),
            Arc::new(Int32Array::from(years)),
            Arc::new(Float64Array::from(tmax)),
            Arc::new(Float64Array::from(tmin)),
            Arc::new(Float64Array::from(prcp)),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Read a table written by [`write_records`](Self::write_records).
    pub fn read_records(&self, path: &Path) -> Result<Vec<AnnualSummary>> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut records = Vec::new();
        for batch_result in reader {
            let batch = batch_result?;

            let counties = downcast::<StringArray>(&batch, 0, "county")?;
            let years = downcast::<Int32Array>(&batch, 1, "year")?;
            let tmax = downcast::<Float64Array>(&batch, 2, "tmax_mean")?;
            let tmin = downcast::<Float64Array>(&batch, 3, "tmin_mean")?;
            let prcp = downcast::<Float64Array>(&batch, 4, "prcp_total")?;

            for i in 0..batch.num_rows() {
                records.push(AnnualSummary::new(
                    counties.value(i).to_string(),
                    years.value(i),
                    nullable(tmax, i),
                    nullable(tmin, i),
                    nullable(prcp, i),
                ));
            }
        }

        Ok(records)
    }

    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        Ok(ParquetFileInfo {
            total_rows: metadata.file_metadata().num_rows(),
            row_groups: metadata.num_row_groups(),
            file_size: std::fs::metadata(path)?.len(),
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn downcast<'a, T: 'static>(batch: &'a RecordBatch, index: usize, name: &str) -> Result<&'a T> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid {} column type", name)))
}

fn nullable(array: &Float64Array, index: usize) -> Option<f64> {
    if array.is_null(index) {
        None
    } else {
        Some(array.value(index))
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_records() -> Vec<AnnualSummary> {
        vec![
            AnnualSummary::new("Stanislaus".to_string(), 2016, Some(24.9), Some(8.7), Some(330.2)),
            AnnualSummary::new("Stanislaus".to_string(), 2017, Some(25.3), None, Some(510.0)),
            AnnualSummary::missing("Tehama", 2016),
        ]
    }

    #[test]
    fn test_write_and_read_back_with_nulls() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let writer = ParquetWriter::new();

        writer.write_records(&sample_records(), temp_file.path())?;
        let back = writer.read_records(temp_file.path())?;

        assert_eq!(back, sample_records());
        Ok(())
    }

    #[test]
    fn test_file_info() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let writer = ParquetWriter::new().with_row_group_size(2);

        writer.write_records(&sample_records(), temp_file.path())?;
        let info = writer.get_file_info(temp_file.path())?;

        assert_eq!(info.total_rows, 3);
        assert_eq!(info.row_groups, 2);
        assert!(info.summary().contains("Total rows: 3"));
        Ok(())
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        for compression in ["snappy", "gzip", "lz4", "zstd", "none"] {
            let writer = ParquetWriter::new().with_compression(compression)?;
            let temp_file = NamedTempFile::new()?;

            let result = writer.write_records(&sample_records(), temp_file.path());
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }
        Ok(())
    }

    #[test]
    fn test_unknown_compression() {
        assert!(ParquetWriter::new().with_compression("rar").is_err());
    }
}
