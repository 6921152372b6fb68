use crate::error::Result;
use crate::models::AnnualSummary;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the annual feature table as CSV.
///
/// Columns: county, year, tmax_mean, tmin_mean, prcp_total. Missing values are
/// empty fields.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_records(&self, records: &[AnnualSummary], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(records, file)
    }

    pub fn write_to<W: Write>(&self, records: &[AnnualSummary], sink: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(sink);

        // serde only emits a header with the first record
        if records.is_empty() {
            writer.write_record(["county", "year", "tmax_mean", "tmin_mean", "prcp_total"])?;
        }
        for record in records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn read_records(&self, path: &Path) -> Result<Vec<AnnualSummary>> {
        let mut reader = csv::Reader::from_path(path)?;
        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<AnnualSummary>, csv::Error>>()?;
        Ok(records)
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
