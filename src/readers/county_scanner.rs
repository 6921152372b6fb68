use crate::error::{ProcessingError, Result};
use crate::utils::filename::parse_source_file_name;
use serde::Serialize;
use std::ops::RangeInclusive;
use std::path::Path;

/// What one county directory holds relative to the configured window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CountyInventory {
    pub county: String,
    pub years_present: Vec<i32>,
    pub years_absent: Vec<i32>,
    /// Files that are not `{county}_{year}.csv` for a year in the window
    pub ignored_files: Vec<String>,
}

/// Discovers the county layout of an observation tree.
pub struct CountyScanner;

impl CountyScanner {
    /// County names: the subdirectories of `root`, sorted by name.
    pub fn discover_counties(root: &Path) -> Result<Vec<String>> {
        if !root.is_dir() {
            return Err(ProcessingError::InputDirectory(root.to_path_buf()));
        }

        let mut counties = Vec::new();
        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => counties.push(name.to_string()),
                None => tracing::warn!(
                    "Skipping county directory with non UTF-8 name: {}",
                    entry.path().display()
                ),
            }
        }

        counties.sort();
        Ok(counties)
    }

    /// List which years of the window have a source file for `county`.
    pub fn inventory(
        root: &Path,
        county: &str,
        years: RangeInclusive<i32>,
    ) -> Result<CountyInventory> {
        let county_dir = root.join(county);
        let mut inventory = CountyInventory {
            county: county.to_string(),
            ..CountyInventory::default()
        };

        let mut found = Vec::new();
        for entry in std::fs::read_dir(&county_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            match parse_source_file_name(&file_name) {
                Some((name, year)) if name == county && years.contains(&year) => {
                    found.push(year)
                }
                _ => inventory.ignored_files.push(file_name),
            }
        }

        found.sort_unstable();
        found.dedup();
        inventory.years_absent = years.filter(|y| found.binary_search(y).is_err()).collect();
        inventory.years_present = found;
        inventory.ignored_files.sort();

        Ok(inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_counties_sorted_and_dirs_only() -> Result<()> {
        let root = TempDir::new()?;
        fs::create_dir(root.path().join("Tulare"))?;
        fs::create_dir(root.path().join("Butte"))?;
        fs::create_dir(root.path().join("San_Joaquin"))?;
        fs::write(root.path().join("README.txt"), "not a county")?;

        let counties = CountyScanner::discover_counties(root.path())?;
        assert_eq!(counties, vec!["Butte", "San_Joaquin", "Tulare"]);
        Ok(())
    }

    #[test]
    fn test_discover_missing_root_is_error() {
        let result = CountyScanner::discover_counties(Path::new("/no/such/climate/root"));
        assert!(matches!(result, Err(ProcessingError::InputDirectory(_))));
    }

    #[test]
    fn test_inventory() -> Result<()> {
        let root = TempDir::new()?;
        let county_dir = root.path().join("Kings");
        fs::create_dir(&county_dir)?;
        fs::write(county_dir.join("Kings_2020.csv"), "date,TMAX\n")?;
        fs::write(county_dir.join("Kings_2022.csv"), "date,TMAX\n")?;
        fs::write(county_dir.join("Kings_2009.csv"), "date,TMAX\n")?;
        fs::write(county_dir.join("Kern_2021.csv"), "date,TMAX\n")?;
        fs::write(county_dir.join("notes.md"), "")?;

        let inventory = CountyScanner::inventory(root.path(), "Kings", 2020..=2022)?;

        assert_eq!(inventory.years_present, vec![2020, 2022]);
        assert_eq!(inventory.years_absent, vec![2021]);
        assert_eq!(
            inventory.ignored_files,
            vec!["Kern_2021.csv", "Kings_2009.csv", "notes.md"]
        );
        Ok(())
    }
}
