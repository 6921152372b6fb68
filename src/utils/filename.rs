use std::path::{Path, PathBuf};

use crate::utils::constants::SOURCE_FILE_EXTENSION;

/// Path of a county-year observation file: `{root}/{county}/{county}_{year}.csv`
pub fn source_file_path(root: &Path, county: &str, year: i32) -> PathBuf {
    root.join(county).join(source_file_name(county, year))
}

pub fn source_file_name(county: &str, year: i32) -> String {
    format!("{}_{}.{}", county, year, SOURCE_FILE_EXTENSION)
}

/// Split `{county}_{year}.csv` back into its parts.
///
/// County names may themselves contain underscores (`San_Joaquin_2015.csv`), so
/// the year is taken from the last underscore.
pub fn parse_source_file_name(file_name: &str) -> Option<(String, i32)> {
    let stem = file_name.strip_suffix(&format!(".{}", SOURCE_FILE_EXTENSION))?;
    let (county, year) = stem.rsplit_once('_')?;
    if county.is_empty() {
        return None;
    }
    let year = year.parse::<i32>().ok()?;
    Some((county.to_string(), year))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_path() {
        let path = source_file_path(Path::new("data/raw"), "Fresno", 2014);
        assert_eq!(path, PathBuf::from("data/raw/Fresno/Fresno_2014.csv"));
    }

    #[test]
    fn test_parse_source_file_name() {
        assert_eq!(
            parse_source_file_name("Fresno_2014.csv"),
            Some(("Fresno".to_string(), 2014))
        );
        assert_eq!(
            parse_source_file_name("San_Joaquin_2010.csv"),
            Some(("San_Joaquin".to_string(), 2010))
        );
    }

    #[test]
    fn test_parse_rejects_other_files() {
        assert_eq!(parse_source_file_name("Fresno_2014.txt"), None);
        assert_eq!(parse_source_file_name("Fresno.csv"), None);
        assert_eq!(parse_source_file_name("_2014.csv"), None);
        assert_eq!(parse_source_file_name("Fresno_latest.csv"), None);
    }
}
