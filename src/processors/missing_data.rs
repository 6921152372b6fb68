use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "cause")]
pub enum MissingReason {
    NoSourceFile,
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingYear {
    pub year: i32,
    pub reason: MissingReason,
}

/// County-years for which no usable source data existed, grouped by county.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MissingDataLog {
    counties: BTreeMap<String, Vec<MissingYear>>,
}

impl MissingDataLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, county: &str, year: i32, reason: MissingReason) {
        self.counties
            .entry(county.to_string())
            .or_default()
            .push(MissingYear { year, reason });
    }

    pub fn is_empty(&self) -> bool {
        self.counties.is_empty()
    }

    /// Total missing county-years.
    pub fn len(&self) -> usize {
        self.counties.values().map(Vec::len).sum()
    }

    pub fn county_count(&self) -> usize {
        self.counties.len()
    }

    pub fn missing_years(&self, county: &str) -> Vec<i32> {
        self.counties
            .get(county)
            .map(|entries| entries.iter().map(|e| e.year).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, county: &str, year: i32) -> bool {
        self.counties
            .get(county)
            .is_some_and(|entries| entries.iter().any(|e| e.year == year))
    }

    pub fn unreadable_count(&self) -> usize {
        self.counties
            .values()
            .flatten()
            .filter(|e| matches!(e.reason, MissingReason::Unreadable(_)))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<MissingYear>)> {
        self.counties.iter()
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Missing Data Report ===\n");
        summary.push_str(&format!(
            "Missing county-years: {} across {} counties\n",
            self.len(),
            self.county_count()
        ));
        summary.push_str(&format!("Unreadable files: {}\n", self.unreadable_count()));

        for (county, entries) in &self.counties {
            let years: Vec<String> = entries.iter().map(|e| e.year.to_string()).collect();
            summary.push_str(&format!(
                "  {}: missing {} years ({})\n",
                county,
                entries.len(),
                years.join(", ")
            ));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_query() {
        let mut log = MissingDataLog::new();
        log.record("Tulare", 2012, MissingReason::NoSourceFile);
        log.record("Butte", 2020, MissingReason::Unreadable("bad header".to_string()));
        log.record("Tulare", 2013, MissingReason::NoSourceFile);

        assert_eq!(log.len(), 3);
        assert_eq!(log.county_count(), 2);
        assert_eq!(log.missing_years("Tulare"), vec![2012, 2013]);
        assert!(log.missing_years("Kern").is_empty());
        assert!(log.contains("Butte", 2020));
        assert!(!log.contains("Butte", 2021));
        assert_eq!(log.unreadable_count(), 1);
    }

    #[test]
    fn test_summary_lists_counties_in_name_order() {
        let mut log = MissingDataLog::new();
        log.record("Tulare", 2012, MissingReason::NoSourceFile);
        log.record("Butte", 2020, MissingReason::NoSourceFile);

        let summary = log.generate_summary();
        let butte = summary.find("Butte: missing 1 years (2020)").unwrap();
        let tulare = summary.find("Tulare: missing 1 years (2012)").unwrap();
        assert!(butte < tulare);
    }

    #[test]
    fn test_serializes_reasons() {
        let mut log = MissingDataLog::new();
        log.record("Kern", 2011, MissingReason::Unreadable("truncated".to_string()));

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(
            json["counties"]["Kern"][0]["reason"]["kind"],
            serde_json::json!("Unreadable")
        );
        assert_eq!(
            json["counties"]["Kern"][0]["reason"]["cause"],
            serde_json::json!("truncated")
        );
    }
}
