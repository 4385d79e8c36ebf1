use serde::{Deserialize, Serialize};

use crate::analytics::grouping::ExperienceBand;
use crate::models::record::SalaryRecord;

/// Role / country / experience filter applied before any statistic is computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub role: Option<String>,
    pub country: Option<String>,
    pub experience: Option<ExperienceBand>,
}

impl RecordFilter {
    pub fn matches(&self, record: &SalaryRecord) -> bool {
        if let Some(role) = non_empty(&self.role) {
            if record.role != role {
                return false;
            }
        }
        if let Some(country) = non_empty(&self.country) {
            if record.country != country {
                return false;
            }
        }
        match (self.experience, record.experience_years) {
            (None, _) => true,
            (Some(ExperienceBand::Unknown), years) => years.is_none(),
            // Records without parsable experience are not filtered out by a concrete band.
            (Some(_), None) => true,
            (Some(band), years) => ExperienceBand::classify(years) == band,
        }
    }

    pub fn apply<'a>(&self, records: &'a [SalaryRecord]) -> Vec<&'a SalaryRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Distinct, sorted, non-empty values for the filter dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub roles: Vec<String>,
    pub countries: Vec<String>,
    pub experience_bands: Vec<ExperienceBand>,
}

pub fn filter_options(records: &[SalaryRecord]) -> FilterOptions {
    FilterOptions {
        roles: distinct_sorted(records.iter().map(|r| r.role.as_str())),
        countries: distinct_sorted(records.iter().map(|r| r.country.as_str())),
        experience_bands: vec![
            ExperienceBand::UpToOne,
            ExperienceBand::OneToThree,
            ExperienceBand::ThreeToFive,
            ExperienceBand::OverFive,
        ],
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = values
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    out.sort();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(role: &str, country: &str, years: Option<f64>) -> SalaryRecord {
        SalaryRecord {
            role: role.to_string(),
            country: country.to_string(),
            experience_years: years,
            annual_salary: Some(100.0),
            ..Default::default()
        }
    }

    fn sample() -> Vec<SalaryRecord> {
        vec![
            record("Data Analyst", "India", Some(0.5)),
            record("Data Analyst", "India", Some(4.0)),
            record("Data Engineer", "UAE", Some(2.0)),
            record("Data Analyst", "UAE", None),
        ]
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let records = sample();
        assert_eq!(RecordFilter::default().apply(&records).len(), 4);
    }

    #[test]
    fn test_role_and_country_are_exact_matches() {
        let records = sample();
        let filter = RecordFilter {
            role: Some("Data Analyst".to_string()),
            country: Some("UAE".to_string()),
            ..Default::default()
        };
        let kept = filter.apply(&records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].experience_years, None);
    }

    #[test]
    fn test_blank_strings_mean_no_filter() {
        let records = sample();
        let filter = RecordFilter {
            role: Some("  ".to_string()),
            country: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&records).len(), 4);
    }

    #[test]
    fn test_band_filter_keeps_unknown_experience() {
        let records = sample();
        let filter = RecordFilter {
            experience: Some(ExperienceBand::ThreeToFive),
            ..Default::default()
        };
        let kept = filter.apply(&records);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].experience_years, Some(4.0));
        assert_eq!(kept[1].experience_years, None);
    }

    #[test]
    fn test_unknown_band_selects_only_unparsable_experience() {
        let records = sample();
        let filter = RecordFilter {
            experience: Some(ExperienceBand::Unknown),
            ..Default::default()
        };
        let kept = filter.apply(&records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].country, "UAE");
    }

    #[test]
    fn test_filter_options_are_distinct_and_sorted() {
        let mut records = sample();
        records.push(record("", "", None));
        let options = filter_options(&records);
        assert_eq!(options.roles, vec!["Data Analyst", "Data Engineer"]);
        assert_eq!(options.countries, vec!["India", "UAE"]);
    }
}
