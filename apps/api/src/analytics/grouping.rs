//! Grouped aggregation: experience bands, cities and roles.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analytics::numeric;
use crate::models::record::SalaryRecord;

/// Values collected under one key, with their count and arithmetic mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateGroup {
    pub key: String,
    pub values: Vec<f64>,
    pub average: f64,
    pub count: usize,
}

/// Groups `records` by `key_fn` and aggregates `value_fn` per group.
///
/// Groups come back in first-encountered order. A record whose value is
/// `None` is left out entirely; a key seen only on such records yields no group.
pub fn group_by<R, K, V>(records: &[R], key_fn: K, value_fn: V) -> Vec<AggregateGroup>
where
    K: Fn(&R) -> String,
    V: Fn(&R) -> Option<f64>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<f64>)> = Vec::new();

    for record in records {
        let Some(value) = value_fn(record) else {
            continue;
        };
        let key = key_fn(record);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            buckets.push((key, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(value);
    }

    buckets
        .into_iter()
        .filter_map(|(key, values)| {
            let average = numeric::mean(&values)?;
            Some(AggregateGroup {
                key,
                count: values.len(),
                values,
                average,
            })
        })
        .collect()
}

/// Sorts groups by descending average and keeps the first `n`.
///
/// The sort is stable, so equal averages keep first-encountered order.
pub fn top_by_average(mut groups: Vec<AggregateGroup>, n: usize) -> Vec<AggregateGroup> {
    groups.sort_by(|a, b| b.average.total_cmp(&a.average));
    groups.truncate(n);
    groups
}

// ────────────────────────────────────────────────────────────────────────────
// Experience bands
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceBand {
    #[serde(rename = "0-1")]
    UpToOne,
    #[serde(rename = "1-3")]
    OneToThree,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "5+")]
    OverFive,
    Unknown,
}

impl ExperienceBand {
    /// `yrs <= 1`, `(1, 3]`, `(3, 5]`, `> 5`; unparsable years are `Unknown`.
    pub fn classify(years: Option<f64>) -> Self {
        match years {
            None => ExperienceBand::Unknown,
            Some(y) if y <= 1.0 => ExperienceBand::UpToOne,
            Some(y) if y <= 3.0 => ExperienceBand::OneToThree,
            Some(y) if y <= 5.0 => ExperienceBand::ThreeToFive,
            Some(_) => ExperienceBand::OverFive,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExperienceBand::UpToOne => "0-1",
            ExperienceBand::OneToThree => "1-3",
            ExperienceBand::ThreeToFive => "3-5",
            ExperienceBand::OverFive => "5+",
            ExperienceBand::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ExperienceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBand(pub String);

impl fmt::Display for UnknownBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown experience band '{}' (expected 0-1, 1-3, 3-5, 5+ or Unknown)",
            self.0
        )
    }
}

impl std::error::Error for UnknownBand {}

impl FromStr for ExperienceBand {
    type Err = UnknownBand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0-1" => Ok(ExperienceBand::UpToOne),
            "1-3" => Ok(ExperienceBand::OneToThree),
            "3-5" => Ok(ExperienceBand::ThreeToFive),
            // `+` decodes to a space in query strings and is then trimmed away
            "5+" | "5" => Ok(ExperienceBand::OverFive),
            s if s.eq_ignore_ascii_case("unknown") => Ok(ExperienceBand::Unknown),
            other => Err(UnknownBand(other.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Salary views
// ────────────────────────────────────────────────────────────────────────────

/// Average salary per experience band, bands ordered lexicographically by label.
pub fn salary_by_experience(records: &[&SalaryRecord]) -> Vec<AggregateGroup> {
    let mut groups = group_by(
        records,
        |r| ExperienceBand::classify(r.experience_years).label().to_string(),
        |r| r.annual_salary,
    );
    groups.sort_by(|a, b| a.key.cmp(&b.key));
    groups
}

/// Top `n` cities by average salary. Blank cities count as `"Unknown"`.
pub fn salary_by_city(records: &[&SalaryRecord], n: usize) -> Vec<AggregateGroup> {
    let groups = group_by(records, |r| r.city_key().to_string(), |r| r.annual_salary);
    top_by_average(groups, n)
}

/// Top `n` roles by average salary. Blank roles are skipped.
pub fn salary_by_role(records: &[&SalaryRecord], n: usize) -> Vec<AggregateGroup> {
    let groups = group_by(
        records,
        |r| r.role.clone(),
        |r| r.annual_salary.filter(|_| !r.role.is_empty()),
    );
    top_by_average(groups, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str, years: Option<f64>, salary: Option<f64>) -> SalaryRecord {
        SalaryRecord {
            role: "Data Analyst".to_string(),
            city: city.to_string(),
            experience_years: years,
            annual_salary: salary,
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_band_boundaries() {
        assert_eq!(ExperienceBand::classify(Some(0.0)), ExperienceBand::UpToOne);
        assert_eq!(ExperienceBand::classify(Some(1.0)), ExperienceBand::UpToOne);
        assert_eq!(ExperienceBand::classify(Some(1.01)), ExperienceBand::OneToThree);
        assert_eq!(ExperienceBand::classify(Some(3.0)), ExperienceBand::OneToThree);
        assert_eq!(ExperienceBand::classify(Some(5.0)), ExperienceBand::ThreeToFive);
        assert_eq!(ExperienceBand::classify(Some(5.5)), ExperienceBand::OverFive);
        assert_eq!(ExperienceBand::classify(None), ExperienceBand::Unknown);
    }

    #[test]
    fn test_band_parses_from_label() {
        for band in [
            ExperienceBand::UpToOne,
            ExperienceBand::OneToThree,
            ExperienceBand::ThreeToFive,
            ExperienceBand::OverFive,
            ExperienceBand::Unknown,
        ] {
            assert_eq!(band.label().parse::<ExperienceBand>(), Ok(band));
        }
        assert_eq!("5 ".parse::<ExperienceBand>(), Ok(ExperienceBand::OverFive));
        assert_eq!("unknown".parse::<ExperienceBand>(), Ok(ExperienceBand::Unknown));
        assert!("2-4".parse::<ExperienceBand>().is_err());
    }

    #[test]
    fn test_one_record_per_experience_band() {
        let records = vec![
            record("A", Some(6.0), Some(2_000_000.0)),
            record("B", Some(0.5), Some(300_000.0)),
            record("C", Some(4.0), Some(1_100_000.0)),
            record("D", Some(2.0), Some(600_000.0)),
        ];
        let refs: Vec<&SalaryRecord> = records.iter().collect();

        let groups = salary_by_experience(&refs);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["0-1", "1-3", "3-5", "5+"]);
        for group in &groups {
            assert_eq!(group.count, 1);
            assert_eq!(group.average, group.values[0]);
        }
        assert_eq!(groups[0].average, 300_000.0);
        assert_eq!(groups[3].average, 2_000_000.0);
    }

    #[test]
    fn test_unparsable_experience_is_unknown_band() {
        let records = vec![record("A", None, Some(500_000.0)), record("A", Some(2.0), Some(1.0))];
        let refs: Vec<&SalaryRecord> = records.iter().collect();
        let groups = salary_by_experience(&refs);
        assert_eq!(groups.last().map(|g| g.key.as_str()), Some("Unknown"));
    }

    #[test]
    fn test_unparsable_values_are_excluded_not_zeroed() {
        let records = vec![
            record("Pune", Some(2.0), Some(800_000.0)),
            record("Pune", Some(2.0), None),
            record("Delhi", Some(2.0), None),
        ];
        let groups = group_by(&records, |r| r.city.clone(), |r| r.annual_salary);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "Pune");
        assert_eq!(groups[0].count, 1);
        assert_eq!(groups[0].average, 800_000.0);
    }

    #[test]
    fn test_group_by_preserves_first_encounter_order() {
        let records = vec![
            record("Mumbai", None, Some(1.0)),
            record("Chennai", None, Some(2.0)),
            record("Mumbai", None, Some(3.0)),
        ];
        let groups = group_by(&records, |r| r.city.clone(), |r| r.annual_salary);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Mumbai", "Chennai"]);
        assert_eq!(groups[0].values, vec![1.0, 3.0]);
        assert_eq!(groups[0].average, 2.0);
    }

    #[test]
    fn test_city_ranking_truncates_and_breaks_ties_stably() {
        let records = vec![
            record("Pune", None, Some(500.0)),
            record("", None, Some(900.0)),
            record("Delhi", None, Some(700.0)),
            record("Chennai", None, Some(700.0)),
            record("Kochi", None, Some(100.0)),
        ];
        let refs: Vec<&SalaryRecord> = records.iter().collect();

        let top = salary_by_city(&refs, 3);
        let keys: Vec<&str> = top.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Unknown", "Delhi", "Chennai"]);
    }

    #[test]
    fn test_role_ranking_skips_blank_roles() {
        let mut blank = record("Pune", None, Some(5_000_000.0));
        blank.role.clear();
        let mut engineer = record("Pune", None, Some(1_500_000.0));
        engineer.role = "Data Engineer".to_string();
        let records = vec![blank, record("Pune", None, Some(700_000.0)), engineer];
        let refs: Vec<&SalaryRecord> = records.iter().collect();

        let top = salary_by_role(&refs, 8);
        let keys: Vec<&str> = top.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Data Engineer", "Data Analyst"]);
    }
}
