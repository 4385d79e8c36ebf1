use serde::{Deserialize, Serialize};

use crate::analytics::skills::{self, SkillSet};

/// Category used for records whose city is blank.
pub const UNKNOWN_CITY: &str = "Unknown";

/// One salary observation after ingestion has resolved field aliases.
///
/// Numeric fields the source could not parse are `None`; they are never
/// coerced to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    pub role: String,
    pub country: String,
    pub city: String,
    pub experience_years: Option<f64>,
    pub annual_salary: Option<f64>,
    pub top_skills: String,
    pub demand_score: f64,
    pub postings: f64,
}

impl SalaryRecord {
    /// City used for grouping; blank cities collapse into `"Unknown"`.
    pub fn city_key(&self) -> &str {
        if self.city.is_empty() {
            UNKNOWN_CITY
        } else {
            &self.city
        }
    }

    pub fn skills(&self) -> SkillSet {
        skills::normalize(&self.top_skills)
    }
}

/// Salaries that parsed, in record order.
pub fn salaries<'a, I>(records: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a SalaryRecord>,
{
    records.into_iter().filter_map(|r| r.annual_salary).collect()
}
