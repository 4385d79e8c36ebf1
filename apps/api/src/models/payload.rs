//! Shape of the remote resume-analysis payload.
//!
//! The analysis service is opaque; this module only models what it returns and
//! re-derives skill fit with the same formula the local engine uses. Every
//! field tolerates being absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analytics::histogram::Bucket;
use crate::analytics::skills::{match_fit, SkillFit, SkillSet};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisPayload {
    /// Applicant-tracking-system compatibility, 0 – 100.
    pub ats: Option<f64>,
    pub salary_range: SalaryRange,
    pub salary_distribution: SalaryDistribution,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub required_skills: Vec<String>,
    pub demand_score: Option<f64>,
    pub jobs: Vec<JobPosting>,
    pub ai_plan: LearningPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_raw: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub median: Option<f64>,
    pub max: Option<f64>,
}

/// Histogram in the payload's parallel-array form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryDistribution {
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
}

impl SalaryDistribution {
    pub fn from_buckets(buckets: &[Bucket]) -> Self {
        Self {
            labels: buckets.iter().map(|b| b.label.clone()).collect(),
            counts: buckets.iter().map(|b| b.count as u64).collect(),
        }
    }

    /// Label/count pairs. Extra labels or counts without a partner are dropped.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, u64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningPlan {
    pub priority: Vec<String>,
    pub roadmap: BTreeMap<String, RoadmapItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadmapItem {
    pub steps: Vec<String>,
    pub resources: Vec<String>,
}

impl AnalysisPayload {
    /// Fit of the payload's matched skills against its required skills.
    ///
    /// Uses `match_fit`, so a remote payload and a local computation over the
    /// same skills always agree on score, matched and missing. Payloads that
    /// leave `required_skills` empty are scored against matched + missing.
    pub fn skill_fit(&self) -> SkillFit {
        let required = if self.required_skills.is_empty() {
            SkillSet::from_tokens(self.matched_skills.iter().chain(&self.missing_skills))
        } else {
            SkillSet::from_tokens(&self.required_skills)
        };
        let matched = SkillSet::from_tokens(&self.matched_skills);
        match_fit(&required, &matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    use crate::analytics::histogram::bucketize;

    const PAYLOAD: &str = r#"{
        "ats": 72,
        "salary_range": {"min": 300000, "median": 600000, "max": 1200000},
        "salary_distribution": {"labels": ["₹3-5L", "₹5-7L", "₹7-9L"], "counts": [2, 6, 5]},
        "matched_skills": ["Python", "sql"],
        "missing_skills": ["excel"],
        "required_skills": ["python", "SQL", "Excel"],
        "demand_score": 64,
        "jobs": [{"title": "Data Analyst", "company": "Acme", "location": "Pune"}],
        "ai_plan": {
            "priority": ["excel"],
            "roadmap": {"excel": {"steps": ["Learn basics"], "resources": ["https://coursera.org"]}}
        }
    }"#;

    #[test]
    fn test_payload_deserializes() {
        let payload: AnalysisPayload = serde_json::from_str(PAYLOAD).unwrap();
        assert_eq!(payload.ats, Some(72.0));
        assert_eq!(payload.salary_range.median, Some(600000.0));
        assert_eq!(payload.jobs[0].company, "Acme");
        assert!(payload.jobs[0].description.is_none());
        assert_eq!(payload.ai_plan.roadmap["excel"].steps, vec!["Learn basics"]);
    }

    #[test]
    fn test_missing_fields_default() {
        let payload: AnalysisPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.ats.is_none());
        assert!(payload.jobs.is_empty());
        assert!(payload.salary_distribution.labels.is_empty());
        assert_eq!(payload.salary_range, SalaryRange::default());
    }

    #[test]
    fn test_skill_fit_matches_local_formula() {
        let payload: AnalysisPayload = serde_json::from_str(PAYLOAD).unwrap();
        let fit = payload.skill_fit();
        assert_eq!(fit.score, Some(67));
        assert_eq!(fit.matched, vec!["python", "sql"]);
        assert_eq!(fit.missing, vec!["excel"]);
    }

    #[test]
    fn test_skill_fit_falls_back_to_matched_and_missing() {
        let payload = AnalysisPayload {
            matched_skills: vec!["python".to_string()],
            missing_skills: vec!["sql".to_string(), "excel".to_string()],
            ..Default::default()
        };
        let fit = payload.skill_fit();
        assert_eq!(fit.score, Some(33));
        assert_eq!(fit.missing, vec!["sql", "excel"]);
    }

    #[test]
    fn test_skill_fit_without_any_skills_is_unavailable() {
        assert_eq!(AnalysisPayload::default().skill_fit().score, None);
    }

    #[test]
    fn test_distribution_from_local_buckets() {
        let buckets = bucketize(&[10.0, 20.0, 30.0], NonZeroUsize::new(2).unwrap());
        let dist = SalaryDistribution::from_buckets(&buckets);
        assert_eq!(dist.labels, vec!["₹10 - ₹20", "₹20 - ₹30"]);
        assert_eq!(dist.counts, vec![1, 2]);
    }

    #[test]
    fn test_distribution_pairs_drop_unpartnered_entries() {
        let dist = SalaryDistribution {
            labels: vec!["a".to_string(), "b".to_string()],
            counts: vec![3],
        };
        assert_eq!(dist.pairs().collect::<Vec<_>>(), vec![("a", 3)]);
    }
}
