//! Market insights over a filtered record set, and resume fit against them.

use serde::{Deserialize, Serialize};

use crate::analytics::numeric::{self, Summary};
use crate::analytics::skills::{self, match_fit, SkillFit, SkillSet};
use crate::models::record::{salaries, SalaryRecord};

/// Everything the insight cards show for one filtered view of the dataset.
#[derive(Debug, Clone, Serialize)]
pub struct MarketInsights {
    /// Every filtered record, including those without a parsable salary.
    pub total_records: usize,
    pub salary: Summary,
    pub postings: f64,
    /// Mean demand score across filtered records; `None` when nothing matched.
    pub avg_demand_score: Option<f64>,
    pub top_skills: SkillSet,
    pub global_min: Option<f64>,
    pub global_max: Option<f64>,
}

/// Market demand as reported by the remote job-demand service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDemand {
    pub count: Option<f64>,
    #[serde(rename = "avgScore", alias = "avg_score")]
    pub avg_score: Option<f64>,
}

pub fn compute_insights(
    filtered: &[&SalaryRecord],
    all: &[SalaryRecord],
    top_n: usize,
) -> MarketInsights {
    let filtered_salaries = salaries(filtered.iter().copied());
    let all_salaries = salaries(all);

    let demand_scores: Vec<f64> = filtered.iter().map(|r| r.demand_score).collect();
    let skill_sets: Vec<SkillSet> = filtered.iter().map(|r| r.skills()).collect();

    MarketInsights {
        total_records: filtered.len(),
        salary: numeric::summarize(&filtered_salaries),
        postings: filtered.iter().map(|r| r.postings).sum(),
        avg_demand_score: numeric::mean(&demand_scores),
        top_skills: skills::top_skills(&skill_sets, top_n),
        global_min: numeric::min(&all_salaries),
        global_max: numeric::max(&all_salaries),
    }
}

impl MarketInsights {
    /// Remote figures win over locally aggregated ones when the service has them.
    pub fn merge_demand(&mut self, demand: Option<JobDemand>) {
        let Some(demand) = demand else {
            return;
        };
        if let Some(count) = demand.count.filter(|c| *c > 0.0) {
            self.postings = count;
        }
        if let Some(score) = demand.avg_score.filter(|s| *s > 0.0) {
            self.avg_demand_score = Some(score);
        }
    }

    /// Fit of a user's raw skill list against the market's top skills.
    pub fn resume_fit(&self, user_skills: &str) -> SkillFit {
        match_fit(&self.top_skills, &skills::normalize(user_skills))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(salary: Option<f64>, skills: &str, demand: f64, postings: f64) -> SalaryRecord {
        SalaryRecord {
            role: "Data Analyst".to_string(),
            annual_salary: salary,
            top_skills: skills.to_string(),
            demand_score: demand,
            postings,
            ..Default::default()
        }
    }

    fn dataset() -> Vec<SalaryRecord> {
        vec![
            record(Some(400000.0), "Python; SQL", 60.0, 10.0),
            record(None, "sql, excel", 80.0, 5.0),
            record(Some(800000.0), "SQL|Tableau", 70.0, 0.0),
            record(Some(2000000.0), "spark", 90.0, 1.0),
        ]
    }

    #[test]
    fn test_unparsable_salary_counts_in_total_only() {
        let all = dataset();
        let filtered: Vec<&SalaryRecord> = all.iter().take(3).collect();

        let insights = compute_insights(&filtered, &all, 8);
        assert_eq!(insights.total_records, 3);
        assert_eq!(insights.salary.min, Some(400000.0));
        assert_eq!(insights.salary.max, Some(800000.0));
        assert_eq!(insights.salary.mean, Some(600000.0));
        assert_eq!(insights.salary.median, Some(600000.0));
    }

    #[test]
    fn test_global_bounds_use_whole_dataset() {
        let all = dataset();
        let filtered: Vec<&SalaryRecord> = all.iter().take(1).collect();

        let insights = compute_insights(&filtered, &all, 8);
        assert_eq!(insights.global_min, Some(400000.0));
        assert_eq!(insights.global_max, Some(2000000.0));
    }

    #[test]
    fn test_postings_and_demand() {
        let all = dataset();
        let filtered: Vec<&SalaryRecord> = all.iter().take(3).collect();

        let insights = compute_insights(&filtered, &all, 8);
        assert_eq!(insights.postings, 15.0);
        assert_eq!(insights.avg_demand_score, Some(70.0));
    }

    #[test]
    fn test_top_skills_by_frequency() {
        let all = dataset();
        let filtered: Vec<&SalaryRecord> = all.iter().collect();

        let insights = compute_insights(&filtered, &all, 3);
        assert_eq!(
            insights.top_skills.iter().collect::<Vec<_>>(),
            vec!["sql", "python", "excel"]
        );
    }

    #[test]
    fn test_empty_filter_is_unavailable_not_zero() {
        let all = dataset();
        let insights = compute_insights(&[], &all, 8);
        assert_eq!(insights.total_records, 0);
        assert_eq!(insights.salary, Summary::default());
        assert_eq!(insights.avg_demand_score, None);
        assert!(insights.top_skills.is_empty());
        assert_eq!(insights.resume_fit("python").score, None);
    }

    #[test]
    fn test_resume_fit_against_top_skills() {
        let all = dataset();
        let filtered: Vec<&SalaryRecord> = all.iter().collect();

        let insights = compute_insights(&filtered, &all, 3);
        let fit = insights.resume_fit("SQL / Excel");
        assert_eq!(fit.score, Some(67));
        assert_eq!(fit.matched, vec!["sql", "excel"]);
        assert_eq!(fit.missing, vec!["python"]);
    }

    #[test]
    fn test_remote_demand_overrides_local() {
        let all = dataset();
        let filtered: Vec<&SalaryRecord> = all.iter().collect();
        let mut insights = compute_insights(&filtered, &all, 8);

        insights.merge_demand(Some(JobDemand {
            count: Some(240.0),
            avg_score: None,
        }));
        assert_eq!(insights.postings, 240.0);
        assert_eq!(insights.avg_demand_score, Some(75.0));

        insights.merge_demand(None);
        assert_eq!(insights.postings, 240.0);
    }

    #[test]
    fn test_job_demand_accepts_both_spellings() {
        let a: JobDemand = serde_json::from_str(r#"{"count": 12, "avgScore": 81}"#).unwrap();
        let b: JobDemand = serde_json::from_str(r#"{"avg_score": 81}"#).unwrap();
        assert_eq!(a.avg_score, Some(81.0));
        assert_eq!(b.avg_score, Some(81.0));
        assert_eq!(b.count, None);
    }
}
