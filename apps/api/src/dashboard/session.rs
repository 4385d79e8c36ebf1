//! Render session. Owns the chart datasets built for one dashboard response.
//!
//! A session is created per request, filled through `replace`, and either
//! serialized or dropped. Replacing a chart hands back the displaced one;
//! `dispose` releases every chart at once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analytics::grouping::AggregateGroup;
use crate::analytics::histogram::Bucket;
use crate::analytics::skills::SkillFit;
use crate::models::payload::SalaryDistribution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    SalaryDistribution,
    SalaryByExperience,
    TopCities,
    TopRoles,
    SkillMatch,
}

/// Parallel label/value arrays, the shape chart widgets consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartData {
    pub fn from_buckets(buckets: &[Bucket]) -> Self {
        Self {
            labels: buckets.iter().map(|b| b.label.clone()).collect(),
            values: buckets.iter().map(|b| b.count as f64).collect(),
        }
    }

    /// Group averages, rounded to whole currency units for display.
    pub fn from_groups(groups: &[AggregateGroup]) -> Self {
        Self {
            labels: groups.iter().map(|g| g.key.clone()).collect(),
            values: groups.iter().map(|g| g.average.round()).collect(),
        }
    }

    pub fn from_distribution(distribution: &SalaryDistribution) -> Self {
        let (labels, values) = distribution
            .pairs()
            .map(|(label, count)| (label.to_string(), count as f64))
            .unzip();
        Self { labels, values }
    }

    /// Matched vs. missing counts for the doughnut chart.
    pub fn from_fit(fit: &SkillFit) -> Self {
        Self {
            labels: vec!["Matched".to_string(), "Missing".to_string()],
            values: vec![fit.matched.len() as f64, fit.missing.len() as f64],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RenderSession {
    charts: BTreeMap<ChartKind, ChartData>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `data` for `kind`, returning whatever chart it displaced.
    pub fn replace(&mut self, kind: ChartKind, data: ChartData) -> Option<ChartData> {
        self.charts.insert(kind, data)
    }

    pub fn get(&self, kind: ChartKind) -> Option<&ChartData> {
        self.charts.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Drops every chart held by the session.
    pub fn dispose(&mut self) {
        self.charts.clear();
    }
}
