//! Axum route handlers for the Dashboard API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::analytics::grouping::{
    salary_by_city, salary_by_experience, salary_by_role, AggregateGroup, ExperienceBand,
};
use crate::analytics::histogram::{bucketize, Bucket};
use crate::analytics::numeric::{self, Summary};
use crate::analytics::skills::SkillFit;
use crate::dashboard::filters::RecordFilter;
use crate::dashboard::insights::{compute_insights, MarketInsights};
use crate::dashboard::session::{ChartData, ChartKind, RenderSession};
use crate::errors::AppError;
use crate::models::payload::AnalysisPayload;
use crate::models::record::salaries;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Filter as it arrives in a query string or request body. `experience` is
/// parsed by hand so that a bad band becomes a validation error instead of a
/// bare rejection.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub role: Option<String>,
    pub country: Option<String>,
    pub experience: Option<String>,
}

impl FilterQuery {
    fn into_filter(self) -> Result<RecordFilter, AppError> {
        let experience = match self.experience.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<ExperienceBand>()
                    .map_err(|e| AppError::Validation(e.to_string()))?,
            ),
        };
        Ok(RecordFilter {
            role: self.role,
            country: self.country,
            experience,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub dataset_id: Uuid,
    pub total_records: usize,
    pub records_with_salary: usize,
    pub summary: Summary,
}

#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub dataset_id: Uuid,
    pub total_records: usize,
    pub distribution: Vec<Bucket>,
    pub by_experience: Vec<AggregateGroup>,
    pub top_cities: Vec<AggregateGroup>,
    pub top_roles: Vec<AggregateGroup>,
    pub charts: RenderSession,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InsightsRequest {
    pub filter: FilterQuery,
    /// Free-text skill list, any of `; , | /` as separators.
    pub user_skills: String,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub dataset_id: Uuid,
    pub insights: MarketInsights,
    pub fit: SkillFit,
    pub charts: RenderSession,
}

#[derive(Debug, Serialize)]
pub struct RenderedAnalysis {
    pub fit: SkillFit,
    pub charts: RenderSession,
    pub payload: AnalysisPayload,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/stats
///
/// Min / max / mean / median salary over the filtered records. Statistics are
/// `null` when no filtered record has a parsable salary.
pub async fn handle_stats(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let filter = query.into_filter()?;
    let dataset = state.dataset.read().await;
    let filtered = filter.apply(&dataset.records);
    let values = salaries(filtered.iter().copied());

    Ok(Json(StatsResponse {
        dataset_id: dataset.id,
        total_records: filtered.len(),
        records_with_salary: values.len(),
        summary: numeric::summarize(&values),
    }))
}

/// GET /api/v1/charts
///
/// Salary distribution, salary by experience band, and the top cities and
/// roles by average salary for the filtered records.
pub async fn handle_charts(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ChartsResponse>, AppError> {
    let filter = query.into_filter()?;
    let top_n = state.config.top_n.get();
    let dataset = state.dataset.read().await;
    let filtered = filter.apply(&dataset.records);

    let distribution = bucketize(
        &salaries(filtered.iter().copied()),
        state.config.histogram_buckets,
    );
    let by_experience = salary_by_experience(&filtered);
    let top_cities = salary_by_city(&filtered, top_n);
    let top_roles = salary_by_role(&filtered, top_n);

    let mut charts = RenderSession::new();
    charts.replace(
        ChartKind::SalaryDistribution,
        ChartData::from_buckets(&distribution),
    );
    charts.replace(
        ChartKind::SalaryByExperience,
        ChartData::from_groups(&by_experience),
    );
    charts.replace(ChartKind::TopCities, ChartData::from_groups(&top_cities));
    charts.replace(ChartKind::TopRoles, ChartData::from_groups(&top_roles));

    debug!(
        "Built {} charts over {} filtered records ({} salary bins)",
        charts.len(),
        filtered.len(),
        charts
            .get(ChartKind::SalaryDistribution)
            .map_or(0, |chart| chart.labels.len())
    );

    Ok(Json(ChartsResponse {
        dataset_id: dataset.id,
        total_records: filtered.len(),
        distribution,
        by_experience,
        top_cities,
        top_roles,
        charts,
    }))
}

/// POST /api/v1/insights
///
/// Market insights for the filtered records plus the user's fit against the
/// market's top skills. Remote demand figures override local ones when the
/// demand service answers; a failed lookup is logged and ignored.
pub async fn handle_insights(
    State(state): State<AppState>,
    Json(request): Json<InsightsRequest>,
) -> Result<Json<InsightsResponse>, AppError> {
    let filter = request.filter.into_filter()?;
    let (dataset_id, mut insights, role) = {
        let dataset = state.dataset.read().await;
        let filtered = filter.apply(&dataset.records);
        let insights = compute_insights(&filtered, &dataset.records, state.config.top_n.get());
        let role = filter
            .role
            .clone()
            .filter(|r| !r.trim().is_empty())
            .or_else(|| filtered.first().map(|r| r.role.clone()))
            .unwrap_or_default();
        (dataset.id, insights, role)
    };

    if !role.is_empty() {
        match state.demand.lookup(&role).await {
            Ok(demand) => insights.merge_demand(demand),
            Err(e) => warn!("Demand lookup for '{role}' failed: {e}"),
        }
    }

    let fit = insights.resume_fit(&request.user_skills);

    let mut charts = RenderSession::new();
    charts.replace(ChartKind::SkillMatch, ChartData::from_fit(&fit));

    Ok(Json(InsightsResponse {
        dataset_id,
        insights,
        fit,
        charts,
    }))
}

/// POST /api/v1/analysis/render
///
/// Accepts a payload from the remote resume-analysis service and returns the
/// re-derived skill fit and chart data for it.
pub async fn handle_render_analysis(
    Json(payload): Json<AnalysisPayload>,
) -> Json<RenderedAnalysis> {
    let fit = payload.skill_fit();

    let mut charts = RenderSession::new();
    charts.replace(
        ChartKind::SalaryDistribution,
        ChartData::from_distribution(&payload.salary_distribution),
    );
    charts.replace(ChartKind::SkillMatch, ChartData::from_fit(&fit));

    Json(RenderedAnalysis {
        fit,
        charts,
        payload,
    })
}
