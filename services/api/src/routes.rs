use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use scorecard::appraisal::{
    appraisal_router, AppraisalService, PerformanceRepository, RecommendationOutcome,
    YearlySummary,
};
use scorecard::error::AppError;
use scorecard::scoring::{
    LowPerformerVerdict, PeriodScore, ScoringEngine, SubjectId, SubmissionRecord,
};

use crate::infra::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ReportDomain {
    #[default]
    Employee,
    Seo,
}

impl ReportDomain {
    fn engine(self) -> ScoringEngine {
        match self {
            ReportDomain::Employee => {
                ScoringEngine::new(scorecard::scoring::EngineConfig::employee())
            }
            ReportDomain::Seo => ScoringEngine::new(scorecard::scoring::EngineConfig::seo()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct YearlyReportRequest {
    #[serde(default)]
    pub(crate) domain: ReportDomain,
    pub(crate) submissions: Vec<SubjectSubmission>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubjectSubmission {
    pub(crate) subject: SubjectId,
    #[serde(flatten)]
    pub(crate) submission: SubmissionRecord,
}

#[derive(Debug, Serialize)]
pub(crate) struct YearlyReportResponse {
    pub(crate) domain: ReportDomain,
    pub(crate) subjects: Vec<SubjectReport>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectReport {
    pub(crate) subject: SubjectId,
    pub(crate) summary: YearlySummary,
    pub(crate) recommendations: RecommendationOutcome,
    pub(crate) low_performer: LowPerformerVerdict,
}

pub(crate) fn with_scorecard_routes<R>(service: Arc<AppraisalService<R>>) -> axum::Router
where
    R: PerformanceRepository + 'static,
{
    appraisal_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/reports/yearly",
            axum::routing::post(yearly_report_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Stateless report computation: score the submitted records in memory and
/// fold them into per-subject summaries without touching the repository.
pub(crate) async fn yearly_report_endpoint(
    Json(payload): Json<YearlyReportRequest>,
) -> Result<Json<YearlyReportResponse>, AppError> {
    let YearlyReportRequest {
        domain,
        submissions,
    } = payload;

    let engine = domain.engine();
    let mut by_subject: BTreeMap<SubjectId, Vec<PeriodScore>> = BTreeMap::new();

    for entry in submissions {
        let score = engine
            .score_period(entry.subject.clone(), &entry.submission)
            .map_err(scorecard::appraisal::AppraisalServiceError::from)?;
        by_subject.entry(entry.subject).or_default().push(score);
    }

    let mut subjects = Vec::new();
    for (subject, mut periods) in by_subject {
        periods.sort_by(|a, b| a.period.cmp(&b.period));
        let Some(summary) = YearlySummary::from_periods(&periods, engine.config()) else {
            continue;
        };
        let recommendations = RecommendationOutcome::from_summary(&summary, engine.config());
        let low_performer = engine.low_performer(&periods);
        subjects.push(SubjectReport {
            subject,
            summary,
            recommendations,
            low_performer,
        });
    }

    Ok(Json(YearlyReportResponse { domain, subjects }))
}
