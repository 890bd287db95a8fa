use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::scoring::adapter::SubmissionRecord;
use crate::scoring::domain::{PeriodKey, SubjectId};

use super::record::{AppraisalError, AppraisalId};
use super::repository::{PerformanceRepository, RepositoryError};
use super::service::{AppraisalService, AppraisalServiceError};

/// Router builder exposing HTTP endpoints for period scoring and appraisal
/// management.
pub fn appraisal_router<R>(service: Arc<AppraisalService<R>>) -> Router
where
    R: PerformanceRepository + 'static,
{
    Router::new()
        .route("/api/v1/periods", post(submit_period_handler::<R>))
        .route(
            "/api/v1/subjects/:subject_id/summary",
            get(summary_handler::<R>),
        )
        .route(
            "/api/v1/subjects/:subject_id/low-performer",
            get(low_performer_handler::<R>),
        )
        .route("/api/v1/appraisals", post(create_appraisal_handler::<R>))
        .route(
            "/api/v1/appraisals/:appraisal_id",
            get(appraisal_handler::<R>),
        )
        .route(
            "/api/v1/appraisals/:appraisal_id/finalize",
            post(finalize_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PeriodSubmissionRequest {
    pub(crate) subject: SubjectId,
    #[serde(flatten)]
    pub(crate) submission: SubmissionRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateAppraisalRequest {
    pub(crate) subject: SubjectId,
    pub(crate) period_start: PeriodKey,
    pub(crate) period_end: PeriodKey,
    #[serde(default)]
    pub(crate) note: Option<String>,
}

pub(crate) async fn submit_period_handler<R>(
    State(service): State<Arc<AppraisalService<R>>>,
    axum::Json(request): axum::Json<PeriodSubmissionRequest>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    match service.submit_period(request.subject, &request.submission) {
        Ok(score) => (StatusCode::ACCEPTED, axum::Json(score)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<AppraisalService<R>>>,
    Path(subject_id): Path<String>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    let subject = SubjectId(subject_id);
    match service.subject_report(&subject) {
        Ok(Some((summary, recommendations))) => (
            StatusCode::OK,
            axum::Json(json!({
                "summary": summary,
                "recommendations": recommendations,
            })),
        )
            .into_response(),
        // Not an error: the subject simply has nothing scored yet.
        Ok(None) => (
            StatusCode::OK,
            axum::Json(json!({
                "subject": subject.0,
                "status": "insufficient_data",
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn low_performer_handler<R>(
    State(service): State<Arc<AppraisalService<R>>>,
    Path(subject_id): Path<String>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    let subject = SubjectId(subject_id);
    match service.low_performer(&subject) {
        Ok(verdict) => (StatusCode::OK, axum::Json(verdict)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_appraisal_handler<R>(
    State(service): State<Arc<AppraisalService<R>>>,
    axum::Json(request): axum::Json<CreateAppraisalRequest>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    match service.build_appraisal(
        request.subject,
        request.period_start,
        request.period_end,
        request.note,
    ) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn appraisal_handler<R>(
    State(service): State<Arc<AppraisalService<R>>>,
    Path(appraisal_id): Path<String>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    let id = AppraisalId(appraisal_id);
    match service.get_appraisal(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn finalize_handler<R>(
    State(service): State<Arc<AppraisalService<R>>>,
    Path(appraisal_id): Path<String>,
) -> Response
where
    R: PerformanceRepository + 'static,
{
    let id = AppraisalId(appraisal_id);
    match service.finalize(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AppraisalServiceError) -> Response {
    let status = match &error {
        AppraisalServiceError::Submission(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppraisalServiceError::Appraisal(appraisal) => match appraisal {
            AppraisalError::EmptyPeriodRange { .. } | AppraisalError::InvertedRange { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppraisalError::Finalized(_) | AppraisalError::AlreadyFinalized(_) => {
                StatusCode::CONFLICT
            }
        },
        AppraisalServiceError::Repository(repository) => match repository {
            RepositoryError::NotFound => StatusCode::NOT_FOUND,
            RepositoryError::Conflict => StatusCode::CONFLICT,
            RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
