use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::export::{ExportError, ExportType, RespondentFilter};
use crate::instruments::{
    EmotionalIntelligenceDraft, LearningStyleDraft, SensoryPreferenceDraft,
};

use super::domain::{RespondentId, SessionId};
use super::progress::{InProgressAttempt, ProgressError, ProgressStore};
use super::registration::RegistrationForm;
use super::repository::{AssessmentRepository, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError};

/// Answers for one instrument, submitted on behalf of a respondent.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionRequest<A> {
    pub respondent_id: String,
    pub answers: A,
}

/// Router builder exposing registration, submission, progress and admin endpoints.
pub fn assessment_router<R, P>(service: Arc<AssessmentService<R, P>>) -> Router
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    Router::new()
        .route("/api/v1/respondents", post(register_handler::<R, P>))
        .route(
            "/api/v1/sessions/:session_id/vak",
            post(learning_style_handler::<R, P>),
        )
        .route(
            "/api/v1/sessions/:session_id/ei",
            post(emotional_intelligence_handler::<R, P>),
        )
        .route(
            "/api/v1/sessions/:session_id/rep-system",
            post(sensory_preference_handler::<R, P>),
        )
        .route(
            "/api/v1/sessions/:session_id/progress",
            get(load_progress_handler::<R, P>)
                .put(save_progress_handler::<R, P>)
                .delete(clear_progress_handler::<R, P>),
        )
        .route(
            "/api/v1/sessions/:session_id/completion",
            get(completion_handler::<R, P>),
        )
        .route(
            "/api/v1/sessions/:session_id/results",
            get(results_handler::<R, P>),
        )
        .route("/api/v1/admin/stats", get(stats_handler::<R, P>))
        .route(
            "/api/v1/admin/export/:export_type",
            get(export_handler::<R, P>),
        )
        .with_state(service)
}

pub(crate) async fn register_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    axum::Json(form): axum::Json<RegistrationForm>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    match service.register(form) {
        Ok(registration) => {
            let payload = json!({
                "respondent_id": registration.respondent.id,
                "session_id": registration.session.id,
                "session_token": registration.session.token,
                "completion": registration.session.completion(),
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn learning_style_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<SubmissionRequest<LearningStyleDraft>>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    let respondent_id = RespondentId(request.respondent_id);
    let session_id = SessionId(session_id);
    match service.submit_learning_style(&respondent_id, &session_id, &request.answers) {
        Ok(result) => submitted(&service, &session_id, json!(result)),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn emotional_intelligence_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<SubmissionRequest<EmotionalIntelligenceDraft>>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    let respondent_id = RespondentId(request.respondent_id);
    let session_id = SessionId(session_id);
    match service.submit_emotional_intelligence(&respondent_id, &session_id, &request.answers) {
        Ok(result) => submitted(&service, &session_id, json!(result)),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn sensory_preference_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<SubmissionRequest<SensoryPreferenceDraft>>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    let respondent_id = RespondentId(request.respondent_id);
    let session_id = SessionId(session_id);
    match service.submit_sensory_preference(&respondent_id, &session_id, &request.answers) {
        Ok(result) => submitted(&service, &session_id, json!(result)),
        Err(error) => error_response(error),
    }
}

fn submitted<R, P>(
    service: &AssessmentService<R, P>,
    session_id: &SessionId,
    result: serde_json::Value,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    match service.completion(session_id) {
        Ok(completion) => {
            let payload = json!({
                "session_id": session_id,
                "result": result,
                "completion": completion,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn load_progress_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    let session_id = SessionId(session_id);
    match service.load_progress(&session_id) {
        Ok(Some(attempt)) => (StatusCode::OK, axum::Json(attempt)).into_response(),
        Ok(None) => {
            let payload = json!({
                "session_id": session_id,
                "error": "no saved progress",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_progress_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
    axum::Json(attempt): axum::Json<InProgressAttempt>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    let session_id = SessionId(session_id);
    match service.save_progress(&session_id, &attempt) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn clear_progress_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    match service.clear_progress(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn completion_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    match service.completion(&SessionId(session_id)) {
        Ok(completion) => (StatusCode::OK, axum::Json(completion)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn results_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    match service.results(&SessionId(session_id)) {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stats_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Query(filter): Query<RespondentFilter>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    match service.dashboard_stats(&filter) {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(export_type): Path<String>,
    Query(filter): Query<RespondentFilter>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    let export_type = match export_type.parse::<ExportType>() {
        Ok(export_type) => export_type,
        Err(error) => return error_response(error.into()),
    };

    match service.export(export_type, &filter, Utc::now().date_naive()) {
        Ok(file) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file.filename),
                ),
            ],
            file.content,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: AssessmentServiceError) -> Response {
    let (status, payload) = match &error {
        AssessmentServiceError::Validation(failure) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": failure.to_string(),
                "instrument": failure.instrument(),
            }),
        ),
        AssessmentServiceError::Registration(failure) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": "registration is invalid",
                "fields": failure.fields,
            }),
        ),
        AssessmentServiceError::AlreadySubmitted { instrument } => (
            StatusCode::CONFLICT,
            json!({
                "error": error.to_string(),
                "instrument": instrument,
            }),
        ),
        AssessmentServiceError::SessionMismatch => (
            StatusCode::FORBIDDEN,
            json!({ "error": error.to_string() }),
        ),
        AssessmentServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            json!({ "error": "session not found" }),
        ),
        AssessmentServiceError::Repository(RepositoryError::Conflict) => (
            StatusCode::CONFLICT,
            json!({ "error": "record already exists" }),
        ),
        AssessmentServiceError::Progress(ProgressError::InvalidKey(_)) => (
            StatusCode::BAD_REQUEST,
            json!({ "error": error.to_string() }),
        ),
        AssessmentServiceError::Export(ExportError::Empty { export_type }) => (
            StatusCode::NOT_FOUND,
            json!({
                "error": "no data to export",
                "detail": "current filters resulted in no data",
                "export_type": export_type,
            }),
        ),
        AssessmentServiceError::Export(ExportError::UnknownType(_)) => (
            StatusCode::BAD_REQUEST,
            json!({ "error": error.to_string() }),
        ),
        AssessmentServiceError::Repository(_)
        | AssessmentServiceError::Progress(_)
        | AssessmentServiceError::Export(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": error.to_string() }),
        ),
    };

    (status, axum::Json(payload)).into_response()
}
