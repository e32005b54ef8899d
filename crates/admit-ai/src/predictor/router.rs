use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::capability::form_fields;
use super::domain::Stream;
use super::gateway::{GatewayError, PredictionGateway};
use super::normalizer::ScoreSubmission;
use super::service::{PredictorError, PredictorService};
use super::session::{SessionError, SessionId, SessionStore};

/// Router builder exposing the exam catalogue, normalization, and prediction endpoints.
pub fn predictor_router<G, S>(service: Arc<PredictorService<G, S>>) -> Router
where
    G: PredictionGateway + 'static,
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/exams", get(list_exams_handler::<G, S>))
        .route("/api/v1/exams/:exam_id", get(exam_handler::<G, S>))
        .route("/api/v1/exams/:exam_id/fields", get(fields_handler::<G, S>))
        .route(
            "/api/v1/predictor/normalize",
            post(normalize_handler::<G, S>),
        )
        .route("/api/v1/predictor", post(predict_handler::<G, S>))
        .route("/api/v1/sessions", post(create_session_handler::<G, S>))
        .route(
            "/api/v1/sessions/:session_id",
            get(session_handler::<G, S>).delete(clear_session_handler::<G, S>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExamQuery {
    #[serde(default)]
    pub(crate) stream: Option<String>,
}

/// Prediction body: the score form plus an optional session to record against.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PredictBody {
    #[serde(default)]
    pub(crate) session_id: Option<String>,
    #[serde(flatten)]
    pub(crate) submission: ScoreSubmission,
}

pub(crate) async fn list_exams_handler<G, S>(
    State(service): State<Arc<PredictorService<G, S>>>,
    Query(query): Query<ExamQuery>,
) -> Response
where
    G: PredictionGateway + 'static,
    S: SessionStore + 'static,
{
    let registry = service.registry();
    match query.stream.as_deref() {
        None => (StatusCode::OK, axum::Json(registry.exams())).into_response(),
        Some(raw) => match Stream::parse(raw) {
            Some(stream) => {
                let exams = registry.exams_for_stream(stream);
                (StatusCode::OK, axum::Json(exams)).into_response()
            }
            None => {
                let payload = json!({
                    "error": format!("unknown stream '{raw}'"),
                });
                (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
            }
        },
    }
}

pub(crate) async fn exam_handler<G, S>(
    State(service): State<Arc<PredictorService<G, S>>>,
    Path(exam_id): Path<String>,
) -> Response
where
    G: PredictionGateway + 'static,
    S: SessionStore + 'static,
{
    match service.exam(&exam_id) {
        Ok(exam) => (StatusCode::OK, axum::Json(exam)).into_response(),
        Err(err) => error_response(err.into()),
    }
}

pub(crate) async fn fields_handler<G, S>(
    State(service): State<Arc<PredictorService<G, S>>>,
    Path(exam_id): Path<String>,
) -> Response
where
    G: PredictionGateway + 'static,
    S: SessionStore + 'static,
{
    match form_fields(service.registry(), &exam_id) {
        Some(form) => (StatusCode::OK, axum::Json(form)).into_response(),
        None => {
            let payload = json!({
                "error": format!("exam '{exam_id}' is not supported"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn normalize_handler<G, S>(
    State(service): State<Arc<PredictorService<G, S>>>,
    axum::Json(submission): axum::Json<ScoreSubmission>,
) -> Response
where
    G: PredictionGateway + 'static,
    S: SessionStore + 'static,
{
    match service.normalize(&submission) {
        Ok(score) => (StatusCode::OK, axum::Json(score)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn predict_handler<G, S>(
    State(service): State<Arc<PredictorService<G, S>>>,
    axum::Json(body): axum::Json<PredictBody>,
) -> Response
where
    G: PredictionGateway + 'static,
    S: SessionStore + 'static,
{
    let session_id = body.session_id.map(SessionId);
    match service.predict(session_id.as_ref(), &body.submission).await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_session_handler<G, S>(
    State(service): State<Arc<PredictorService<G, S>>>,
) -> Response
where
    G: PredictionGateway + 'static,
    S: SessionStore + 'static,
{
    match service.start_session() {
        Ok(session) => (StatusCode::CREATED, axum::Json(session)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<G, S>(
    State(service): State<Arc<PredictorService<G, S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    G: PredictionGateway + 'static,
    S: SessionStore + 'static,
{
    match service.session(&SessionId(session_id)) {
        Ok(session) => (StatusCode::OK, axum::Json(session)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn clear_session_handler<G, S>(
    State(service): State<Arc<PredictorService<G, S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    G: PredictionGateway + 'static,
    S: SessionStore + 'static,
{
    match service.clear_session(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_response(error: PredictorError) -> Response {
    let status = match &error {
        PredictorError::Lookup(_) => StatusCode::NOT_FOUND,
        PredictorError::Validation(validation) => {
            let payload = json!({
                "error": validation.to_string(),
                "field": validation.field(),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
        PredictorError::InFlight(_) | PredictorError::Session(SessionError::Conflict) => {
            StatusCode::CONFLICT
        }
        PredictorError::Session(SessionError::NotFound) => StatusCode::NOT_FOUND,
        PredictorError::Session(SessionError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        PredictorError::Gateway(GatewayError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
        PredictorError::Gateway(GatewayError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
        PredictorError::Gateway(GatewayError::Rejected { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        PredictorError::Gateway(_) => StatusCode::BAD_GATEWAY,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
