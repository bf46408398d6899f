use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{DossierId, DossierSubmission};
use super::repository::{DossierRepository, RepositoryError, VerdictNotifier};
use super::service::{FeasibilityService, ServiceError};

/// Router builder exposing HTTP endpoints for intake, evaluation, and the
/// stateless quick simulator.
pub fn dossier_router<R, N>(service: Arc<FeasibilityService<R, N>>) -> Router
where
    R: DossierRepository + 'static,
    N: VerdictNotifier + 'static,
{
    Router::new()
        .route("/api/v1/dossiers", post(submit_handler::<R, N>))
        .route(
            "/api/v1/dossiers/:dossier_id",
            get(status_handler::<R, N>).put(amend_handler::<R, N>),
        )
        .route(
            "/api/v1/dossiers/:dossier_id/evaluate",
            post(evaluate_handler::<R, N>),
        )
        .route("/api/v1/simulations", post(simulate_handler::<R, N>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EvaluateRequest {
    /// Snapshot date used to resolve tenure gates and year scoping.
    #[serde(default)]
    pub(crate) evaluation_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SimulationRequest {
    pub(crate) dossier: DossierSubmission,
    #[serde(default)]
    pub(crate) evaluation_date: Option<NaiveDate>,
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<FeasibilityService<R, N>>>,
    axum::Json(submission): axum::Json<DossierSubmission>,
) -> Response
where
    R: DossierRepository + 'static,
    N: VerdictNotifier + 'static,
{
    match service.submit(submission) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn amend_handler<R, N>(
    State(service): State<Arc<FeasibilityService<R, N>>>,
    Path(dossier_id): Path<String>,
    axum::Json(submission): axum::Json<DossierSubmission>,
) -> Response
where
    R: DossierRepository + 'static,
    N: VerdictNotifier + 'static,
{
    let id = DossierId(dossier_id);
    match service.amend(&id, submission) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluate_handler<R, N>(
    State(service): State<Arc<FeasibilityService<R, N>>>,
    Path(dossier_id): Path<String>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    R: DossierRepository + 'static,
    N: VerdictNotifier + 'static,
{
    let id = DossierId(dossier_id);
    let on = request
        .evaluation_date
        .unwrap_or_else(|| Local::now().date_naive());
    match service.evaluate(&id, on) {
        Ok(verdict) => (StatusCode::OK, axum::Json(verdict)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn simulate_handler<R, N>(
    State(service): State<Arc<FeasibilityService<R, N>>>,
    axum::Json(request): axum::Json<SimulationRequest>,
) -> Response
where
    R: DossierRepository + 'static,
    N: VerdictNotifier + 'static,
{
    let on = request
        .evaluation_date
        .unwrap_or_else(|| Local::now().date_naive());
    match service.simulate(request.dossier, on) {
        Ok(verdict) => (StatusCode::OK, axum::Json(verdict)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<FeasibilityService<R, N>>>,
    Path(dossier_id): Path<String>,
) -> Response
where
    R: DossierRepository + 'static,
    N: VerdictNotifier + 'static,
{
    let id = DossierId(dossier_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Repository(RepositoryError::Unavailable(_)) | ServiceError::Notify(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
