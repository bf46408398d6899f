use super::common::*;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::dossier::router::{self, EvaluateRequest};
use crate::dossier::service::FeasibilityService;

#[tokio::test]
async fn submit_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(FeasibilityService::new(
        Arc::new(ConflictRepository),
        Arc::new(MemoryNotifier::default()),
        policy(),
    ));

    let response = router::submit_handler::<ConflictRepository, MemoryNotifier>(
        State(service),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn submit_handler_returns_unprocessable_for_intake_violation() {
    let service = Arc::new(FeasibilityService::new(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryNotifier::default()),
        policy(),
    ));

    let mut bad = submission();
    bad.property.purchase_price = Some(-1.0);
    let response = router::submit_handler::<MemoryRepository, MemoryNotifier>(
        State(service),
        axum::Json(bad),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(FeasibilityService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
        policy(),
    ));

    let response = router::submit_handler::<UnavailableRepository, MemoryNotifier>(
        State(service),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn evaluate_handler_returns_not_found_for_unknown_dossier() {
    let service = Arc::new(FeasibilityService::new(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryNotifier::default()),
        policy(),
    ));

    let response = router::evaluate_handler::<MemoryRepository, MemoryNotifier>(
        State(service),
        Path("dos-999999".to_string()),
        axum::Json(EvaluateRequest {
            evaluation_date: Some(eval_date()),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_route_accepts_payloads() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/dossiers")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&submission()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "submitted");
    assert_eq!(body["decision_rationale"], "pending evaluation");
}

#[tokio::test]
async fn evaluate_route_returns_the_itemized_verdict() {
    let (service, _, _) = build_service();
    let record = service.submit(submission()).expect("submission accepted");
    let id = record.snapshot.dossier_id.0.clone();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::post(format!("/api/v1/dossiers/{id}/evaluate"))
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({ "evaluation_date": "2025-06-30" })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["feasible"], true);
    assert!(body["criteria"].as_array().expect("itemized").len() >= 3);
    assert!(body["ratios"]["equity_total"].as_f64().expect("ratio") > 0.0);
}

#[tokio::test]
async fn simulation_route_is_stateless() {
    let (service, repository, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/simulations")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({
                        "dossier": submission(),
                        "evaluation_date": "2025-06-30",
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["feasible"], true);
    assert!(repository
        .records
        .lock()
        .expect("repository mutex poisoned")
        .is_empty());
}

#[tokio::test]
async fn status_route_reports_the_cached_rationale() {
    let (service, _, _) = build_service();
    let record = service
        .submit(blocked_submission())
        .expect("submission accepted");
    let id = record.snapshot.dossier_id.clone();
    service.evaluate(&id, eval_date()).expect("evaluates");
    let router = router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::get(format!("/api/v1/dossiers/{}", id.0))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "blocked");
    assert_eq!(body["feasible"], false);
    assert!(body["decision_rationale"]
        .as_str()
        .expect("rationale")
        .contains("debt-collection"));
}

#[tokio::test]
async fn amend_route_resets_the_dossier() {
    let (service, _, _) = build_service();
    let record = service.submit(submission()).expect("submission accepted");
    let id = record.snapshot.dossier_id.clone();
    service.evaluate(&id, eval_date()).expect("evaluates");
    let router = router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::put(format!("/api/v1/dossiers/{}", id.0))
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&submission()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "submitted");
    assert_eq!(body["decision_rationale"], "pending evaluation");
}
