use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use car_service_api::{build_app, repository::InMemoryCarRepository, service::CarService};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing_test::traced_test;

fn create_test_app() -> Router {
    build_app(CarService::new(Arc::new(InMemoryCarRepository::new())))
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create_car(app: &Router) -> Value {
    let request = json_request(
        Method::POST,
        "/car-service",
        &json!({ "brand": "Volkswagen", "model": "Polo MPI", "modelYear": 2024 }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
#[traced_test]
async fn test_create_car_should_log_request_and_created_id() {
    let app = create_test_app();

    let created = create_car(&app).await;

    assert!(logs_contain("[car-service-api] Received create request for Volkswagen Polo MPI"));
    assert!(logs_contain(&format!(
        "[car-service-api] Created car Volkswagen Polo MPI with id: Some({})",
        created["id"]
    )));
}

#[tokio::test]
#[traced_test]
async fn test_get_unknown_car_should_log_not_found_warning() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/car-service/999999")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(logs_contain("Car not found with id: 999999"));
}

#[tokio::test]
#[traced_test]
async fn test_delete_unknown_car_should_log_translated_error() {
    let app = create_test_app();

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/car-service/31337")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(logs_contain("[car-service-api] Not found: No records found for this ID!"));
}

#[tokio::test]
#[traced_test]
async fn test_duplicate_id_create_should_log_unhandled_error() {
    let app = create_test_app();
    let created = create_car(&app).await;

    let request = json_request(
        Method::POST,
        "/car-service",
        &json!({ "id": created["id"], "brand": "Fiat", "model": "Argo", "modelYear": 2022 }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(logs_contain("Unhandled error: Car already exist with given ID"));
}
