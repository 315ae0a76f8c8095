pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

use axum::{middleware, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use handlers::{car, health};
use service::CarService;

/// Routes, error-detail middleware and HTTP layers around `service`.
pub fn build_app(service: CarService) -> Router {
    Router::new()
        .nest("/car-service", car::router())
        .merge(health::router())
        .layer(middleware::from_fn(error::describe_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}
