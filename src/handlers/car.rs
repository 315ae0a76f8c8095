use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use validator::Validate;

use crate::constants::API_NAME;
use crate::error::AppError;
use crate::extract::{CarJson, IdPath};
use crate::models::Car;
use crate::service::CarService;

pub fn router() -> Router<CarService> {
    Router::new()
        .route("/", get(find_all).post(create).put(update))
        .route("/{id}", get(find_by_id).delete(delete))
}

async fn find_all(State(service): State<CarService>) -> Result<CarJson<Vec<Car>>, AppError> {
    Ok(CarJson(service.find_all().await?))
}

async fn find_by_id(
    State(service): State<CarService>,
    IdPath(id): IdPath<i64>,
) -> Result<Response, AppError> {
    match service.get_by_id(id).await {
        Ok(car) => Ok(CarJson(car).into_response()),
        Err(AppError::NotFound(_)) => {
            tracing::warn!("{} Car not found with id: {}", API_NAME, id);
            Ok(StatusCode::NOT_FOUND.into_response())
        }
        Err(e) => Err(e),
    }
}

/// Responds 200 rather than 201; a taken id is left to the error translator.
async fn create(
    State(service): State<CarService>,
    CarJson(car): CarJson<Car>,
) -> Result<CarJson<Car>, AppError> {
    car.validate()?;

    tracing::info!("{} Received create request for {} {}", API_NAME, car.brand, car.model);

    Ok(CarJson(service.create(car).await?))
}

async fn update(
    State(service): State<CarService>,
    CarJson(car): CarJson<Car>,
) -> Result<Response, AppError> {
    car.validate()?;

    let id = car.id;
    match service.update(car).await {
        Ok(updated) => Ok(CarJson(updated).into_response()),
        Err(AppError::NotFound(_)) => {
            tracing::warn!("{} Car not found for update with id: {:?}", API_NAME, id);
            Ok(StatusCode::NOT_FOUND.into_response())
        }
        Err(e) => Err(e),
    }
}

async fn delete(
    State(service): State<CarService>,
    IdPath(id): IdPath<i64>,
) -> Result<StatusCode, AppError> {
    service.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
