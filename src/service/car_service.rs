use std::sync::Arc;

use crate::constants::API_NAME;
use crate::error::AppError;
use crate::models::Car;
use crate::repository::CarRepository;

/// Business rules for car records; every call round-trips to the repository.
#[derive(Clone)]
pub struct CarService {
    repository: Arc<dyn CarRepository>,
}

impl CarService {
    pub fn new(repository: Arc<dyn CarRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Car, AppError> {
        tracing::debug!("{} Finding car with id: {}", API_NAME, id);

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(AppError::not_found)
    }

    /// Persists a new car. A payload id that is already taken is refused;
    /// an unused one is ignored and the store assigns the id.
    pub async fn create(&self, car: Car) -> Result<Car, AppError> {
        if let Some(id) = car.id {
            if self.repository.find_by_id(id).await?.is_some() {
                tracing::warn!("{} Car already exists with id: {}", API_NAME, id);
                return Err(AppError::AlreadyExists(id));
            }
        }

        let saved = self.repository.save(&car.normalized()).await?;

        tracing::info!(
            "{} Created car {} {} with id: {:?}",
            API_NAME,
            saved.brand,
            saved.model,
            saved.id
        );
        Ok(saved)
    }

    /// Replaces every attribute of an existing car.
    pub async fn update(&self, car: Car) -> Result<Car, AppError> {
        let Some(id) = car.id else {
            return Err(AppError::not_found());
        };

        self.get_by_id(id).await?;

        let saved = self.repository.save(&car.normalized()).await?;

        tracing::info!("{} Updated car with id: {}", API_NAME, id);
        Ok(saved)
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        let car = self.get_by_id(id).await?;

        self.repository.delete(&car).await?;

        tracing::info!("{} Deleted car with id: {}", API_NAME, id);
        Ok(())
    }

    pub async fn find_all(&self) -> Result<Vec<Car>, AppError> {
        let cars = self.repository.find_all().await?;
        tracing::debug!("{} Found {} cars", API_NAME, cars.len());
        Ok(cars)
    }
}
