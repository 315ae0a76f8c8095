use async_trait::async_trait;
use sqlx::PgPool;

use super::{CarRepository, RepositoryError};
use crate::models::Car;

const CAR_COLUMNS: &str = "id, brand, model, model_year, color, license_plate, odometer, \
     fuel_type, transmission, horse_power, engine_capacity, number_of_doors, body_type, \
     price, manufacture_date, owner";

#[derive(Clone)]
pub struct PgCarRepository {
    pool: PgPool,
}

impl PgCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, car: &Car) -> Result<Car, sqlx::Error> {
        let query = format!(
            "INSERT INTO cars (brand, model, model_year, color, license_plate, odometer, fuel_type, \
             transmission, horse_power, engine_capacity, number_of_doors, body_type, price, \
             manufacture_date, owner) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {CAR_COLUMNS}"
        );

        sqlx::query_as::<_, Car>(&query)
            .bind(&car.brand)
            .bind(&car.model)
            .bind(car.model_year)
            .bind(&car.color)
            .bind(&car.license_plate)
            .bind(car.odometer)
            .bind(&car.fuel_type)
            .bind(&car.transmission)
            .bind(car.horse_power)
            .bind(car.engine_capacity)
            .bind(car.number_of_doors)
            .bind(&car.body_type)
            .bind(car.price)
            .bind(car.manufacture_date)
            .bind(&car.owner)
            .fetch_one(&self.pool)
            .await
    }

    async fn update(&self, id: i64, car: &Car) -> Result<Option<Car>, sqlx::Error> {
        let query = format!(
            "UPDATE cars SET brand = $1, model = $2, model_year = $3, color = $4, \
             license_plate = $5, odometer = $6, fuel_type = $7, transmission = $8, \
             horse_power = $9, engine_capacity = $10, number_of_doors = $11, body_type = $12, \
             price = $13, manufacture_date = $14, owner = $15 \
             WHERE id = $16 \
             RETURNING {CAR_COLUMNS}"
        );

        sqlx::query_as::<_, Car>(&query)
            .bind(&car.brand)
            .bind(&car.model)
            .bind(car.model_year)
            .bind(&car.color)
            .bind(&car.license_plate)
            .bind(car.odometer)
            .bind(&car.fuel_type)
            .bind(&car.transmission)
            .bind(car.horse_power)
            .bind(car.engine_capacity)
            .bind(car.number_of_doors)
            .bind(&car.body_type)
            .bind(car.price)
            .bind(car.manufacture_date)
            .bind(&car.owner)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}

#[async_trait]
impl CarRepository for PgCarRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, RepositoryError> {
        let query = format!("SELECT {CAR_COLUMNS} FROM cars WHERE id = $1");
        let car = sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(car)
    }

    async fn find_all(&self) -> Result<Vec<Car>, RepositoryError> {
        let query = format!("SELECT {CAR_COLUMNS} FROM cars ORDER BY id");
        let cars = sqlx::query_as::<_, Car>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(cars)
    }

    async fn save(&self, car: &Car) -> Result<Car, RepositoryError> {
        let plate = car.license_plate.as_deref();

        if let Some(id) = car.id {
            let updated = self
                .update(id, car)
                .await
                .map_err(|e| RepositoryError::from_write(e, plate))?;
            if let Some(updated) = updated {
                return Ok(updated);
            }
        }

        self.insert(car)
            .await
            .map_err(|e| RepositoryError::from_write(e, plate))
    }

    async fn delete(&self, car: &Car) -> Result<(), RepositoryError> {
        let Some(id) = car.id else {
            return Ok(());
        };

        sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
