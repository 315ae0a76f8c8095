//! In-memory [`CarRepository`] for tests and database-less local runs.
//!
//! Mirrors the `cars` table: ids come from a monotonic sequence and are never
//! reused, license plates are unique, decimals are stored at column scale and
//! rejected when they exceed the column precision.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CarRepository, RepositoryError};
use crate::models::Car;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Car>,
    last_id: i64,
}

impl Table {
    fn plate_taken(&self, plate: &str, except: Option<i64>) -> bool {
        self.rows.values().any(|row| {
            row.license_plate.as_deref() == Some(plate) && row.id != except
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCarRepository {
    table: Arc<RwLock<Table>>,
}

impl InMemoryCarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CarRepository for InMemoryCarRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, RepositoryError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Car>, RepositoryError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn save(&self, car: &Car) -> Result<Car, RepositoryError> {
        if let Some(field) = car.out_of_range_field() {
            return Err(RepositoryError::ValueOutOfRange { field });
        }

        let mut table = self.table.write().await;

        let existing = car.id.filter(|id| table.rows.contains_key(id));

        if let Some(plate) = car.license_plate.as_deref() {
            if table.plate_taken(plate, existing) {
                return Err(RepositoryError::duplicate_license_plate(plate));
            }
        }

        let id = match existing {
            Some(id) => id,
            None => {
                table.last_id += 1;
                table.last_id
            }
        };

        let stored = car.clone().with_id(id).normalized();
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, car: &Car) -> Result<(), RepositoryError> {
        if let Some(id) = car.id {
            self.table.write().await.rows.remove(&id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polo() -> Car {
        let mut car = Car::new("Volkswagen", "Polo MPI", 2024);
        car.license_plate = Some("BGA7230".to_string());
        car
    }

    #[tokio::test]
    async fn save_without_id_assigns_increasing_ids() {
        let repository = InMemoryCarRepository::new();

        let first = repository.save(&Car::new("Fiat", "Uno", 2010)).await.unwrap();
        let second = repository.save(&Car::new("Fiat", "Palio", 2012)).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(repository.len().await, 2);
    }

    #[tokio::test]
    async fn save_with_unknown_id_inserts_under_a_fresh_id() {
        let repository = InMemoryCarRepository::new();

        let saved = repository
            .save(&Car::new("Fiat", "Uno", 2010).with_id(42))
            .await
            .unwrap();

        assert_eq!(saved.id, Some(1));
        assert!(repository.find_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_with_existing_id_replaces_the_row() {
        let repository = InMemoryCarRepository::new();
        let saved = repository.save(&polo()).await.unwrap();

        let mut replacement = Car::new("Volkswagen", "Polo TSI", 2025);
        replacement.id = saved.id;
        let updated = repository.save(&replacement).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.model, "Polo TSI");
        assert!(updated.license_plate.is_none());
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_license_plate_is_rejected() {
        let repository = InMemoryCarRepository::new();
        repository.save(&polo()).await.unwrap();

        let err = repository.save(&polo()).await.unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::DuplicateLicensePlate { ref license_plate } if license_plate == "BGA7230"
        ));
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn decimal_beyond_column_precision_is_rejected() {
        let repository = InMemoryCarRepository::new();
        let mut car = Car::new("Fiat", "Uno", 2010);
        car.engine_capacity = Some(rust_decimal::Decimal::new(125, 1));

        let err = repository.save(&car).await.unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::ValueOutOfRange { field: "engine_capacity" }
        ));
        assert!(repository.is_empty().await);
    }

    #[tokio::test]
    async fn replacing_a_row_may_keep_its_own_plate() {
        let repository = InMemoryCarRepository::new();
        let saved = repository.save(&polo()).await.unwrap();

        let mut same = polo();
        same.id = saved.id;
        same.model_year = 2025;

        assert!(repository.save(&same).await.is_ok());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repository = InMemoryCarRepository::new();
        let saved = repository.save(&Car::new("Fiat", "Uno", 2010)).await.unwrap();
        repository.delete(&saved).await.unwrap();

        let next = repository.save(&Car::new("Fiat", "Uno", 2010)).await.unwrap();

        assert_eq!(next.id, Some(2));
        assert!(!repository.is_empty().await);
    }

    #[tokio::test]
    async fn find_all_returns_rows_in_id_order() {
        let repository = InMemoryCarRepository::new();
        for model in ["Uno", "Palio", "Argo"] {
            repository.save(&Car::new("Fiat", model, 2020)).await.unwrap();
        }

        let models: Vec<_> = repository
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|car| car.model)
            .collect();

        assert_eq!(models, ["Uno", "Palio", "Argo"]);
    }
}
