pub mod car_repo;
pub mod errors;
pub mod in_memory;

pub use car_repo::PgCarRepository;
pub use errors::RepositoryError;
pub use in_memory::InMemoryCarRepository;

use async_trait::async_trait;

use crate::models::Car;

/// Persistence boundary for [`Car`] records, keyed by a store-assigned id.
#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, RepositoryError>;

    /// Every stored record, in primary-key order.
    async fn find_all(&self) -> Result<Vec<Car>, RepositoryError>;

    /// Replaces the record when `car.id` names an existing row, otherwise
    /// inserts it under a freshly assigned id. Returns the stored record.
    async fn save(&self, car: &Car) -> Result<Car, RepositoryError>;

    async fn delete(&self, car: &Car) -> Result<(), RepositoryError>;
}
