use thiserror::Error;

/// SQLSTATE raised by PostgreSQL on a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("License plate '{license_plate}' is already registered")]
    DuplicateLicensePlate { license_plate: String },

    #[error("Value of '{field}' does not fit its column")]
    ValueOutOfRange { field: &'static str },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    pub fn duplicate_license_plate(license_plate: impl Into<String>) -> Self {
        Self::DuplicateLicensePlate {
            license_plate: license_plate.into(),
        }
    }

    /// Classifies a driver error raised while writing `plate`.
    pub(crate) fn from_write(err: sqlx::Error, plate: Option<&str>) -> Self {
        match (check_duplicate_error(&err), plate) {
            (Some(constraint), Some(plate)) if constraint.contains("license_plate") => {
                Self::duplicate_license_plate(plate)
            }
            _ => Self::Database(err),
        }
    }
}

/// Returns the violated constraint (or the driver message) for unique violations.
pub(crate) fn check_duplicate_error(err: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return Some(
                db_err
                    .constraint()
                    .map(str::to_string)
                    .unwrap_or_else(|| db_err.message().to_string()),
            );
        }
    }
    None
}
