use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Request},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;
use validator::ValidationErrors;

use crate::constants::API_NAME;
use crate::repository::RepositoryError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const NOT_FOUND_MESSAGE: &str = "No records found for this ID!";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Car already exist with given ID: {0}")]
    AlreadyExists(i64),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// How a failure is reported at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Unhandled,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unhandled => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    pub fn not_found() -> Self {
        AppError::NotFound(NOT_FOUND_MESSAGE.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::AlreadyExists(_) | AppError::Repository(_) | AppError::Internal(_) => {
                ErrorKind::Unhandled
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Uniform JSON body for every failure that reaches the boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub details: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
            details: String::new(),
        }
    }
}

fn serialize_timestamp<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        match kind {
            ErrorKind::NotFound => tracing::warn!("{} Not found: {}", API_NAME, self),
            ErrorKind::Validation => tracing::warn!("{} Validation error: {}", API_NAME, self),
            ErrorKind::Unhandled => tracing::error!("{} Unhandled error: {}", API_NAME, self),
        }

        let body = ErrorResponse::new(self.to_string());
        let mut response = (kind.status(), Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Fills `details` of error bodies with the request description (`uri=<path>`).
///
/// Only the body is replaced; status, headers and extensions are kept.
pub async fn describe_request(request: Request, next: Next) -> Response {
    let details = format!("uri={}", request.uri().path());
    let response = next.run(request).await;

    let Some(mut body) = response.extensions().get::<ErrorResponse>().cloned() else {
        return response;
    };
    body.details = details;

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.extensions.insert(body.clone());
    let rendered = Json(body).into_response().into_body();
    Response::from_parts(parts, rendered)
}
