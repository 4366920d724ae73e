use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::utils::response::error as error_response;

/// Failures of the guest registry and ticket codec.
///
/// A second check-in of the same guest is not an error; see
/// [`CheckInOutcome`](crate::registry::CheckInOutcome).
#[derive(Debug, Error)]
pub enum GuestError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Guest not found: {0}")]
    NotFound(String),

    #[error("Persistence error")]
    Persistence(#[from] sqlx::Error),

    #[error("Corrupt guest record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl From<GuestError> for AppError {
    fn from(err: GuestError) -> Self {
        match err {
            GuestError::InvalidInput(msg) => AppError::ValidationError(msg),
            GuestError::MalformedPayload(msg) => AppError::MalformedPayload(msg),
            GuestError::NotFound(msg) => AppError::NotFound(msg),
            GuestError::Persistence(e) => AppError::DatabaseError(e),
            corrupt @ GuestError::CorruptRecord { .. } => {
                AppError::InternalServerError(corrupt.to_string())
            }
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg)
            | AppError::MalformedPayload(msg)
            | AppError::NotFound(msg)
            | AppError::InternalServerError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Store failures and corrupt rows stay in the logs
        let public_message = match &self {
            AppError::ValidationError(msg)
            | AppError::MalformedPayload(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            AppError::InternalServerError(_) => "An internal error occurred".to_string(),
        };

        error_response(code, public_message, None, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_errors_map_to_http_status() {
        let cases = [
            (GuestError::InvalidInput("x".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (GuestError::MalformedPayload("x".into()), StatusCode::BAD_REQUEST, "MALFORMED_PAYLOAD"),
            (GuestError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (GuestError::Persistence(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            (
                GuestError::CorruptRecord { id: "1".into(), reason: "x".into() },
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
            ),
        ];

        for (err, status, code) in cases {
            let app: AppError = err.into();
            assert_eq!(app.status_code(), status);
            assert_eq!(app.code(), code);
        }
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = AppError::InternalServerError("row 7 has checked_in_at but not checked_in".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
