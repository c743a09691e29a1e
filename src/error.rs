use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Whether error responses may carry diagnostic details.
///
/// Set once at startup from the environment; production responses never
/// include details regardless of what a handler attaches.
static EXPOSE_DETAILS: OnceLock<bool> = OnceLock::new();

pub fn set_detail_exposure(expose: bool) {
    EXPOSE_DETAILS.set(expose).ok();
}

fn details_exposed() -> bool {
    *EXPOSE_DETAILS.get().unwrap_or(&false)
}

/// Application error, typed by machine kind rather than by call stack.
///
/// Every variant maps to a stable `error` kind string in the JSON body so
/// clients can branch on it without parsing messages.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Invalid request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Event error: {0}")]
    EventError(anyhow::Error),

    #[error("Payment error: {0}")]
    PaymentError(anyhow::Error),

    #[error("Booking error: {0}")]
    BookingError(anyhow::Error),

    #[error("Review error: {0}")]
    ReviewError(anyhow::Error),

    #[error("Authentication error: {0}")]
    AuthError(anyhow::Error),

    #[error("Forbidden: {0}")]
    Forbidden(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl AppError {
    /// Stable machine kind surfaced in the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => "VALIDATION_ERROR",
            AppError::EventError(_) => "EVENT_ERROR",
            AppError::PaymentError(_) => "PAYMENT_ERROR",
            AppError::BookingError(_) => "BOOKING_ERROR",
            AppError::ReviewError(_) => "REVIEW_ERROR",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InternalError(_) | AppError::DatabaseError(_) | AppError::ConfigError(_) => {
                "SERVER_ERROR"
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::EventError(_) | AppError::BookingError(_) => StatusCode::BAD_REQUEST,
            AppError::PaymentError(_) => StatusCode::BAD_GATEWAY,
            AppError::ReviewError(_) => StatusCode::CONFLICT,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) | AppError::DatabaseError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = self.status();

        let (message, details) = match &self {
            AppError::ValidationError(err) => {
                ("Validation error".to_string(), Some(err.to_string()))
            }
            AppError::BadRequest(err)
            | AppError::EventError(err)
            | AppError::PaymentError(err)
            | AppError::BookingError(err)
            | AppError::ReviewError(err)
            | AppError::AuthError(err)
            | AppError::Forbidden(err)
            | AppError::NotFound(err) => (err.to_string(), None),
            AppError::InternalError(err) => {
                ("Internal server error".to_string(), Some(err.to_string()))
            }
            AppError::DatabaseError(err) => ("Database error".to_string(), Some(err.to_string())),
            AppError::ConfigError(err) => {
                ("Configuration error".to_string(), Some(err.to_string()))
            }
        };

        let details = if details_exposed() { details } else { None };

        (
            status,
            Json(ErrorResponse {
                error: kind,
                message,
                details,
            }),
        )
            .into_response()
    }
}
