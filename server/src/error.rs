//! Error translation into the response envelope.
//!
//! # Design
//! Handlers return `Result<_, ApiError>`; `IntoResponse` turns each variant
//! into a status code plus an `Envelope`, so no raw fault ever reaches the
//! client. Panics are caught one layer further out by `CatchPanicLayer` and
//! rendered through `handle_panic` as `Unhandled`.

use std::any::Any;
use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use crate::envelope::Envelope;

/// Field name → human-readable problem.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("item not found")]
    ItemNotFound,

    #[error("endpoint not found")]
    EndpointNotFound,

    #[error("simulated server error")]
    SimulatedServerError,

    #[error("simulated timeout")]
    SimulatedTimeout,

    #[error("unhandled fault: {0}")]
    Unhandled(String),
}

impl ApiError {
    pub fn invalid_field(field: &str, message: &str) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), message.to_string());
        ApiError::Validation(fields)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::ItemNotFound | ApiError::EndpointNotFound => StatusCode::NOT_FOUND,
            ApiError::SimulatedTimeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::SimulatedServerError | ApiError::Unhandled(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short label used as a structured logging field.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::ItemNotFound => "item_not_found",
            ApiError::EndpointNotFound => "endpoint_not_found",
            ApiError::SimulatedServerError => "simulated_server_error",
            ApiError::SimulatedTimeout => "simulated_timeout",
            ApiError::Unhandled(_) => "unhandled",
        }
    }

    fn envelope(self) -> Envelope<FieldErrors> {
        match self {
            ApiError::Validation(fields) => {
                Envelope::failure("Validation failed").with_data(fields)
            }
            ApiError::ItemNotFound => Envelope::failure("Item not found"),
            ApiError::EndpointNotFound => Envelope::failure("Endpoint not found"),
            ApiError::SimulatedServerError => {
                Envelope::failure("Internal server error").with_error("Database connection failed")
            }
            ApiError::SimulatedTimeout => Envelope::failure("Request timeout"),
            ApiError::Unhandled(detail) => {
                Envelope::failure("Something went wrong!").with_error(detail)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_type = self.error_type();
        if status.is_server_error() {
            error!(error_type, status = status.as_u16(), details = %self, "request failed");
        } else {
            warn!(error_type, status = status.as_u16(), details = %self, "request rejected");
        }
        (status, Json(self.envelope())).into_response()
    }
}

/// An unreadable body is reported against the `body` pseudo-field.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_field("body", &rejection.body_text())
    }
}

/// Only a non-numeric `{id}` segment lands here; any integer is looked up.
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::invalid_field("id", "Id must be an integer")
    }
}

/// Renders a caught panic as the generic 500 envelope.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Unhandled(detail).into_response()
}
