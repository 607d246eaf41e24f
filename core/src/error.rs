//! Error types for the items API client.
//!
//! # Design
//! Statuses the API answers with a dedicated envelope get their own variant
//! (`Validation`, `NotFound`, `Timeout`); every other non-expected status
//! lands in `Http`. `Transport` is for failures the host hits before any
//! response arrives. `is_retryable` is the classification `RetryPolicy` uses.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors returned by `ItemsClient` parse methods and by `RetryPolicy`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 400 with per-field problems, e.g. `{"name": "Name is required"}`.
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    /// 404: unknown item or unknown endpoint.
    #[error("{message}")]
    NotFound { message: String },

    /// 408 from the server, or a host-side request timeout.
    #[error("{message}")]
    Timeout { message: String },

    /// Any other unexpected status.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    /// The host could not complete the round-trip (connection refused, reset...).
    #[error("transport failed: {0}")]
    Transport(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// The HTTP status this error stands for, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation { .. } => Some(400),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Timeout { .. } => Some(408),
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(_)
            | ApiError::Deserialization(_)
            | ApiError::Serialization(_) => None,
        }
    }

    /// Transport failures, timeouts and 5xx responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) | ApiError::Timeout { .. } => true,
            ApiError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Message shown for a status when the response body does not carry one.
pub fn default_message(status: u16) -> &'static str {
    match status {
        400 => "Bad request. Please check your input.",
        401 => "Unauthorized. Please log in again.",
        403 => "Access forbidden. You don't have permission.",
        404 => "Resource not found.",
        408 => "Request timeout. Please check your connection and try again.",
        409 => "Conflict. The resource already exists.",
        422 => "Validation failed. Please check your input.",
        429 => "Too many requests. Please try again later.",
        500 => "Server error. Please try again later.",
        502 => "Bad gateway. Service temporarily unavailable.",
        503 => "Service unavailable. Please try again later.",
        504 => "Gateway timeout. Please try again later.",
        _ => "An unexpected error occurred.",
    }
}
