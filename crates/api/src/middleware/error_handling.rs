//! # Error Handling Middleware
//!
//! Maps [`BookingError`] to HTTP status codes and the JSON envelope every
//! endpoint answers with:
//!
//! ```json
//! { "success": false, "message": "..." }
//! ```
//!
//! Unexpected errors are logged with their full cause chain and answered with
//! a generic message so store internals never reach a client.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use talentgate_core::errors::BookingError;
use tracing::{error, warn};

pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error";

/// Body shared by every endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            status: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_status(mut self, status: &'static str) -> Self {
        self.status = Some(status);
        self
    }
}

/// Success response: status code plus enveloped body.
pub fn respond<T: Serialize>(status: StatusCode, envelope: Envelope<T>) -> Response {
    (status, Json(envelope)).into_response()
}

/// Application error wrapper that provides HTTP status code mapping
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            BookingError::InvalidRequest(_) | BookingError::SlotUnavailable(_) => {
                StatusCode::BAD_REQUEST
            }
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Conflict(_) => StatusCode::CONFLICT,
            BookingError::Forbidden(_) => StatusCode::FORBIDDEN,
            BookingError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; the variant prefix from `Display` is dropped.
    fn message(&self) -> String {
        match &self.0 {
            BookingError::InvalidRequest(message)
            | BookingError::NotFound(message)
            | BookingError::Conflict(message)
            | BookingError::SlotUnavailable(message)
            | BookingError::Forbidden(message) => message.clone(),
            BookingError::Unexpected(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self.0 {
            BookingError::Unexpected(report) => {
                error!(error = ?report, "request failed with an unexpected error")
            }
            other => warn!(code = other.code(), "{other}"),
        }

        let body = Envelope::<()> {
            success: false,
            message: Some(self.message()),
            status: Some(self.0.code()),
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

/// Automatic conversion from BookingError to AppError
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Unexpected(err))
    }
}

/// Malformed JSON bodies are validation errors, answered in the envelope.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(BookingError::InvalidRequest(rejection.body_text()))
    }
}
