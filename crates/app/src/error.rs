use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use course_catalog_core::{PageRequestError, ValidationErrors};

use crate::router::AppState;
use crate::service::ServiceError;

const GENERIC_FAILURE: &str = "An unexpected error occurred";

/// Failures surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { .. } => Self::NotFound(err.to_string()),
            ServiceError::IdMismatch { .. } => Self::BadRequest(err.to_string()),
            ServiceError::Storage(inner) => Self::Internal(inner.to_string()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl From<PageRequestError> for ApiError {
    fn from(err: PageRequestError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Error summary attached to a response until [`render_error_body`] adds the request context.
#[derive(Debug, Clone)]
struct ErrorReport {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, "Not Found", message),
            Self::Validation(message) => (StatusCode::BAD_REQUEST, "Validation Error", message),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, "Bad Request", message),
            Self::Internal(detail) => {
                error!(stage = "api", %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    GENERIC_FAILURE.to_string(),
                )
            }
        };

        let mut response = status.into_response();
        response
            .extensions_mut()
            .insert(ErrorReport { error, message });
        response
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    timestamp: DateTime<Utc>,
    status: u16,
    error: &'static str,
    message: String,
    path: String,
}

/// Router-wide middleware that renders every [`ApiError`] as the uniform
/// `{timestamp, status, error, message, path}` body.
///
/// Bare 405 responses from the router get the same body; their `Allow` header is kept.
pub async fn render_error_body(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    let report = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => report,
        None if response.status() == StatusCode::METHOD_NOT_ALLOWED => ErrorReport {
            error: "Method Not Allowed",
            message: format!("Method {method} is not supported for {path}"),
        },
        None => return response,
    };

    let status = response.status();
    counter!("http_errors_total", "status" => status.as_str().to_owned()).increment(1);
    if status.is_client_error() {
        warn!(stage = "api", %path, status = status.as_u16(), message = %report.message, "request rejected");
    }

    let body = ErrorBody {
        timestamp: state.now(),
        status: status.as_u16(),
        error: report.error,
        message: report.message,
        path,
    };
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    (parts, Json(body)).into_response()
}
