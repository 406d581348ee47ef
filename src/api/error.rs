//! Error responses for the REST facade.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::error::StatXploreError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_body: Option<String>,
}

/// Wraps a core error so handlers can return it with `?`.
#[derive(Debug)]
pub struct AppError(pub StatXploreError);

impl From<StatXploreError> for AppError {
    fn from(err: StatXploreError) -> Self {
        Self(err)
    }
}

/// A request body that does not match the expected shape is an invalid query.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(StatXploreError::InvalidQuery(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(kind = self.0.kind(), "request failed: {}", self.0);
        } else {
            tracing::warn!(kind = self.0.kind(), "request rejected: {}", self.0);
        }

        let (upstream_status, upstream_body) = match self.0.upstream() {
            Some((status, body)) => (Some(status), Some(body.to_string())),
            None => (None, None),
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
            kind: self.0.kind(),
            upstream_status,
            upstream_body,
        };
        (status, Json(body)).into_response()
    }
}
