use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Misconfigured(String),
    #[error("{0}")]
    Upstream(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Same taxonomy, rendered in the verification envelope `{success: false, error}`.
#[derive(Debug)]
pub struct VerificationFailure(pub ApiError);

impl From<ApiError> for VerificationFailure {
    fn from(error: ApiError) -> Self {
        Self(error)
    }
}

impl IntoResponse for VerificationFailure {
    fn into_response(self) -> Response {
        (
            self.0.status(),
            Json(json!({ "success": false, "error": self.0.to_string() })),
        )
            .into_response()
    }
}
