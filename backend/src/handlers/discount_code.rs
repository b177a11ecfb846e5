use crate::AppState;
use crate::api::resend::{ResendClient, ResendError};
use crate::error::ApiError;
use crate::utils::validation::is_valid_email;
use std::sync::Arc;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

pub const DEFAULT_DISCOUNT_CODE: &str = "JOBWIN10";

#[derive(Debug, Default, Deserialize)]
pub struct DiscountCodeRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl DiscountCodeRequest {
    fn email(&self) -> &str {
        self.email.as_deref().unwrap_or("").trim()
    }

    /// Blank or absent codes fall back to the launch code.
    fn code(&self) -> &str {
        self.code
            .as_deref()
            .filter(|code| !code.is_empty())
            .unwrap_or(DEFAULT_DISCOUNT_CODE)
            .trim()
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    value.as_deref().ok_or_else(|| {
        error!("{} is not configured", name);
        ApiError::Misconfigured(format!("{} is not configured.", name))
    })
}

pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn send_discount_code(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    // `null` is valid JSON and behaves like an empty object.
    let request: DiscountCodeRequest = serde_json::from_slice::<Option<DiscountCodeRequest>>(&body)
        .map_err(|e| {
            warn!("Rejecting discount request with bad JSON: {}", e);
            ApiError::BadRequest("Invalid JSON payload.".to_string())
        })?
        .unwrap_or_default();

    let email = request.email();
    if !is_valid_email(email) {
        return Err(ApiError::BadRequest("A valid email is required.".to_string()));
    }

    let api_key = required(&state.config.resend_api_key, "RESEND_API_KEY")?;
    let from = required(&state.config.resend_from_email, "RESEND_FROM_EMAIL")?;

    let client = ResendClient::new(&state.http, &state.config.resend_api_url, api_key);
    match client.send_discount_code(from, email, request.code()).await {
        Ok(()) => {
            info!("Sent discount code {} by email", request.code());
            Ok(Json(json!({ "success": true })))
        }
        Err(ResendError::Rejected { status, body }) => {
            warn!("Resend rejected discount email with status {}", status);
            if body.is_empty() {
                Err(ApiError::Upstream("Failed to send email.".to_string()))
            } else {
                Err(ApiError::Upstream(body))
            }
        }
        Err(e @ ResendError::Transport(_)) => {
            error!("Failed to send discount email: {}", e);
            Err(ApiError::Upstream("Unable to send email.".to_string()))
        }
    }
}
