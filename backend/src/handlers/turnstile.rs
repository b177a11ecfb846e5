use crate::AppState;
use crate::api::turnstile::verify_token;
use crate::error::{ApiError, VerificationFailure};
use std::sync::Arc;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
};
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, error, warn};

const CLIENT_IP_HEADER: &str = "CF-Connecting-IP";

fn token_from(body: &[u8]) -> Option<String> {
    let payload: Value = serde_json::from_slice(body).ok()?;
    payload
        .get("token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

pub async fn verify_turnstile(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), VerificationFailure> {
    if method != Method::POST {
        return Err(ApiError::MethodNotAllowed.into());
    }

    let secret = state.config.turnstile_secret_key.as_deref().ok_or_else(|| {
        error!("TURNSTILE_SECRET_KEY is not configured");
        ApiError::Misconfigured("Server missing TURNSTILE_SECRET_KEY".to_string())
    })?;

    let token = token_from(&body)
        .ok_or_else(|| ApiError::BadRequest("Missing Turnstile token".to_string()))?;

    let client_ip = headers
        .get(CLIENT_IP_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|ip| !ip.is_empty());

    let verification = verify_token(
        &state.http,
        &state.config.turnstile_verify_url,
        secret,
        &token,
        client_ip,
    )
    .await
    .map_err(|e| {
        warn!("Turnstile verification unavailable: {}", e);
        ApiError::Upstream("Unable to reach Turnstile verification service.".to_string())
    })?;

    debug!("Turnstile verification success={}", verification.success);
    let status = if verification.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    let body = serde_json::to_value(&verification).map_err(|e| {
        error!("Failed to encode verification result: {}", e);
        ApiError::Upstream("Unable to reach Turnstile verification service.".to_string())
    })?;
    Ok((status, Json(body)))
}
