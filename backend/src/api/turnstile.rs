use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TurnstileError {
    #[error("turnstile answered with status {0}")]
    Status(u16),
    #[error("could not reach turnstile: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Siteverify outcome. Fields the service leaves out stay out of our reply too.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Verification {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdata: Option<Value>,
    #[serde(rename = "error-codes", default, skip_serializing_if = "Option::is_none")]
    pub error_codes: Option<Value>,
}

pub async fn verify_token(
    http: &Client,
    verify_url: &str,
    secret: &str,
    token: &str,
    remote_ip: Option<&str>,
) -> Result<Verification, TurnstileError> {
    let mut form = vec![("secret", secret), ("response", token)];
    if let Some(ip) = remote_ip {
        form.push(("remoteip", ip));
    }

    let response = http
        .post(verify_url)
        .timeout(REQUEST_TIMEOUT)
        .form(&form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(TurnstileError::Status(status.as_u16()));
    }

    // An unreadable 2xx body counts as a failed verification, not an outage.
    let parsed = match response.bytes().await {
        Ok(body) => serde_json::from_slice(&body).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    Ok(parsed.unwrap_or_else(|e| {
        warn!("Turnstile returned an unreadable body: {}", e);
        Verification::default()
    }))
}
