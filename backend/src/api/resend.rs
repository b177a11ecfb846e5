use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const DISCOUNT_SUBJECT: &str = "Your 10% off code for the Interview Success Blueprint";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ResendError {
    /// Resend answered with a non-2xx status; carries its raw response text.
    #[error("resend rejected the email with {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("could not reach resend: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: String,
}

pub fn discount_email_html(code: &str) -> String {
    format!(
        r#"
    <div style="font-family: Arial, sans-serif; line-height: 1.5; color: #111827;">
      <h2 style="margin-bottom: 12px;">Your 10% off code</h2>
      <p style="margin: 8px 0 12px;">Apply this code at checkout to save 10% on the Interview Success Blueprint:</p>
      <div style="display:inline-block;padding:12px 16px;border:1px solid #E5E7EB;border-radius:10px;background:#F9FAFB;font-weight:700;letter-spacing:0.08em;">
        {code}
      </div>
      <p style="margin-top:16px;">Need help? Just reply to this email.</p>
    </div>
  "#
    )
}

pub struct ResendClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    api_key: &'a str,
}

impl<'a> ResendClient<'a> {
    pub fn new(http: &'a Client, base_url: &'a str, api_key: &'a str) -> Self {
        Self { http, base_url, api_key }
    }

    pub async fn send_discount_code(&self, from: &str, to: &str, code: &str) -> Result<(), ResendError> {
        let payload = OutgoingEmail {
            from,
            to,
            subject: DISCOUNT_SUBJECT,
            html: discount_email_html(code),
        };

        let response = self
            .http
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("Resend accepted discount email with status {}", status);
            return Ok(());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read resend error body: {}", e);
                "Unable to send email.".to_string()
            }
        };
        Err(ResendError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
