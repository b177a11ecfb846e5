use std::env;

use tracing::warn;
use url::Url;

pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";
pub const DEFAULT_TURNSTILE_VERIFY_URL: &str =
    "https://challenges.cloudflare.com/turnstile/v0/siteverify";
pub const DEFAULT_PORT: u16 = 3001;

/// Runtime settings read from the environment (and `.env`) at startup.
///
/// The secrets are optional so the service still boots without them; the
/// route that needs a missing secret answers 500 instead.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub resend_api_key: Option<String>,
    pub resend_from_email: Option<String>,
    pub turnstile_secret_key: Option<String>,
    pub resend_api_url: String,
    pub turnstile_verify_url: String,
    pub port: u16,
    pub sentry_dsn: Option<String>,
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn url_or_default(name: &str, default: &str) -> String {
    match non_empty(name) {
        Some(value) => match Url::parse(&value) {
            Ok(_) => value.trim_end_matches('/').to_string(),
            Err(e) => {
                warn!("{} is not a valid URL ({}), using {}", name, e, default);
                default.to_string()
            }
        },
        None => default.to_string(),
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            resend_api_key: non_empty("RESEND_API_KEY"),
            resend_from_email: non_empty("RESEND_FROM_EMAIL"),
            turnstile_secret_key: non_empty("TURNSTILE_SECRET_KEY"),
            resend_api_url: url_or_default("RESEND_API_URL", DEFAULT_RESEND_API_URL),
            turnstile_verify_url: url_or_default("TURNSTILE_VERIFY_URL", DEFAULT_TURNSTILE_VERIFY_URL),
            port: non_empty("PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            sentry_dsn: non_empty("SENTRY_DSN"),
        };
        config.warn_missing();
        config
    }

    fn warn_missing(&self) {
        for (name, value) in [
            ("RESEND_API_KEY", &self.resend_api_key),
            ("RESEND_FROM_EMAIL", &self.resend_from_email),
            ("TURNSTILE_SECRET_KEY", &self.turnstile_secret_key),
        ] {
            if value.is_none() {
                warn!("{} is not set, the route that needs it will answer 500", name);
            }
        }
    }
}
