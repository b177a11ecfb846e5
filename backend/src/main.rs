use dotenvy::dotenv;
use axum::{
    http::{header, HeaderValue},
    routing::{any, get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{TraceLayer, DefaultMakeSpan, DefaultOnResponse};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use std::sync::Arc;

mod config;
mod error;
mod handlers {
    pub mod discount_code;
    pub mod turnstile;
}
mod api {
    pub mod resend;
    pub mod turnstile;
}
mod utils {
    pub mod validation;
}

use config::AppConfig;
use handlers::discount_code;
use handlers::turnstile;

async fn health_check() -> &'static str {
    "OK"
}

pub struct AppState {
    config: AppConfig,
    http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    // Every answer from the discount route carries the CORS headers, errors included.
    let discount_routes = Router::new()
        .route(
            "/api/send-discount-code",
            post(discount_code::send_discount_code).options(discount_code::preflight),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST,OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ));

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/verify-turnstile", any(turnstile::verify_turnstile))
        .merge(discount_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
        )
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,blueprint_backend=debug")),
        )
        .init();

    let config = AppConfig::from_env();

    let _guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((dsn, sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        }))
    });

    let port = config.port;
    let state = Arc::new(AppState::new(config));
    let app = app(state);

    use tokio::net::TcpListener;

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("Failed to bind listener");
    info!("Listening on port {}", port);
    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
