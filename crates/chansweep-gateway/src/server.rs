//! HTTP server for the slash command.
//!
//! Routes:
//! - `GET /health` → `OK`, unauthenticated
//! - `POST {path}` → signature check, then one sweep; the rendered report is
//!   the response body
//!
//! Every answer after a valid signature is a 200 so the slash-command user
//! sees the text, failures included.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use chansweep_core::config::schema::GatewayConfig;
use chansweep_core::utils::unix_now;
use chansweep_engine::{SweepCommand, Sweeper};

use crate::signature;

/// Shared, immutable handler state.
#[derive(Clone)]
pub struct AppState {
    pub sweeper: Arc<Sweeper>,
    pub signing_secret: Arc<str>,
}

impl AppState {
    pub fn new(sweeper: Arc<Sweeper>, signing_secret: &str) -> Self {
        Self {
            sweeper,
            signing_secret: Arc::from(signing_secret),
        }
    }
}

/// The slash-command fields we read. Slack sends many more.
#[derive(Debug, Default, Deserialize)]
struct SlashCommandForm {
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    text: String,
}

pub fn build_router(state: AppState, path: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(path, post(handle_sweep))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn handle_sweep(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let now = unix_now() as i64;
    if let Err(e) = signature::verify(&headers, &body, &state.signing_secret, now) {
        warn!(error = %e, "rejected request with invalid signature");
        return (StatusCode::FORBIDDEN, "Invalid signature").into_response();
    }

    let form: SlashCommandForm = serde_urlencoded::from_bytes(&body).unwrap_or_else(|e| {
        warn!(error = %e, "could not decode slash-command form");
        SlashCommandForm::default()
    });

    let requester = form.user_id.trim();
    if requester.is_empty() {
        return (StatusCode::OK, "❌ Missing user_id").into_response();
    }

    let command = SweepCommand::parse(&form.text);
    info!(requester = %requester, dry_run = command.dry_run, "sweep requested");

    let text = match state.sweeper.run(requester, command.dry_run).await {
        Ok(report) => report.render(),
        Err(e) => {
            error!(error = %e, "sweep failed");
            format!("❌ Sweep failed: {e}")
        }
    };
    (StatusCode::OK, text).into_response()
}

/// Bind and serve until Ctrl+C.
pub async fn serve(state: AppState, config: &GatewayConfig) -> Result<()> {
    if !config.path.starts_with('/') {
        bail!("gateway path must start with '/': {:?}", config.path);
    }

    let app = build_router(state, &config.path);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(addr = %addr, path = %config.path, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for Ctrl+C");
            }
            info!("shutting down");
        })
        .await
        .context("gateway server exited with error")
}
