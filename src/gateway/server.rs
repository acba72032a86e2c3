use super::handlers::{
    REQUEST_FAILED, failure_message_for, handle_health, handle_rewrite_email,
    handle_rewrite_subject, handle_version_history,
};
use super::{AppState, MAX_BODY_SIZE};

use crate::config::Config;
use crate::history::create_history_store;
use crate::providers::{self, Provider};
use crate::rewrite::RewriteOrchestrator;
use crate::ui::style;
use anyhow::{Context, Result};
use axum::{
    Json, Router,
    http::{HeaderValue, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Returns true when the bind address is not a loopback address.
fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Run the HTTP gateway on `host:port`.
pub async fn run_gateway(host: &str, port: u16, config: Arc<Config>) -> Result<()> {
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the gateway would be reachable from other machines.\n\
             Fix: use --host 127.0.0.1 (default), or set\n\
             [gateway] allow_public_bind = true in config.toml."
        );
    }

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("parse gateway bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind gateway socket")?;

    run_gateway_with_listener(host, listener, config).await
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
) -> Result<()> {
    let actual_port = listener
        .local_addr()
        .context("get gateway listener local address")?
        .port();
    let display_addr = format!("{host}:{actual_port}");

    let state = build_gateway_state(Arc::clone(&config)).await?;
    print_gateway_banner(&display_addr, &state);
    tracing::info!(
        addr = %display_addr,
        model = state.orchestrator.model(),
        history = state.history.name(),
        "gateway started"
    );

    let app = build_app(state);
    axum::serve(listener, app)
        .await
        .context("serve HTTP gateway")?;

    Ok(())
}

async fn build_gateway_state(config: Arc<Config>) -> Result<AppState> {
    let provider: Arc<dyn Provider> = Arc::from(
        providers::create_provider(&config).context("create chat-completion provider")?,
    );
    let orchestrator = Arc::new(RewriteOrchestrator::new(provider, &config));
    let history = create_history_store(&config)
        .await
        .context("open version history store")?;

    Ok(AppState {
        config,
        orchestrator,
        history,
    })
}

fn print_gateway_banner(display_addr: &str, state: &AppState) {
    println!(
        "{} {}",
        style::header("Gateway listening on"),
        style::url(format!("http://{display_addr}"))
    );
    println!("  POST /rewrite-email");
    println!("  POST /rewrite-subject");
    println!("  GET  /version-history");
    println!("  GET  /health");
    println!(
        "  {}",
        style::dim(format!(
            "model {} | history {}",
            state.orchestrator.model(),
            state.history.name()
        ))
    );
}

/// Responses produced by the body-limit and timeout layers never reach a
/// handler; give them the same `{"error": ..}` shape the handlers use.
async fn normalize_layer_failures(uri: Uri, response: Response) -> Response {
    let status = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::BAD_REQUEST,
        StatusCode::REQUEST_TIMEOUT => StatusCode::INTERNAL_SERVER_ERROR,
        _ => return response,
    };
    tracing::warn!(
        path = uri.path(),
        upstream_status = response.status().as_u16(),
        "request ended before the handler replied"
    );
    let message = failure_message_for(uri.path()).unwrap_or(REQUEST_FAILED);
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

fn parse_cors_origins(cors_origins: &[String]) -> Vec<HeaderValue> {
    cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

/// Assemble the router with body limit, timeout and optional CORS layers.
pub fn build_app(state: AppState) -> Router {
    let gateway = state.config.gateway.clone();
    let mut app = Router::new()
        .route("/health", get(handle_health))
        .route("/rewrite-email", post(handle_rewrite_email))
        .route("/rewrite-subject", post(handle_rewrite_subject))
        .route("/version-history", get(handle_version_history))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(gateway.request_timeout_secs),
        ))
        .layer(middleware::map_response(normalize_layer_failures));

    if !gateway.cors_origins.is_empty() {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(parse_cors_origins(&gateway.cors_origins))
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([axum::http::header::CONTENT_TYPE]),
        );
    }

    app
}
