//! Stateless HTTP front-end.
//!
//! Three endpoints: `GET /health`, `GET /tools`, and `POST /invoke`. Invocation responses
//! mirror the upstream status when the upstream reported an error, so callers can distinguish
//! application failures (4xx/5xx payloads) from bridge transport failures (502/504).

use anyhow::Context as _;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bridge_swagger_tools::error::SwaggerToolsError;
use bridge_swagger_tools::source::ApiToolSource;
use rmcp::model::JsonObject;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

#[derive(Clone)]
struct AppState {
    source: ApiToolSource,
    call_timeout: Option<Duration>,
}

/// Build the front-end router.
pub fn router(source: ApiToolSource, call_timeout: Option<Duration>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/invoke", post(invoke))
        .with_state(AppState {
            source,
            call_timeout,
        })
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn list_tools(State(state): State<AppState>) -> Json<Value> {
    Json(json!({"tools": state.source.list_tools()}))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvokeRequest {
    tool_name: String,
    #[serde(default)]
    arguments: Option<JsonObject>,
}

async fn invoke(State(state): State<AppState>, Json(request): Json<InvokeRequest>) -> Response {
    if state.source.registry().resolve(&request.tool_name).is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("Tool not found: {}", request.tool_name)})),
        )
            .into_response();
    }

    match state
        .source
        .execute(&request.tool_name, request.arguments, state.call_timeout)
        .await
    {
        Ok(result) => {
            let status = if result.is_error {
                StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::BAD_GATEWAY)
            } else {
                StatusCode::OK
            };
            (
                status,
                Json(json!({
                    "content": result.content,
                    "statusCode": result.status_code,
                    "isError": result.is_error,
                })),
            )
                .into_response()
        }
        Err(SwaggerToolsError::Timeout(msg)) => (
            StatusCode::GATEWAY_TIMEOUT,
            Json(json!({"error": msg})),
        )
            .into_response(),
        Err(e @ SwaggerToolsError::Request(_)) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// Serve the front-end until ctrl-c.
pub async fn serve(
    source: ApiToolSource,
    host: &str,
    port: u16,
    call_timeout: Option<Duration>,
) -> anyhow::Result<()> {
    let app = router(source, call_timeout);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    tracing::info!("Starting HTTP front-end on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
