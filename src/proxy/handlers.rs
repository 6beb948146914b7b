// Service facade handlers: every route sequences the same pipeline
// (token -> destination -> forward) and relays whatever comes back.

use axum::body::Body;
use axum::extract::{Path, RawQuery, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{Json, Response};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::proxy::destination::Destination;
use crate::proxy::server::AppState;
use crate::proxy::upstream::ProxyResult;

/// GET /
pub async fn home() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hello from Cloud Foundry!" }))
}

/// Health check handler
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /destinations - the resolved destination record, as the registry
/// returned it.
pub async fn list_destinations(
    State(state): State<AppState>,
) -> Result<Json<Destination>, AppError> {
    let (_token, destination) = resolve(&state).await?;
    Ok(Json(destination))
}

/// GET /odata - legacy variant without a resource path; the forwarder
/// appends the fixed one-record enumeration query.
pub async fn get_odata(State(state): State<AppState>) -> Result<Response, AppError> {
    let (token, destination) = resolve(&state).await?;
    let result = state.upstream.forward(&destination, &token, None).await?;
    proxy_response(result)
}

/// GET /odata/*resource - forwards to the destination URL with the captured
/// tail (and original query string) appended verbatim.
pub async fn get_odata_resource(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let mut resource_path = format!("/{}", resource);
    if let Some(query) = query {
        resource_path.push('?');
        resource_path.push_str(&query);
    }

    let (token, destination) = resolve(&state).await?;
    let result = state
        .upstream
        .forward(&destination, &token, Some(&resource_path))
        .await?;
    proxy_response(result)
}

/// Run the resolution half of the pipeline: fresh token, then the registry
/// lookup. No caching between requests.
async fn resolve(state: &AppState) -> AppResult<(String, Destination)> {
    let token = state.tokens.fetch_token(&state.config).await?;
    let destination = state.destinations.resolve(&state.config, &token).await?;
    Ok((token, destination))
}

/// Relay the backend response byte-exact: its status, its body, its
/// content-type. Non-2xx statuses pass through rather than raising.
fn proxy_response(result: ProxyResult) -> Result<Response, AppError> {
    let mut builder = Response::builder().status(result.status);
    if let Some(content_type) = &result.content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(result.body))
        .map_err(|e| AppError::Protocol(format!("Failed to relay backend response: {}", e)))
}
