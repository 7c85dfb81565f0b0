#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use server::routes::{self, ServerState};
use service::storage::InMemoryBackend;
use service::UserStore;

pub async fn memory_app() -> anyhow::Result<Router> {
    let users = UserStore::open(Arc::new(InMemoryBackend::new())).await?;
    Ok(app_for(ServerState::new(users)))
}

pub fn app_for(state: ServerState) -> Router {
    routes::build_router(state, tower_http::cors::CorsLayer::very_permissive(), "/nonexistent-frontend")
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };
    dispatch(app, req).await
}

/// Sends `raw` verbatim as an `application/json` body.
pub async fn send_raw(app: &Router, method: &str, uri: &str, raw: &str) -> anyhow::Result<(StatusCode, Value)> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(raw.to_owned()))?;
    dispatch(app, req).await
}

async fn dispatch(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}
