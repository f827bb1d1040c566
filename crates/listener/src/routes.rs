//! Axum routes for the change hook mount point.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use pipeline::{ChangeHook, HookResponse};

use crate::extract::webhook_request;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Builds the router serving `hook` below `mount`.
///
/// `mount` may be given with or without a trailing slash; `/` mounts the
/// hook at the server root.
pub fn router(hook: Arc<ChangeHook>, mount: &str) -> Router {
    let base = format!("/{}", mount.trim_matches('/'));
    let dialect_path = if base == "/" {
        "/{dialect}".to_owned()
    } else {
        format!("{base}/{{dialect}}")
    };

    let mut routes = Router::new()
        .route(&base, get(hook_root).post(hook_root))
        .route(&dialect_path, get(hook_dialect).post(hook_dialect));
    if base != "/" {
        let with_slash = format!("{base}/");
        routes = routes.route(&with_slash, get(hook_root).post(hook_root));
    }
    routes.fallback(not_found).with_state(hook)
}

async fn hook_root(
    State(hook): State<Arc<ChangeHook>>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    dispatch(&hook, "", &method, query.as_deref(), &headers, body).await
}

async fn hook_dialect(
    State(hook): State<Arc<ChangeHook>>,
    Path(dialect): Path<String>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    dispatch(&hook, &dialect, &method, query.as_deref(), &headers, body).await
}

async fn dispatch(
    hook: &ChangeHook,
    segment: &str,
    method: &Method,
    query: Option<&str>,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    match webhook_request(method, query, headers, body) {
        Some(request) => plain_text(hook.dispatch(segment, &request).await),
        None => (StatusCode::METHOD_NOT_ALLOWED, [(CONTENT_TYPE, TEXT_PLAIN)], "method not allowed")
            .into_response(),
    }
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, [(CONTENT_TYPE, TEXT_PLAIN)], "no such resource").into_response()
}

fn plain_text(response: HookResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(CONTENT_TYPE, TEXT_PLAIN)], response.message).into_response()
}
