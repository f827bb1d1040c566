//! Conversion from HTTP requests to [`WebhookRequest`].

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use tracing::debug;
use url::form_urlencoded;

use pipeline::{HttpMethod, WebhookRequest};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Builds the transport-neutral request for the change hook.
///
/// Arguments come from the query string followed by a form-encoded body, so
/// a name given in both places keeps the query value first. Headers whose
/// value is not visible ASCII are dropped. Returns `None` for methods the
/// change hook does not serve.
pub fn webhook_request(
    method: &Method,
    query: Option<&str>,
    headers: &HeaderMap,
    body: Bytes,
) -> Option<WebhookRequest> {
    let method = match *method {
        Method::GET => HttpMethod::Get,
        Method::POST => HttpMethod::Post,
        _ => return None,
    };

    let mut request = WebhookRequest::new(method);
    for (name, value) in headers {
        match value.to_str() {
            Ok(value) => request = request.with_header(name.as_str(), value),
            Err(_) => debug!(header = %name, "skipping header with opaque value"),
        }
    }

    if let Some(query) = query {
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            request.push_arg(name, value);
        }
    }
    if request.content_type().as_deref() == Some(FORM_CONTENT_TYPE) {
        for (name, value) in form_urlencoded::parse(&body) {
            request.push_arg(name, value);
        }
    }

    Some(request.with_body(body.to_vec()))
}
