//! Transport-neutral view of an inbound webhook request.
//!
//! The `listener` crate builds a [`WebhookRequest`] from the HTTP request;
//! dialect plugins only ever see this type. Arguments merge the query string
//! and, for form-encoded bodies, the decoded form fields. Every argument may
//! repeat, so values are kept as ordered lists.

use std::collections::BTreeMap;

/// HTTP method of the inbound request.
///
/// GET and POST are handled identically; the method is recorded only so that
/// plugins and logs can see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl HttpMethod {
    /// Returns the canonical upper-case method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inbound webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRequest {
    method: HttpMethod,
    args: BTreeMap<String, Vec<String>>,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

impl WebhookRequest {
    /// Creates an empty request with the given method.
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            args: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    /// Appends a value for the named argument.
    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_arg(name, value);
        self
    }

    /// Sets a header. Header names are case-insensitive and stored lower-cased.
    #[must_use]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Sets the raw request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Appends a value for the named argument in place.
    pub fn push_arg(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.args.entry(name.into()).or_default().push(value.into());
    }

    /// Returns the request method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the first value of the named argument, if any.
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value of the named argument, in request order.
    pub fn arg_values(&self, name: &str) -> &[String] {
        self.args.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `true` when the request carries no arguments at all.
    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }

    /// Returns a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the media type of the body without parameters, lower-cased.
    pub fn content_type(&self) -> Option<String> {
        self.header("content-type").map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }

    /// Returns the raw request body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
