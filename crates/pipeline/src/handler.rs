//! Per-request handling: translation, classification, submission.
//!
//! [`DialectRequestHandler`] drives one request for an already routed
//! dialect. [`ChangeHook`] puts the router in front of it and is what the
//! HTTP transport calls for every request below the mount point, whatever
//! the method.
//!
//! Translation runs to completion before anything is submitted: the plugin's
//! stream is drained into a list, and the first error in it rejects the whole
//! request. Only a fully translated request reaches the submission pipeline.
//! Translation is synchronous, so a panicking plugin is caught and answered
//! as an internal error.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, info, info_span, Instrument};

use crate::errors::{HookError, TranslationError};
use crate::identifiers::RequestId;
use crate::plugin::ChangeStream;
use crate::record::ChangeRecord;
use crate::registry::PluginRegistry;
use crate::request::WebhookRequest;
use crate::router::{DialectRoute, DialectRouter};
use crate::submission::{ChangeQueue, SubmissionPipeline};

/// Tracing target for request handling.
const HANDLER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::handler");

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Status code and plain-text message returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookResponse {
    /// HTTP status code.
    pub status: u16,
    /// Short human-readable message used as the response body.
    pub message: String,
}

impl HookResponse {
    /// A 200 response with `message`.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: 200,
            message: message.into(),
        }
    }

    /// Response for a request that produced no changes.
    pub fn no_changes() -> Self {
        Self::ok("OK no changes")
    }

    /// Response for a request whose changes were all submitted.
    pub fn submitted(count: usize) -> Self {
        Self::ok(format!("OK {count} changes"))
    }

    /// Response describing `error`.
    pub fn from_error(error: &HookError) -> Self {
        Self {
            status: error.status_code(),
            message: error.to_string(),
        }
    }

    /// Returns `true` for 2xx responses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<HookError> for HookResponse {
    fn from(error: HookError) -> Self {
        Self::from_error(&error)
    }
}

// ---------------------------------------------------------------------------
// Dialect request handler
// ---------------------------------------------------------------------------

/// Handles requests for routed dialects.
#[derive(Clone)]
pub struct DialectRequestHandler {
    registry: Arc<PluginRegistry>,
    queue: Arc<dyn ChangeQueue>,
}

impl std::fmt::Debug for DialectRequestHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectRequestHandler")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl DialectRequestHandler {
    /// Creates a handler translating with `registry` and submitting to `queue`.
    pub fn new(registry: Arc<PluginRegistry>, queue: Arc<dyn ChangeQueue>) -> Self {
        Self { registry, queue }
    }

    /// Translates `request` for the routed dialect into a complete list of
    /// change records.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Internal`] if no plugin serves the dialect or the
    /// plugin panics, and the classified plugin error if translation fails at
    /// any point.
    pub fn translate(
        &self,
        route: &DialectRoute,
        request: &WebhookRequest,
    ) -> Result<Vec<ChangeRecord>, HookError> {
        let plugin = self.registry.get(route.dialect.as_str()).ok_or_else(|| {
            HookError::internal(format!(
                "no plugin registered for dialect '{}'",
                route.dialect
            ))
        })?;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            materialize(plugin.changes(request, &route.dialect, &route.options))
        }));
        match outcome {
            Ok(translated) => translated.map_err(HookError::from),
            Err(payload) => Err(HookError::internal(format!(
                "dialect '{}' panicked: {}",
                route.dialect,
                panic_message(payload.as_ref())
            ))),
        }
    }

    /// Translates and submits one request, returning the response to send.
    pub async fn handle(&self, route: &DialectRoute, request: &WebhookRequest) -> HookResponse {
        let changes = match self.translate(route, request) {
            Ok(changes) => changes,
            Err(err) => {
                if matches!(err, HookError::Internal { .. }) {
                    error!(target: HANDLER_TARGET, error = %err, "dialect failed unexpectedly");
                } else {
                    info!(target: HANDLER_TARGET, error = %err, "request rejected by dialect");
                }
                return HookResponse::from(err);
            }
        };

        if changes.is_empty() {
            info!(target: HANDLER_TARGET, "no dialect generated changes for request");
            return HookResponse::no_changes();
        }
        for change in &changes {
            debug!(target: HANDLER_TARGET, ?change, "dialect produced change");
        }

        let report = SubmissionPipeline::new(self.queue.as_ref())
            .submit(&changes)
            .await;
        info!(
            target: HANDLER_TARGET,
            produced = changes.len(),
            accepted = report.accepted_count(),
            discarded = report.discarded,
            "queued changes"
        );
        match report.into_result() {
            Ok(count) => HookResponse::submitted(count),
            Err(err) => HookResponse::from(HookError::from(err)),
        }
    }
}

/// Drains a change stream, stopping at the first error.
fn materialize(stream: ChangeStream<'_>) -> Result<Vec<ChangeRecord>, TranslationError> {
    stream.collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

// ---------------------------------------------------------------------------
// Change hook
// ---------------------------------------------------------------------------

/// The complete change hook: routing followed by dialect handling.
#[derive(Debug, Clone)]
pub struct ChangeHook {
    router: DialectRouter,
    handler: DialectRequestHandler,
}

impl ChangeHook {
    /// Creates a change hook from its router and handler.
    pub fn new(router: DialectRouter, handler: DialectRequestHandler) -> Self {
        Self { router, handler }
    }

    /// Handles a request whose first path segment below the mount point is
    /// `segment` (empty for the mount point itself).
    pub async fn dispatch(&self, segment: &str, request: &WebhookRequest) -> HookResponse {
        let request_id = RequestId::new_random();
        let span = info_span!(
            target: HANDLER_TARGET,
            "change_hook",
            request_id = %request_id,
            method = %request.method(),
            dialect = segment,
        );
        async {
            let route = match self.router.resolve(segment) {
                Ok(route) => route,
                Err(err) => {
                    info!(
                        target: HANDLER_TARGET,
                        status = err.status_code(),
                        error = %err,
                        "request not routed"
                    );
                    return HookResponse::from(err);
                }
            };
            let response = self.handler.handle(&route, request).await;
            info!(
                target: HANDLER_TARGET,
                status = response.status,
                message = %response.message,
                "request finished"
            );
            response
        }
        .instrument(span)
        .await
    }
}
