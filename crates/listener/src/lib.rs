//! HTTP surface of the change hook.
//!
//! Binds an axum server and forwards every `GET` or `POST` below the mount
//! point (default `/change_hook`) to [`pipeline::ChangeHook::dispatch`]:
//!
//! | Path | Dialect segment |
//! |------|-----------------|
//! | `/change_hook` | empty (the default dialect) |
//! | `/change_hook/` | empty (the default dialect) |
//! | `/change_hook/{dialect}` | `{dialect}` |
//!
//! Any deeper path, and anything outside the mount point, is 404.
//!
//! Query string arguments and `application/x-www-form-urlencoded` bodies are
//! merged into the request's arguments; headers and the raw body are passed
//! through untouched. The response is the hook's status code with its
//! message as a plain-text body.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** The [`pipeline`] crate sees only
//! [`pipeline::WebhookRequest`] and returns [`pipeline::HookResponse`].

mod extract;
mod routes;

use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use pipeline::ChangeHook;

pub use extract::webhook_request;
pub use routes::router;

/// Tracing target for the HTTP surface.
const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// Default mount point of the change hook.
pub const DEFAULT_MOUNT: &str = "/change_hook";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8010;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Where the change hook listens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Socket address to bind.
    pub bind: SocketAddr,
    /// Path the change hook is mounted at.
    pub mount: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            mount: DEFAULT_MOUNT.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by the serve loop.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The server failed while running.
    #[error("change hook server failed: {0}")]
    Serve(#[source] std::io::Error),
}

// ---------------------------------------------------------------------------
// Serve loop
// ---------------------------------------------------------------------------

/// Binds `config.bind` and serves the change hook until `shutdown` resolves.
///
/// In-flight requests are allowed to finish after `shutdown` resolves.
///
/// # Errors
///
/// Returns [`ListenerError::Bind`] if the address cannot be bound and
/// [`ListenerError::Serve`] if the server fails.
pub async fn serve<F>(
    config: &ListenerConfig,
    hook: Arc<ChangeHook>,
    shutdown: F,
) -> Result<(), ListenerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| ListenerError::Bind {
            addr: config.bind,
            source,
        })?;
    serve_on(listener, &config.mount, hook, shutdown).await
}

/// Serves the change hook on an already bound `listener`.
///
/// # Errors
///
/// Returns [`ListenerError::Serve`] if the server fails.
pub async fn serve_on<F>(
    listener: TcpListener,
    mount: &str,
    hook: Arc<ChangeHook>,
    shutdown: F,
) -> Result<(), ListenerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr().map_err(ListenerError::Serve)?;
    info!(target: LISTENER_TARGET, %address, mount, "change hook listening");

    axum::serve(listener, router(hook, mount))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ListenerError::Serve)?;

    info!(target: LISTENER_TARGET, "change hook stopped");
    Ok(())
}
