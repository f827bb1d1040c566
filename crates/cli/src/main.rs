//! `changehook` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: read the TOML file and apply command-line
//!    overrides.
//! 2. **Wire observability**: install `tracing-subscriber` with the configured
//!    filter and format, plus an OpenTelemetry OTLP exporter when an endpoint
//!    is configured.
//! 3. **Construct infrastructure**: register the built-in dialects, pick the
//!    change queue (HTTP client for the master, or in memory), and assemble
//!    the [`pipeline::ChangeHook`].
//! 4. **Serve** until interrupted, then drain in-flight requests.

mod config;
mod telemetry;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use master_client::{HttpChangeQueue, InMemoryChangeQueue};
use pipeline::{ChangeHook, ChangeQueue, DialectConfig, DialectRequestHandler, DialectRouter};

use crate::config::AppConfig;

/// Receives change notifications over HTTP and feeds them to the build
/// master's change queue.
#[derive(Debug, Parser)]
#[command(name = "changehook", version, about)]
struct Args {
    /// Configuration file (defaults to ./changehook.toml when present).
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configuration file.
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(bind) = args.bind {
        config.listener.bind = bind;
    }

    let _telemetry = telemetry::init(&config.telemetry).context("initialising telemetry")?;
    run(config).await
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let registry = dialects::builtin_registry();
    let dialect_config = DialectConfig::from_user(config.dialects);
    registry.announce(&dialect_config);

    let queue: Arc<dyn ChangeQueue> = match &config.master {
        Some(master) => {
            let queue = HttpChangeQueue::new(master).context("configuring master client")?;
            info!(endpoint = %queue.endpoint(), "submitting changes to master");
            Arc::new(queue)
        }
        None => {
            warn!("no [master] configured; accepted changes are held in memory only");
            Arc::new(InMemoryChangeQueue::new())
        }
    };

    let handler = DialectRequestHandler::new(Arc::new(registry), queue);
    let hook = Arc::new(ChangeHook::new(DialectRouter::new(dialect_config), handler));

    listener::serve(&config.listener, hook, shutdown_signal())
        .await
        .context("serving change hook")?;
    Ok(())
}

/// Resolves on Ctrl-C. If the signal handler cannot be installed the server
/// runs until killed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested; draining in-flight requests"),
        Err(e) => {
            error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
