//! Serve loop lifecycle.

use std::sync::Arc;

use tokio::net::TcpListener;

use dialects::builtin_registry;
use listener::{serve, serve_on, ListenerConfig, ListenerError};
use master_client::InMemoryChangeQueue;
use pipeline::{ChangeHook, DialectConfig, DialectRequestHandler, DialectRouter};

fn hook() -> Arc<ChangeHook> {
    let handler = DialectRequestHandler::new(
        Arc::new(builtin_registry()),
        Arc::new(InMemoryChangeQueue::new()),
    );
    Arc::new(ChangeHook::new(
        DialectRouter::new(DialectConfig::builtin()),
        handler,
    ))
}

#[tokio::test]
async fn stops_when_shutdown_resolves() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let result = serve_on(listener, "/change_hook", hook(), async {}).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn address_in_use_is_a_bind_error() {
    let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = ListenerConfig {
        bind: taken.local_addr().unwrap(),
        ..ListenerConfig::default()
    };
    let err = serve(&config, hook(), async {}).await.unwrap_err();
    assert!(matches!(err, ListenerError::Bind { .. }), "{err}");
}

#[test]
fn defaults_match_the_conventional_mount() {
    let config = ListenerConfig::default();
    assert_eq!(config.bind.to_string(), "127.0.0.1:8010");
    assert_eq!(config.mount, "/change_hook");
}
