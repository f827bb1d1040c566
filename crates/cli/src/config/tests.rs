//! Unit tests for configuration parsing.

use std::net::SocketAddr;

use rstest::rstest;
use serde_json::json;

use super::*;

fn parse(text: &str) -> Result<AppConfig, ConfigError> {
    AppConfig::from_toml(text, Path::new("test.toml"))
}

#[test]
fn empty_file_uses_defaults() {
    let config = parse("").unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.listener.bind, "127.0.0.1:8010".parse::<SocketAddr>().unwrap());
    assert_eq!(config.listener.mount, "/change_hook");
    assert_eq!(config.master, None);
    assert_eq!(config.telemetry.filter, "info");
    assert_eq!(config.telemetry.format, LogFormat::Pretty);
    assert!(config.dialects.is_empty());
}

#[test]
fn full_file_is_parsed() {
    let config = parse(
        r#"
        [listener]
        bind = "0.0.0.0:9000"
        mount = "/hooks"

        [master]
        url = "http://master.example.org/changes"
        timeout_secs = 5

        [telemetry]
        filter = "debug"
        format = "json"
        otlp_endpoint = "http://localhost:4317"

        [dialects]
        base = true
        one = false
        github = { project = "buildbot", category = "push" }
        "#,
    )
    .unwrap();

    assert_eq!(config.listener.bind, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
    assert_eq!(config.listener.mount, "/hooks");
    let master = config.master.unwrap();
    assert_eq!(master.url, "http://master.example.org/changes");
    assert_eq!(master.timeout_secs, 5);
    assert_eq!(config.telemetry.format, LogFormat::Json);
    assert_eq!(
        config.telemetry.otlp_endpoint.as_deref(),
        Some("http://localhost:4317")
    );

    assert!(config.dialects["base"].is_enabled());
    assert!(!config.dialects["one"].is_enabled());
    let github = &config.dialects["github"];
    assert!(github.is_enabled());
    assert_eq!(
        github.as_value(),
        &json!({"project": "buildbot", "category": "push"})
    );
}

#[test]
fn master_timeout_has_a_default() {
    let config = parse("[master]\nurl = \"http://m/changes\"\n").unwrap();
    assert_eq!(config.master.unwrap().timeout_secs, 30);
}

#[rstest]
#[case::unknown_section("[surprise]\nx = 1\n")]
#[case::bad_bind("[listener]\nbind = \"not an address\"\n")]
#[case::bad_format("[telemetry]\nformat = \"xml\"\n")]
#[case::master_without_url("[master]\ntimeout_secs = 3\n")]
fn invalid_files_are_rejected(#[case] text: &str) {
    let err = parse(text).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("test.toml"), "{err}");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let err = AppConfig::load(Some(Path::new("/nonexistent/changehook.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
