//! Unit tests for dialect routing.

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;

#[fixture]
fn unconfigured() -> DialectRouter {
    DialectRouter::new(DialectConfig::builtin())
}

#[fixture]
fn configured() -> DialectRouter {
    let config = DIAGNOSTIC_DIALECTS
        .iter()
        .fold(DialectConfig::builtin(), |config, name| {
            config.with_dialect(*name, DialectOptions::enabled())
        })
        .with_dialect("github", DialectOptions::new(json!({ "project": "p" })))
        .with_dialect("gitlab", DialectOptions::disabled());
    DialectRouter::new(config)
}

fn not_found_message(result: Result<DialectRoute, HookError>) -> String {
    match result {
        Err(err @ HookError::NotFound { .. }) => err.to_string().to_lowercase(),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[rstest]
#[case::base("base")]
#[case::error("error")]
#[case::invalid("invalid")]
#[case::null("null")]
#[case::one("one")]
#[case::empty("")]
fn builtin_dialects_disabled_by_default(unconfigured: DialectRouter, #[case] segment: &str) {
    let message = not_found_message(unconfigured.resolve(segment));
    assert!(message.contains("disabled"), "{message}");
}

#[rstest]
#[case::unknown("no_such_dialect")]
#[case::provider("github")]
fn unconfigured_dialect_is_unknown(unconfigured: DialectRouter, #[case] segment: &str) {
    let message = not_found_message(unconfigured.resolve(segment));
    assert!(message.contains("unknown"), "{message}");
    assert!(message.contains(segment), "{message}");
}

#[rstest]
fn configured_but_disabled_provider(configured: DialectRouter) {
    let message = not_found_message(configured.resolve("gitlab"));
    assert!(message.contains("disabled"));
}

#[rstest]
fn empty_segment_defaults_to_base(configured: DialectRouter) {
    let empty = configured.resolve("").unwrap();
    let base = configured.resolve("base").unwrap();
    assert_eq!(empty, base);
    assert_eq!(empty.dialect.as_str(), DEFAULT_DIALECT);
}

#[rstest]
fn sync_call_is_not_implemented(configured: DialectRouter, unconfigured: DialectRouter) {
    for router in [configured, unconfigured] {
        let err = router.resolve(SYNC_CALL_PATH).unwrap_err();
        assert!(matches!(err, HookError::NotImplemented { .. }));
        assert_eq!(err.status_code(), 501);
    }
}

#[rstest]
fn options_are_passed_verbatim(configured: DialectRouter) {
    let route = configured.resolve("github").unwrap();
    assert_eq!(route.dialect.as_str(), "github");
    assert_eq!(route.options.as_value(), &json!({ "project": "p" }));
}

#[test]
fn user_configuration_overrides_builtins() {
    let mut user = BTreeMap::new();
    user.insert("null".to_owned(), DialectOptions::enabled());
    user.insert("github".to_owned(), DialectOptions::enabled());
    let config = DialectConfig::from_user(user);
    assert!(config.is_enabled("null"));
    assert!(config.is_enabled("github"));
    assert!(!config.is_enabled("one"));
    assert!(config.get("one").is_some());
    assert!(config.get("gitlab").is_none());
}

#[test]
fn configuration_deserialises_from_mixed_values() {
    let config: DialectConfig =
        serde_json::from_value(json!({ "base": true, "github": { "project": "x" }, "one": false }))
            .unwrap();
    assert!(config.is_enabled("base"));
    assert!(config.is_enabled("github"));
    assert!(!config.is_enabled("one"));
    assert_eq!(config.get("github").and_then(|o| o.get_str("project")), Some("x"));
}
