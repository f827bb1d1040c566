//! Unit tests for the plugin contract and the legacy adapter.

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::request::HttpMethod;

struct EchoBranch;

impl LegacyTranslator for EchoBranch {
    fn translate(
        &self,
        request: &WebhookRequest,
        _options: &DialectOptions,
    ) -> Result<Vec<ChangeRecord>, TranslationError> {
        match request.arg("branch") {
            Some(branch) => Ok(vec![ChangeRecord {
                branch: Some(branch.to_owned()),
                ..ChangeRecord::new()
            }]),
            None => Err(TranslationError::invalid("branch missing")),
        }
    }
}

fn adapter() -> LegacyAdapter {
    LegacyAdapter::new(DialectName::new("echo").unwrap(), Box::new(EchoBranch))
}

#[rstest]
#[case::bool_true(json!(true), true)]
#[case::bool_false(json!(false), false)]
#[case::null(json!(null), false)]
#[case::zero(json!(0), false)]
#[case::one(json!(1), true)]
#[case::empty_string(json!(""), false)]
#[case::string(json!("yes"), true)]
#[case::empty_table(json!({}), false)]
#[case::table(json!({ "project": "p" }), true)]
#[case::empty_list(json!([]), false)]
fn options_truthiness(#[case] value: Value, #[case] enabled: bool) {
    assert_eq!(DialectOptions::new(value).is_enabled(), enabled);
}

#[test]
fn options_expose_string_keys() {
    let options = DialectOptions::new(json!({ "project": "buildbot", "n": 1 }));
    assert_eq!(options.get_str("project"), Some("buildbot"));
    assert_eq!(options.get_str("n"), None);
    assert_eq!(DialectOptions::enabled().get_str("project"), None);
}

#[test]
fn legacy_adapter_serves_its_module_name() {
    let names = adapter().dialects();
    assert_eq!(names, vec![DialectName::new("echo").unwrap()]);
    assert_eq!(format!("{:?}", adapter()), "<LegacyAdapter: echo>");
}

#[test]
fn legacy_adapter_yields_translated_records() {
    let plugin = adapter();
    let request = WebhookRequest::new(HttpMethod::Post).with_arg("branch", "main");
    let dialect = DialectName::new("echo").unwrap();
    let options = DialectOptions::enabled();
    let records: Vec<_> = plugin.changes(&request, &dialect, &options).collect();
    assert_eq!(records.len(), 1);
    let record = records.into_iter().next().unwrap().unwrap();
    assert_eq!(record.branch.as_deref(), Some("main"));
}

#[test]
fn legacy_adapter_surfaces_translator_error() {
    let plugin = adapter();
    let request = WebhookRequest::new(HttpMethod::Get);
    let dialect = DialectName::new("echo").unwrap();
    let options = DialectOptions::enabled();
    let result: Result<Vec<_>, _> = plugin.changes(&request, &dialect, &options).collect();
    assert_eq!(result, Err(TranslationError::invalid("branch missing")));
}

#[test]
fn legacy_adapter_rejects_foreign_dialect() {
    let plugin = adapter();
    let request = WebhookRequest::new(HttpMethod::Get);
    let dialect = DialectName::new("other").unwrap();
    let options = DialectOptions::enabled();
    let result: Result<Vec<_>, _> = plugin.changes(&request, &dialect, &options).collect();
    assert!(matches!(result, Err(TranslationError::Internal { .. })));
}
