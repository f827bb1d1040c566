//! Unit tests for change records.

use rstest::rstest;
use serde_json::json;

use super::*;

#[test]
fn default_record_serialises_every_field() {
    let value = serde_json::to_value(ChangeRecord::new()).unwrap();
    assert_eq!(
        value,
        json!({
            "revision": null,
            "who": null,
            "comments": null,
            "branch": null,
            "category": null,
            "revlink": null,
            "repository": null,
            "project": null,
            "files": [],
            "when": null,
            "properties": {},
        })
    );
}

#[test]
fn discard_flag_is_never_serialised() {
    let record = ChangeRecord {
        discard: true,
        ..ChangeRecord::new()
    };
    let value = serde_json::to_value(&record).unwrap();
    assert!(value.get("discard").is_none());
}

#[test]
fn author_is_accepted_as_alias_for_who() {
    let record: ChangeRecord = serde_json::from_value(json!({ "author": "root" })).unwrap();
    assert_eq!(record.who.as_deref(), Some("root"));
    assert!(record.extra.is_empty());
}

#[test]
fn missing_fields_deserialise_to_defaults() {
    let record: ChangeRecord = serde_json::from_value(json!({})).unwrap();
    assert_eq!(record, ChangeRecord::new());
}

#[rstest]
#[case::number("99", Revision::Number(99))]
#[case::negative("-1", Revision::Number(-1))]
#[case::sha(
    "41a212ee83ca127e3c8cf465891ab7216a705f59",
    Revision::Text("41a212ee83ca127e3c8cf465891ab7216a705f59".to_owned())
)]
#[case::too_large("123456789012345678901234567890", Revision::Text("123456789012345678901234567890".to_owned()))]
fn revision_parse_preserves_numbers(#[case] raw: &str, #[case] expected: Revision) {
    assert_eq!(Revision::parse(raw), expected);
}

#[test]
fn numeric_revision_serialises_as_number() {
    let record = ChangeRecord {
        revision: Some(Revision::Number(99)),
        ..ChangeRecord::new()
    };
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["revision"], json!(99));
}

#[test]
fn validate_accepts_canonical_record() {
    let record = ChangeRecord {
        files: vec!["a.rs".to_owned()],
        ..ChangeRecord::new()
    };
    assert_eq!(record.validate(), Ok(()));
}

#[test]
fn validate_rejects_unknown_field() {
    let mut record = ChangeRecord::new();
    record
        .extra
        .insert("malformed_on_purpose".to_owned(), json!(true));
    let err = record.validate().unwrap_err();
    assert_eq!(
        err,
        RecordError::UnexpectedField {
            field: "malformed_on_purpose".to_owned()
        }
    );
    assert!(err.to_string().contains("malformed_on_purpose"));
}

#[test]
fn validate_rejects_empty_path() {
    let record = ChangeRecord {
        files: vec![String::new()],
        ..ChangeRecord::new()
    };
    assert_eq!(record.validate(), Err(RecordError::EmptyPath));
}
