//! Diagnostic dialects for exercising the change hook end to end.
//!
//! These dialects ignore the request and produce fixed outcomes, which makes
//! them useful for testing software that calls the hook:
//!
//! | Dialect | Outcome |
//! |---------|---------|
//! | `error` | fails with a client error (400) |
//! | `null` | no changes |
//! | `invalid` | one malformed change that the change queue rejects |
//! | `one` | one valid sample change, flagged for discard |
//!
//! The `base` dialect is a legacy translator and lives in [`crate::base`].

use serde_json::Value;

use pipeline::{
    stream_empty, stream_error, stream_from, ChangeRecord, ChangeStream, DialectName,
    DialectOptions, DialectPlugin, Revision, TranslationError, WebhookRequest,
};

/// Name of the dialect that always fails.
pub const ERROR_DIALECT: &str = "error";
/// Name of the dialect that never produces changes.
pub const NULL_DIALECT: &str = "null";
/// Name of the dialect that produces a malformed change.
pub const INVALID_DIALECT: &str = "invalid";
/// Name of the dialect that produces one discarded sample change.
pub const ONE_DIALECT: &str = "one";

const DIALECTS: [&str; 4] = [ERROR_DIALECT, NULL_DIALECT, INVALID_DIALECT, ONE_DIALECT];

/// Field that makes the `invalid` dialect's change malformed.
pub const MALFORMED_FIELD: &str = "malformed_on_purpose";

/// Plugin serving the `error`, `null`, `invalid` and `one` dialects.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiagnosticDialects;

impl DiagnosticDialects {
    /// Creates the plugin.
    pub fn new() -> Self {
        Self
    }
}

impl DialectPlugin for DiagnosticDialects {
    fn dialects(&self) -> Vec<DialectName> {
        DIALECTS.into_iter().filter_map(DialectName::new).collect()
    }

    fn changes<'a>(
        &'a self,
        _request: &'a WebhookRequest,
        dialect: &'a DialectName,
        _options: &'a DialectOptions,
    ) -> ChangeStream<'a> {
        match dialect.as_str() {
            ERROR_DIALECT => stream_error(TranslationError::invalid("Error as per request")),
            NULL_DIALECT => stream_empty(),
            INVALID_DIALECT => stream_from(vec![malformed_change()]),
            ONE_DIALECT => stream_from(vec![sample_change()]),
            other => stream_error(TranslationError::internal(format!(
                "unknown dialect {other}"
            ))),
        }
    }
}

/// The sample change produced by the `one` dialect.
///
/// It is complete and valid, and flagged for discard so that it never
/// reaches the change queue.
pub fn sample_change() -> ChangeRecord {
    ChangeRecord {
        revision: Some(Revision::Number(0)),
        who: Some("root".to_owned()),
        comments: Some("nope".to_owned()),
        branch: Some("trunk".to_owned()),
        category: Some("main".to_owned()),
        revlink: Some("http://example.org/".to_owned()),
        repository: Some("297f711d-216a-466b-9181-f5a93ec79a14".to_owned()),
        project: Some("TestCase".to_owned()),
        files: vec!["/dev/null".to_owned(), "/dev/zero".to_owned()],
        discard: true,
        ..ChangeRecord::new()
    }
}

/// The change produced by the `invalid` dialect: canonical fields at their
/// defaults plus one field outside the canonical shape.
pub fn malformed_change() -> ChangeRecord {
    let mut change = ChangeRecord::new();
    change
        .extra
        .insert(MALFORMED_FIELD.to_owned(), Value::Bool(true));
    change
}
