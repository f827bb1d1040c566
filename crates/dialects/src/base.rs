//! The `base` dialect: a change described directly by request arguments.
//!
//! Every canonical field can be given as a query or form argument of the
//! same name. `files` and `properties` are JSON-encoded (a list of paths and
//! an object of string values respectively); `when` is an epoch timestamp;
//! `revision` keeps its numeric form when it is a number. `author` is
//! accepted in place of `who`. Arguments the dialect does not know are
//! ignored.
//!
//! A request without arguments yields one change whose fields are all empty,
//! which makes `base` a convenient liveness probe.

use std::collections::BTreeMap;

use pipeline::{
    ChangeRecord, DialectOptions, LegacyTranslator, Revision, TranslationError, WebhookRequest,
};

/// Module name the translator is registered under.
pub const BASE_DIALECT: &str = "base";

/// Translator for the `base` dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseTranslator;

impl LegacyTranslator for BaseTranslator {
    fn translate(
        &self,
        request: &WebhookRequest,
        _options: &DialectOptions,
    ) -> Result<Vec<ChangeRecord>, TranslationError> {
        let text = |name: &str| request.arg(name).map(str::to_owned);

        let files = match request.arg("files") {
            Some(raw) => serde_json::from_str::<Vec<String>>(raw).map_err(|e| {
                TranslationError::invalid(format!("'files' is not a JSON list of paths: {e}"))
            })?,
            None => Vec::new(),
        };

        let properties = match request.arg("properties") {
            Some(raw) => serde_json::from_str::<BTreeMap<String, String>>(raw).map_err(|e| {
                TranslationError::invalid(format!(
                    "'properties' is not a JSON object of strings: {e}"
                ))
            })?,
            None => BTreeMap::new(),
        };

        let when = request.arg("when").map(parse_when).transpose()?;

        Ok(vec![ChangeRecord {
            revision: request.arg("revision").map(Revision::parse),
            who: text("who").or_else(|| text("author")),
            comments: text("comments"),
            branch: text("branch"),
            category: text("category"),
            revlink: text("revlink"),
            repository: text("repository"),
            project: text("project"),
            files,
            when,
            properties,
            ..ChangeRecord::new()
        }])
    }
}

/// Parses an epoch timestamp given as an integer or a decimal number of
/// seconds. Fractions are truncated.
fn parse_when(raw: &str) -> Result<i64, TranslationError> {
    if let Ok(seconds) = raw.trim().parse::<i64>() {
        return Ok(seconds);
    }
    match raw.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() => Ok(seconds.trunc() as i64),
        _ => Err(TranslationError::invalid(format!(
            "'when' is not an epoch timestamp: {raw}"
        ))),
    }
}
