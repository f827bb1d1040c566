//! The dialect plugin contract.
//!
//! A [`DialectPlugin`] advertises the dialect names it serves and turns a
//! [`WebhookRequest`] into a lazy [`ChangeStream`]. Older translators that
//! expose a single `translate(request, options)` operation implement
//! [`LegacyTranslator`] instead and are wrapped by [`LegacyAdapter`], which
//! presents them as a one-dialect plugin.
//!
//! ## Architectural Layer
//!
//! **Port definition.** Concrete dialects live in the `dialects` crate. The
//! router and the request handler only see these traits.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::TranslationError;
use crate::identifiers::DialectName;
use crate::record::ChangeRecord;
use crate::request::WebhookRequest;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configured value of one dialect.
///
/// A falsy value (`false`, `null`, `0`, `""`, an empty list or table)
/// disables the dialect. Any other value enables it and is handed to the
/// plugin verbatim as its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialectOptions(Value);

impl DialectOptions {
    /// Wraps a raw configuration value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Options that enable a dialect without configuring it.
    pub fn enabled() -> Self {
        Self(Value::Bool(true))
    }

    /// Options that disable a dialect.
    pub fn disabled() -> Self {
        Self(Value::Bool(false))
    }

    /// Returns `true` if the value enables the dialect.
    pub fn is_enabled(&self) -> bool {
        match &self.0 {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        }
    }

    /// Looks up a string option when the options are a table.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns the raw configuration value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl Default for DialectOptions {
    fn default() -> Self {
        Self::disabled()
    }
}

impl From<bool> for DialectOptions {
    fn from(enabled: bool) -> Self {
        Self(Value::Bool(enabled))
    }
}

// ---------------------------------------------------------------------------
// Change streams
// ---------------------------------------------------------------------------

/// Lazy sequence of change records produced by a plugin.
///
/// Each item is either a record or the error that ended translation. The
/// request handler drains the stream completely before submitting anything,
/// so a failure late in the stream still rejects the whole request.
pub type ChangeStream<'a> =
    Box<dyn Iterator<Item = Result<ChangeRecord, TranslationError>> + Send + 'a>;

/// Builds a stream from records that are already materialised.
pub fn stream_from<'a>(records: Vec<ChangeRecord>) -> ChangeStream<'a> {
    Box::new(records.into_iter().map(Ok))
}

/// Builds a stream that fails immediately.
pub fn stream_error<'a>(error: TranslationError) -> ChangeStream<'a> {
    Box::new(std::iter::once(Err(error)))
}

/// Builds a stream that yields nothing.
pub fn stream_empty<'a>() -> ChangeStream<'a> {
    Box::new(std::iter::empty())
}

// ---------------------------------------------------------------------------
// Plugin traits
// ---------------------------------------------------------------------------

/// A translator from webhook requests to change records.
///
/// One plugin may serve several dialects; it is asked for the dialect by name
/// on every call.
pub trait DialectPlugin: Send + Sync + fmt::Debug {
    /// Names of the dialects this plugin serves.
    fn dialects(&self) -> Vec<DialectName>;

    /// Translates `request` for `dialect` using the configured `options`.
    ///
    /// Errors are reported through the stream, either as its first item or
    /// after some records have already been yielded.
    fn changes<'a>(
        &'a self,
        request: &'a WebhookRequest,
        dialect: &'a DialectName,
        options: &'a DialectOptions,
    ) -> ChangeStream<'a>;
}

/// A single-function translator serving exactly one dialect.
pub trait LegacyTranslator: Send + Sync {
    /// Translates `request` into change records.
    ///
    /// # Errors
    ///
    /// Returns a [`TranslationError`] describing why the request could not be
    /// translated.
    fn translate(
        &self,
        request: &WebhookRequest,
        options: &DialectOptions,
    ) -> Result<Vec<ChangeRecord>, TranslationError>;
}

/// Presents a [`LegacyTranslator`] as a [`DialectPlugin`] serving one dialect
/// named after the translator's module.
pub struct LegacyAdapter {
    dialect: DialectName,
    translator: Box<dyn LegacyTranslator>,
}

impl LegacyAdapter {
    /// Wraps `translator` as the plugin for `dialect`.
    pub fn new(dialect: DialectName, translator: Box<dyn LegacyTranslator>) -> Self {
        Self {
            dialect,
            translator,
        }
    }
}

impl fmt::Debug for LegacyAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<LegacyAdapter: {}>", self.dialect)
    }
}

impl DialectPlugin for LegacyAdapter {
    fn dialects(&self) -> Vec<DialectName> {
        vec![self.dialect.clone()]
    }

    fn changes<'a>(
        &'a self,
        request: &'a WebhookRequest,
        dialect: &'a DialectName,
        options: &'a DialectOptions,
    ) -> ChangeStream<'a> {
        if dialect != &self.dialect {
            return stream_error(TranslationError::internal(format!(
                "legacy adapter for '{}' asked for dialect '{dialect}'",
                self.dialect
            )));
        }
        match self.translator.translate(request, options) {
            Ok(records) => stream_from(records),
            Err(error) => stream_error(error),
        }
    }
}

#[cfg(test)]
mod tests;
