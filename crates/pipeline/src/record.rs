//! The canonical change record produced by every dialect.
//!
//! A [`ChangeRecord`] is what the master's change queue ultimately receives.
//! Dialects build one record per detected repository change; the submission
//! pipeline consumes each record exactly once.
//!
//! Every field is always present on the wire: absent values serialise as
//! `null` (or an empty list/map) so that downstream consumers see a stable
//! shape regardless of which dialect produced the record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Revision
// ---------------------------------------------------------------------------

/// An opaque revision identifier.
///
/// Version control systems disagree on what a revision looks like: Subversion
/// uses integers, Git uses hex digests. The numeric form is preserved so that
/// a revision submitted as `99` reaches the master as the number `99`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Revision {
    /// A numeric revision (e.g. a Subversion revision number).
    Number(i64),
    /// Any other revision identifier (e.g. a Git commit SHA).
    Text(String),
}

impl Revision {
    /// Interprets a raw request argument as a revision.
    ///
    /// Values that parse as a signed 64-bit integer become
    /// [`Revision::Number`]; everything else is kept verbatim.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(raw.to_owned()),
        }
    }
}

impl From<&str> for Revision {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Revision {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Revision {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeRecord
// ---------------------------------------------------------------------------

/// One repository change, in the shape the master's change queue accepts.
///
/// Records are plain values: dialects fill in whatever they know and leave the
/// rest at the [`Default`]. Fields a dialect sets that are not part of the
/// canonical shape land in [`ChangeRecord::extra`]; such a record is
/// malformed and [`ChangeRecord::validate`] rejects it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Revision identifier of the change.
    pub revision: Option<Revision>,

    /// Author of the change, conventionally `"Name <email>"`.
    #[serde(alias = "author")]
    pub who: Option<String>,

    /// Commit message or other free-form description.
    pub comments: Option<String>,

    /// Branch the change was made on.
    pub branch: Option<String>,

    /// Free-form category used by the master's schedulers for filtering.
    pub category: Option<String>,

    /// URL of a web view of the revision.
    pub revlink: Option<String>,

    /// Repository the change belongs to.
    pub repository: Option<String>,

    /// Project the change belongs to.
    pub project: Option<String>,

    /// Paths touched by the change, in the order the dialect reported them.
    #[serde(default)]
    pub files: Vec<String>,

    /// Time of the change as seconds since the Unix epoch.
    pub when: Option<i64>,

    /// Arbitrary string properties attached to the change.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// When `true` the submission pipeline drops the record; it never reaches
    /// the change queue.
    #[serde(default, skip_serializing)]
    pub discard: bool,

    /// Keys outside the canonical shape.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ChangeRecord {
    /// Creates a record with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the submission pipeline must skip this record.
    pub fn is_discarded(&self) -> bool {
        self.discard
    }

    /// Checks that the record only carries canonical fields.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnexpectedField`] naming the first
    /// non-canonical key, and [`RecordError::EmptyPath`] if `files` contains
    /// an empty path.
    pub fn validate(&self) -> Result<(), RecordError> {
        if let Some(field) = self.extra.keys().next() {
            return Err(RecordError::UnexpectedField {
                field: field.clone(),
            });
        }
        if self.files.iter().any(String::is_empty) {
            return Err(RecordError::EmptyPath);
        }
        Ok(())
    }
}

/// Reasons a [`ChangeRecord`] is not acceptable to a change queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The record carries a key outside the canonical shape.
    #[error("unexpected change field '{field}'")]
    UnexpectedField {
        /// Name of the offending key.
        field: String,
    },

    /// One of the paths in `files` is empty.
    #[error("change lists an empty file path")]
    EmptyPath,
}

#[cfg(test)]
mod tests;
