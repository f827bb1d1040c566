//! Dialect routing for the change hook.
//!
//! The router turns the first path segment below the mount point into a
//! [`DialectRoute`] or a [`HookError`]. Rules, in order:
//!
//! 1. An empty segment means [`DEFAULT_DIALECT`].
//! 2. [`SYNC_CALL_PATH`] is reserved and not implemented.
//! 3. A segment missing from the configuration is an unknown dialect.
//! 4. A configured but falsy dialect is disabled.
//! 5. Anything else routes to the dialect with its configured options.
//!
//! The configuration is a plain value handed to the router at construction.
//! The diagnostic dialects are always present in it and default to disabled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::HookError;
use crate::identifiers::DialectName;
use crate::plugin::DialectOptions;

/// Tracing target for routing decisions.
const ROUTER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::router");

/// Dialect served when the path segment is empty.
pub const DEFAULT_DIALECT: &str = "base";

/// Reserved path segment for synchronous submission.
pub const SYNC_CALL_PATH: &str = "sync_call";

/// Diagnostic dialects that are always known to the router.
pub const DIAGNOSTIC_DIALECTS: [&str; 5] = ["base", "error", "invalid", "null", "one"];

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Mapping from dialect name to its configured options.
///
/// Deserialises from a table such as:
///
/// ```toml
/// [dialects]
/// base = true
/// error = false
/// github = { project = "buildbot", category = "push" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialectConfig {
    dialects: BTreeMap<String, DialectOptions>,
}

impl DialectConfig {
    /// Configuration listing only the diagnostic dialects, all disabled.
    pub fn builtin() -> Self {
        let dialects = DIAGNOSTIC_DIALECTS
            .iter()
            .map(|name| ((*name).to_owned(), DialectOptions::disabled()))
            .collect();
        Self { dialects }
    }

    /// Builds the effective configuration: the diagnostic dialects, disabled,
    /// overridden by every entry in `configured`.
    pub fn from_user(configured: BTreeMap<String, DialectOptions>) -> Self {
        let mut config = Self::builtin();
        config.dialects.extend(configured);
        config
    }

    /// Returns a copy of this configuration with `name` set to `options`.
    #[must_use]
    pub fn with_dialect(mut self, name: impl Into<String>, options: DialectOptions) -> Self {
        self.dialects.insert(name.into(), options);
        self
    }

    /// Returns the options configured for `name`, enabled or not.
    pub fn get(&self, name: &str) -> Option<&DialectOptions> {
        self.dialects.get(name)
    }

    /// Returns `true` if `name` is configured and enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).is_some_and(DialectOptions::is_enabled)
    }

    /// Iterates over configured dialects in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DialectOptions)> {
        self.dialects
            .iter()
            .map(|(name, options)| (name.as_str(), options))
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// A resolved dialect together with the options to hand to its plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct DialectRoute {
    /// Dialect that will handle the request.
    pub dialect: DialectName,
    /// Options configured for the dialect.
    pub options: DialectOptions,
}

/// Routes path segments to configured dialects.
#[derive(Debug, Clone, Default)]
pub struct DialectRouter {
    config: DialectConfig,
}

impl DialectRouter {
    /// Creates a router over `config`.
    pub fn new(config: DialectConfig) -> Self {
        Self { config }
    }

    /// Resolves the first path segment below the mount point.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::NotImplemented`] for the reserved
    /// [`SYNC_CALL_PATH`] and [`HookError::NotFound`] for unknown or disabled
    /// dialects.
    pub fn resolve(&self, segment: &str) -> Result<DialectRoute, HookError> {
        let name = if segment.is_empty() {
            DEFAULT_DIALECT
        } else {
            segment
        };

        if name == SYNC_CALL_PATH {
            return Err(HookError::not_implemented("synchronized call not implemented"));
        }

        let Some(options) = self.config.get(name) else {
            debug!(target: ROUTER_TARGET, dialect = name, "unknown dialect");
            return Err(HookError::not_found(format!(
                "unknown change hook dialect '{name}'"
            )));
        };

        if !options.is_enabled() {
            debug!(target: ROUTER_TARGET, dialect = name, "dialect disabled");
            return Err(HookError::not_found(format!(
                "dialect '{name}' is disabled for this change hook"
            )));
        }

        let dialect = DialectName::new(name)
            .ok_or_else(|| HookError::internal("empty dialect name after defaulting"))?;
        debug!(target: ROUTER_TARGET, dialect = name, "routing request");
        Ok(DialectRoute {
            dialect,
            options: options.clone(),
        })
    }
}

#[cfg(test)]
mod tests;
