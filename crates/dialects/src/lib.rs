//! Built-in change hook dialects.
//!
//! | Dialect | Kind | Module |
//! |---------|------|--------|
//! | `base` | legacy translator | [`base`] |
//! | `github` | legacy translator | [`github`] |
//! | `error`, `null`, `invalid`, `one` | plugin | [`diagnostic`] |
//!
//! ## Architectural Layer
//!
//! **Adapters.** Each dialect turns the transport-neutral
//! [`pipeline::WebhookRequest`] into canonical [`pipeline::ChangeRecord`]s.
//! Nothing here performs I/O or knows about HTTP beyond the request model.
//!
//! Registration does not enable a dialect: the router only serves dialects
//! that the configuration enables, so the diagnostic dialects stay off unless
//! explicitly switched on.

pub mod base;
pub mod diagnostic;
pub mod github;

use std::sync::Arc;

use pipeline::{DialectName, PluginRegistry};

pub use base::{BaseTranslator, BASE_DIALECT};
pub use diagnostic::{
    DiagnosticDialects, ERROR_DIALECT, INVALID_DIALECT, MALFORMED_FIELD, NULL_DIALECT, ONE_DIALECT,
};
pub use github::{GitHubTranslator, GITHUB_DIALECT};

/// Registers every built-in dialect with `registry`.
///
/// Dialects already present in `registry` keep their existing plugin.
pub fn register_builtins(registry: &mut PluginRegistry) {
    registry.register(Arc::new(DiagnosticDialects::new()));
    if let Some(name) = DialectName::new(BASE_DIALECT) {
        registry.register_legacy(name, Box::new(BaseTranslator));
    }
    if let Some(name) = DialectName::new(GITHUB_DIALECT) {
        registry.register_legacy(name, Box::new(GitHubTranslator));
    }
}

/// Returns a registry holding only the built-in dialects.
pub fn builtin_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    register_builtins(&mut registry);
    registry
}
