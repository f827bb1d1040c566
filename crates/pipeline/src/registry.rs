//! Plugin registry for dialect lookup.
//!
//! The [`PluginRegistry`] maps each dialect name to the plugin that serves
//! it. It is filled once at startup through explicit registration calls and
//! then shared read-only between requests, so lookups need no locking.
//!
//! When two plugins claim the same dialect the one registered first keeps it;
//! the conflict is logged and the later claim is ignored.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::identifiers::DialectName;
use crate::plugin::{DialectPlugin, LegacyAdapter, LegacyTranslator};
use crate::router::DialectConfig;

/// Tracing target for registry operations.
const REGISTRY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::registry");

/// Registry of dialect plugins keyed by dialect name.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: HashMap<DialectName, Arc<dyn DialectPlugin>>,
    order: Vec<DialectName>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `plugin` for every dialect it advertises.
    ///
    /// Returns the number of dialects the plugin was actually registered for;
    /// names already taken by an earlier plugin are skipped with a warning.
    pub fn register(&mut self, plugin: Arc<dyn DialectPlugin>) -> usize {
        let mut added = 0;
        for dialect in plugin.dialects() {
            if let Some(existing) = self.plugins.get(&dialect) {
                warn!(
                    target: REGISTRY_TARGET,
                    dialect = %dialect,
                    kept = ?existing,
                    ignored = ?plugin,
                    "dialect already registered; keeping first registration"
                );
                continue;
            }
            info!(
                target: REGISTRY_TARGET,
                dialect = %dialect,
                plugin = ?plugin,
                "registered dialect"
            );
            self.order.push(dialect.clone());
            self.plugins.insert(dialect, Arc::clone(&plugin));
            added += 1;
        }
        added
    }

    /// Wraps a single-function translator in a [`LegacyAdapter`] named
    /// `dialect` and registers it.
    ///
    /// Returns `true` if the dialect was free.
    pub fn register_legacy(
        &mut self,
        dialect: DialectName,
        translator: Box<dyn LegacyTranslator>,
    ) -> bool {
        self.register(Arc::new(LegacyAdapter::new(dialect, translator))) == 1
    }

    /// Looks up the plugin serving `dialect`.
    #[must_use]
    pub fn get(&self, dialect: &str) -> Option<&Arc<dyn DialectPlugin>> {
        self.plugins.get(dialect)
    }

    /// Returns `true` if some plugin serves `dialect`.
    #[must_use]
    pub fn contains(&self, dialect: &str) -> bool {
        self.plugins.contains_key(dialect)
    }

    /// Returns the registered dialect names in registration order.
    pub fn dialects(&self) -> impl Iterator<Item = &DialectName> {
        self.order.iter()
    }

    /// Returns the number of registered dialects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` when no dialects are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Logs every registered dialect together with its configured state, and
    /// every configured dialect that no plugin serves.
    pub fn announce(&self, config: &DialectConfig) {
        for dialect in &self.order {
            let enabled = config.is_enabled(dialect.as_str());
            info!(
                target: REGISTRY_TARGET,
                dialect = %dialect,
                enabled,
                "dialect available"
            );
        }
        for (name, options) in config.iter() {
            if options.is_enabled() && !self.contains(name) {
                warn!(
                    target: REGISTRY_TARGET,
                    dialect = %name,
                    "dialect enabled in configuration but no plugin serves it"
                );
            }
        }
    }
}
