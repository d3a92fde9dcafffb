//! Public API for the plugin system
//!
//! External modules should import from here rather than directly from
//! internal modules.

// Plugin contracts
pub use crate::plugin::traits::{EnricherPlugin, ScannerPlugin};

// Error handling
pub use crate::plugin::error::{PluginError, PluginResult};

// Registry
pub use crate::plugin::registry::PluginRegistry;

// Built-in plugins
pub use crate::plugin::builtin::command::CommandScanner;
pub use crate::plugin::builtin::dedup::{DedupEnricher, DEDUP_ENRICHER};
pub use crate::plugin::builtin::ignore::{IgnoreEnricher, IgnorePatterns, IGNORE_ENRICHER};
pub use crate::plugin::builtin::register_builtins;
