//! Built-in Plugin Implementations
//!
//! Plugins that ship with the binary: the `dedup` and `ignore` enrichers and
//! the generic command scanner configured through `[scanners.<name>]`.

pub(crate) mod command;
pub(crate) mod dedup;
pub(crate) mod ignore;

use crate::config::api::Config;
use crate::plugin::error::PluginResult;
use crate::plugin::registry::PluginRegistry;
use command::CommandScanner;
use dedup::DedupEnricher;
use ignore::IgnoreEnricher;
use std::sync::Arc;

/// Register the enrichers that are always available
pub fn register_builtins(registry: &mut PluginRegistry) -> PluginResult<()> {
    registry.register_enricher(Arc::new(DedupEnricher::new()))?;
    registry.register_enricher(Arc::new(IgnoreEnricher::new()))?;
    Ok(())
}

impl PluginRegistry {
    /// Registry with the built-ins plus one command scanner per enabled
    /// `[scanners.<name>]` entry
    pub fn from_config(config: &Config) -> PluginResult<Self> {
        let mut registry = PluginRegistry::new();
        register_builtins(&mut registry)?;

        for (name, scanner) in config.scanners.iter().filter(|(_, s)| s.enabled) {
            let plugin = CommandScanner::new(name.clone(), scanner.command.clone(), scanner.domains.clone())
                .with_args(scanner.args.clone())
                .with_append_paths(scanner.append_paths);
            registry.register_scanner(Arc::new(plugin))?;
            log::debug!("Registered command scanner '{}' ({})", name, scanner.command);
        }

        Ok(registry)
    }
}
