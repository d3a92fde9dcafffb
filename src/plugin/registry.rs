//! Plugin Registry
//!
//! Explicit name → plugin mapping built once at startup and handed to the
//! pipeline by reference. There is no process-wide registry.

use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::traits::{EnricherPlugin, ScannerPlugin};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of scanner and enricher plugins
#[derive(Default)]
pub struct PluginRegistry {
    scanners: HashMap<String, Arc<dyn ScannerPlugin>>,
    enrichers: HashMap<String, Arc<dyn EnricherPlugin>>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("scanners", &self.scanner_names())
            .field("enrichers", &self.enricher_names())
            .finish()
    }
}

impl PluginRegistry {
    /// Create a new empty plugin registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scanner plugin under its own name
    pub fn register_scanner(&mut self, plugin: Arc<dyn ScannerPlugin>) -> PluginResult<()> {
        let plugin_name = plugin.name().to_string();
        if self.scanners.contains_key(&plugin_name) {
            return Err(PluginError::AlreadyRegistered { plugin_name });
        }
        self.scanners.insert(plugin_name, plugin);
        Ok(())
    }

    /// Register an enricher plugin under its own name
    pub fn register_enricher(&mut self, plugin: Arc<dyn EnricherPlugin>) -> PluginResult<()> {
        let plugin_name = plugin.name().to_string();
        if self.enrichers.contains_key(&plugin_name) {
            return Err(PluginError::AlreadyRegistered { plugin_name });
        }
        self.enrichers.insert(plugin_name, plugin);
        Ok(())
    }

    pub fn scanner(&self, name: &str) -> Option<Arc<dyn ScannerPlugin>> {
        self.scanners.get(name).cloned()
    }

    pub fn enricher(&self, name: &str) -> Option<Arc<dyn EnricherPlugin>> {
        self.enrichers.get(name).cloned()
    }

    pub fn has_scanner(&self, name: &str) -> bool {
        self.scanners.contains_key(name)
    }

    pub fn has_enricher(&self, name: &str) -> bool {
        self.enrichers.contains_key(name)
    }

    /// Sorted scanner names
    pub fn scanner_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scanners.keys().cloned().collect();
        names.sort();
        names
    }

    /// Sorted enricher names
    pub fn enricher_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.enrichers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get total count of registered plugins
    pub fn plugin_count(&self) -> usize {
        self.scanners.len() + self.enrichers.len()
    }
}
