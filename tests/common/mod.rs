//! Common test utilities and helpers
//!
//! Mock plugins and fixtures shared by the integration tests.

#![allow(dead_code)]

pub mod plugins;

use lucidshark::model::api::{ScanDomain, Severity, UnifiedIssue};
use lucidshark::plugin::api::{PluginRegistry, ScannerPlugin, EnricherPlugin};
use std::sync::Arc;

/// Issue with a fixed location so ids are stable across runs
pub fn issue(tool: &str, domain: ScanDomain, severity: Severity, title: &str) -> UnifiedIssue {
    UnifiedIssue::builder(tool, domain, severity, title)
        .rule_id(format!("{}-{}", tool, title))
        .file_path("src/main.rs")
        .lines(10, Some(12))
        .build()
}

/// Build a registry from plugin instances
pub fn registry(
    scanners: Vec<Arc<dyn ScannerPlugin>>,
    enrichers: Vec<Arc<dyn EnricherPlugin>>,
) -> Arc<PluginRegistry> {
    let mut registry = PluginRegistry::new();
    for scanner in scanners {
        registry.register_scanner(scanner).unwrap();
    }
    for enricher in enrichers {
        registry.register_enricher(enricher).unwrap();
    }
    Arc::new(registry)
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
