//! Scan Context
//!
//! Immutable per-run input handed to every plugin. Built once by the caller
//! and shared read-only across concurrent scanner tasks.

use crate::model::domain::ScanDomain;
use crate::streaming::api::{NullStreamHandler, SharedStreamHandler};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Context provided to plugins during a pipeline run
#[derive(Clone)]
pub struct ScanContext {
    project_root: PathBuf,
    paths: Vec<PathBuf>,
    enabled_domains: Vec<ScanDomain>,
    config: BTreeMap<String, serde_json::Value>,
    stream_handler: SharedStreamHandler,
}

impl std::fmt::Debug for ScanContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanContext")
            .field("project_root", &self.project_root)
            .field("paths", &self.paths)
            .field("enabled_domains", &self.enabled_domains)
            .field("config", &self.config.keys().collect::<Vec<_>>())
            .field("stream_handler", &"StreamHandler")
            .finish()
    }
}

impl ScanContext {
    /// Create a context scanning the whole project root
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            paths: vec![project_root.clone()],
            project_root,
            enabled_domains: Vec::new(),
            config: BTreeMap::new(),
            stream_handler: Arc::new(NullStreamHandler),
        }
    }

    /// Replace the target paths; an empty list falls back to the project root
    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = if paths.is_empty() {
            vec![self.project_root.clone()]
        } else {
            paths
        };
        self
    }

    pub fn with_domains(mut self, domains: Vec<ScanDomain>) -> Self {
        self.enabled_domains = domains;
        self
    }

    /// Attach opaque options for the plugin called `plugin_name`
    pub fn with_plugin_config(
        mut self,
        plugin_name: impl Into<String>,
        options: serde_json::Value,
    ) -> Self {
        self.config.insert(plugin_name.into(), options);
        self
    }

    pub fn with_stream_handler(mut self, handler: SharedStreamHandler) -> Self {
        self.stream_handler = handler;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn enabled_domains(&self) -> &[ScanDomain] {
        &self.enabled_domains
    }

    pub fn is_domain_enabled(&self, domain: ScanDomain) -> bool {
        self.enabled_domains.contains(&domain)
    }

    pub fn config(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.config
    }

    /// Options configured for a single plugin
    pub fn plugin_config(&self, plugin_name: &str) -> Option<&serde_json::Value> {
        self.config.get(plugin_name)
    }

    pub fn stream_handler(&self) -> &SharedStreamHandler {
        &self.stream_handler
    }
}
