//! Scripted scanner and enricher plugins

use async_trait::async_trait;
use lucidshark::model::api::{ScanContext, ScanDomain, UnifiedIssue};
use lucidshark::plugin::api::{EnricherPlugin, PluginError, PluginResult, ScannerPlugin};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a [`ScriptedScanner`] does when asked to scan
#[derive(Debug, Clone)]
pub enum Script {
    Report(Vec<UnifiedIssue>),
    ReportAfter(Duration, Vec<UnifiedIssue>),
    Fail(&'static str),
    Panic(&'static str),
    Missing,
}

pub struct ScriptedScanner {
    name: String,
    domains: Vec<ScanDomain>,
    script: Script,
    scans: Arc<AtomicUsize>,
}

impl ScriptedScanner {
    pub fn new(name: &str, script: Script) -> Self {
        Self {
            name: name.to_string(),
            domains: vec![ScanDomain::Sast],
            script,
            scans: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_domains(mut self, domains: Vec<ScanDomain>) -> Self {
        self.domains = domains;
        self
    }

    /// Shared counter of `scan` calls
    pub fn scan_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.scans)
    }

    pub fn shared(self) -> Arc<dyn ScannerPlugin> {
        Arc::new(self)
    }
}

#[async_trait]
impl ScannerPlugin for ScriptedScanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn domains(&self) -> Vec<ScanDomain> {
        self.domains.clone()
    }

    async fn ensure_binary(&self) -> PluginResult<PathBuf> {
        match self.script {
            Script::Missing => Err(PluginError::Unavailable {
                plugin_name: self.name.clone(),
                reason: format!("{} is not installed", self.name),
            }),
            _ => Ok(PathBuf::from("/opt/tools").join(&self.name)),
        }
    }

    async fn get_version(&self) -> String {
        "2.1.0".to_string()
    }

    async fn scan(&self, _context: &ScanContext) -> PluginResult<Vec<UnifiedIssue>> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Report(issues) => Ok(issues.clone()),
            Script::ReportAfter(delay, issues) => {
                tokio::time::sleep(*delay).await;
                Ok(issues.clone())
            }
            Script::Fail(message) => Err(PluginError::execution(&self.name, "scan", message)),
            Script::Panic(message) => panic!("{}", message),
            Script::Missing => Ok(Vec::new()),
        }
    }
}

/// Enricher that appends a marker to every title and records its calls
pub struct MarkingEnricher {
    name: String,
    marker: &'static str,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MarkingEnricher {
    pub fn new(name: &str, marker: &'static str, calls: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            marker,
            calls,
        }
    }
}

#[async_trait]
impl EnricherPlugin for MarkingEnricher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn enrich(
        &self,
        issues: &[UnifiedIssue],
        _context: &ScanContext,
    ) -> PluginResult<Vec<UnifiedIssue>> {
        self.calls.lock().unwrap().push(self.name.clone());
        Ok(issues
            .iter()
            .map(|issue| UnifiedIssue {
                title: format!("{}{}", issue.title, self.marker),
                ..issue.clone()
            })
            .collect())
    }
}

/// Enricher that always fails
pub struct BrokenEnricher(pub &'static str);

#[async_trait]
impl EnricherPlugin for BrokenEnricher {
    fn name(&self) -> &str {
        self.0
    }

    async fn enrich(
        &self,
        _issues: &[UnifiedIssue],
        _context: &ScanContext,
    ) -> PluginResult<Vec<UnifiedIssue>> {
        Err(PluginError::execution(self.0, "enrich", "lookup service unreachable"))
    }
}
