//! Mock plugins shared by the pipeline unit tests

use crate::model::api::{ScanContext, ScanDomain, Severity, UnifiedIssue};
use crate::plugin::api::{EnricherPlugin, PluginError, PluginResult, ScannerPlugin};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub(crate) fn issue(tool: &str, severity: Severity, title: &str) -> UnifiedIssue {
    UnifiedIssue::builder(tool, ScanDomain::Sast, severity, title)
        .rule_id(format!("{}-rule", tool))
        .file_path("src/main.rs")
        .lines(1, None)
        .build()
}

#[derive(Debug, Clone)]
pub(crate) enum ScannerBehavior {
    Issues(Vec<UnifiedIssue>),
    Fail(String),
    Panic(String),
    Unavailable,
    Sleep(Duration, Vec<UnifiedIssue>),
    /// Blocks the calling thread without yielding
    Block(Duration, Vec<UnifiedIssue>),
}

pub(crate) struct MockScanner {
    name: String,
    behavior: ScannerBehavior,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl MockScanner {
    pub(crate) fn new(name: &str, behavior: ScannerBehavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Share counters recording how many scans overlap
    pub(crate) fn track_concurrency(mut self, active: Arc<AtomicUsize>, peak: Arc<AtomicUsize>) -> Self {
        self.active = active;
        self.peak = peak;
        self
    }
}

#[async_trait]
impl ScannerPlugin for MockScanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn domains(&self) -> Vec<ScanDomain> {
        vec![ScanDomain::Sast]
    }

    async fn ensure_binary(&self) -> PluginResult<PathBuf> {
        match self.behavior {
            ScannerBehavior::Unavailable => Err(PluginError::Unavailable {
                plugin_name: self.name.clone(),
                reason: format!("{} not found on PATH", self.name),
            }),
            _ => Ok(PathBuf::from(format!("/usr/bin/{}", self.name))),
        }
    }

    async fn get_version(&self) -> String {
        "1.0.0-mock".to_string()
    }

    async fn scan(&self, _context: &ScanContext) -> PluginResult<Vec<UnifiedIssue>> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let outcome = match &self.behavior {
            ScannerBehavior::Issues(issues) => Ok(issues.clone()),
            ScannerBehavior::Fail(message) => Err(PluginError::execution(&self.name, "scan", message)),
            ScannerBehavior::Panic(message) => panic!("{}", message),
            ScannerBehavior::Unavailable => Ok(Vec::new()),
            ScannerBehavior::Sleep(delay, issues) => {
                tokio::time::sleep(*delay).await;
                Ok(issues.clone())
            }
            ScannerBehavior::Block(delay, issues) => {
                std::thread::sleep(*delay);
                Ok(issues.clone())
            }
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

type Transform = Box<dyn Fn(&[UnifiedIssue]) -> PluginResult<Vec<UnifiedIssue>> + Send + Sync>;

/// Enricher driven by a closure
pub(crate) struct MockEnricher {
    name: String,
    transform: Transform,
}

impl MockEnricher {
    pub(crate) fn new(
        name: &str,
        transform: impl Fn(&[UnifiedIssue]) -> PluginResult<Vec<UnifiedIssue>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            transform: Box::new(transform),
        }
    }

    pub(crate) fn failing(name: &str) -> Self {
        let plugin_name = name.to_string();
        Self::new(name, move |_| {
            Err(PluginError::execution(&plugin_name, "enrich", "enricher broke"))
        })
    }

    /// Appends `suffix` to every title
    pub(crate) fn tagging(name: &str, suffix: &'static str) -> Self {
        Self::new(name, move |issues| {
            Ok(issues
                .iter()
                .map(|i| UnifiedIssue {
                    title: format!("{}{}", i.title, suffix),
                    ..i.clone()
                })
                .collect())
        })
    }
}

#[async_trait]
impl EnricherPlugin for MockEnricher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn enrich(
        &self,
        issues: &[UnifiedIssue],
        _context: &ScanContext,
    ) -> PluginResult<Vec<UnifiedIssue>> {
        (self.transform)(issues)
    }
}
