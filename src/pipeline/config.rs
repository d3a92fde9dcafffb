//! Pipeline configuration

use crate::pipeline::error::{PipelineError, PipelineResult};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// Default number of concurrent scanner workers
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Default per-scanner execution budget
pub const DEFAULT_SCANNER_TIMEOUT: Duration = Duration::from_secs(600);

/// Settings for one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Maximum scanners running at once (ignored in sequential mode)
    pub max_workers: usize,
    /// Run scanners one at a time
    pub sequential: bool,
    /// Explicit enricher order; when non-empty it is used verbatim
    pub enricher_order: Vec<String>,
    /// Enabled enrichers, used in name order when no explicit order is set
    pub enabled_enrichers: BTreeSet<String>,
    pub scanner_timeout: Duration,
    /// Per-scanner overrides of `scanner_timeout`
    pub scanner_timeouts: HashMap<String, Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            sequential: false,
            enricher_order: Vec::new(),
            enabled_enrichers: BTreeSet::new(),
            scanner_timeout: DEFAULT_SCANNER_TIMEOUT,
            scanner_timeouts: HashMap::new(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    pub fn with_enricher_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enricher_order = order.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_enabled_enrichers<I, S>(mut self, enabled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_enrichers = enabled.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scanner_timeout(mut self, timeout: Duration) -> Self {
        self.scanner_timeout = timeout;
        self
    }

    pub fn with_scanner_timeout_for(mut self, scanner: impl Into<String>, timeout: Duration) -> Self {
        self.scanner_timeouts.insert(scanner.into(), timeout);
        self
    }

    /// Timeout applying to the named scanner
    pub fn timeout_for(&self, scanner: &str) -> Duration {
        self.scanner_timeouts
            .get(scanner)
            .copied()
            .unwrap_or(self.scanner_timeout)
    }

    /// Enricher names in the order they will run
    ///
    /// The explicit order wins outright; the enabled set is only consulted
    /// when no explicit order exists. The two are never merged.
    pub fn resolved_enricher_order(&self) -> Vec<String> {
        if !self.enricher_order.is_empty() {
            return self.enricher_order.clone();
        }
        self.enabled_enrichers.iter().cloned().collect()
    }

    /// Worker slots actually used for a run
    pub fn effective_workers(&self) -> usize {
        if self.sequential {
            1
        } else {
            self.max_workers
        }
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.max_workers == 0 {
            return Err(PipelineError::InvalidConfig {
                message: "max_workers must be at least 1".to_string(),
            });
        }
        if self.scanner_timeout.is_zero() {
            return Err(PipelineError::InvalidConfig {
                message: "scanner timeout must be greater than zero".to_string(),
            });
        }
        if let Some((name, _)) = self.scanner_timeouts.iter().find(|(_, t)| t.is_zero()) {
            return Err(PipelineError::InvalidConfig {
                message: format!("timeout for scanner '{}' must be greater than zero", name),
            });
        }
        Ok(())
    }
}
