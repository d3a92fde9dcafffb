//! Configuration types
//!
//! ```toml
//! [pipeline]
//! max_workers = 4
//! sequential = false
//! enrichers = ["ignore", "dedup"]
//! scanner_timeout_secs = 600
//!
//! [scanners.semgrep]
//! command = "semgrep-json"
//! args = ["--config", "auto"]
//! domains = ["sast"]
//!
//! [enrichers.ignore.options]
//! patterns = ["tests/", "*.generated.rs"]
//!
//! [fail_on]
//! default = "high"
//! linting = "error"
//! ```

use crate::config::error::{ConfigError, ConfigResult};
use crate::model::api::ScanDomain;
use crate::pipeline::api::{PipelineConfig, DEFAULT_MAX_WORKERS};
use crate::report::api::FailOn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

const DEFAULT_SCANNER_TIMEOUT_SECS: u64 = 600;

/// Root of `lucidshark.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub pipeline: PipelineSection,
    pub scanners: BTreeMap<String, ScannerConfig>,
    pub enrichers: BTreeMap<String, EnricherConfig>,
    pub fail_on: FailOn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSection {
    pub max_workers: usize,
    pub sequential: bool,
    /// Explicit enricher order; when empty, enabled enrichers run by name
    pub enrichers: Vec<String>,
    pub scanner_timeout_secs: u64,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            sequential: false,
            enrichers: Vec::new(),
            scanner_timeout_secs: DEFAULT_SCANNER_TIMEOUT_SECS,
        }
    }
}

/// `[scanners.<name>]`: an external command scanner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScannerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub domains: Vec<ScanDomain>,
    /// Append the target paths after `args`
    #[serde(default = "default_true")]
    pub append_paths: bool,
    /// Overrides `pipeline.scanner_timeout_secs` for this scanner
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "empty_options", skip_serializing_if = "is_empty_options")]
    pub options: serde_json::Value,
}

/// `[enrichers.<name>]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnricherConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "empty_options", skip_serializing_if = "is_empty_options")]
    pub options: serde_json::Value,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            options: empty_options(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn empty_options() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn is_empty_options(value: &serde_json::Value) -> bool {
    value.as_object().is_some_and(|map| map.is_empty())
}

impl Config {
    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.pipeline.max_workers == 0 {
            return Err(ConfigError::invalid("pipeline.max_workers must be at least 1"));
        }
        if self.pipeline.scanner_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "pipeline.scanner_timeout_secs must be greater than zero",
            ));
        }
        for (name, scanner) in &self.scanners {
            if scanner.command.trim().is_empty() {
                return Err(ConfigError::invalid(format!(
                    "scanners.{}.command must not be empty",
                    name
                )));
            }
            if scanner.timeout_secs == Some(0) {
                return Err(ConfigError::invalid(format!(
                    "scanners.{}.timeout_secs must be greater than zero",
                    name
                )));
            }
        }
        let unknown = self.fail_on.unknown_groups();
        if !unknown.is_empty() {
            return Err(ConfigError::invalid(format!(
                "unknown fail_on group(s): {}",
                unknown.join(", ")
            )));
        }
        Ok(())
    }

    /// Names of configured scanners with `enabled = true`, sorted
    pub fn enabled_scanner_names(&self) -> Vec<String> {
        self.scanners
            .iter()
            .filter(|(_, scanner)| scanner.enabled)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Names of configured enrichers with `enabled = true`, sorted
    pub fn enabled_enricher_names(&self) -> BTreeSet<String> {
        self.enrichers
            .iter()
            .filter(|(_, enricher)| enricher.enabled)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Domains covered by the enabled scanners
    pub fn enabled_domains(&self) -> Vec<ScanDomain> {
        let domains: BTreeSet<ScanDomain> = self
            .scanners
            .values()
            .filter(|scanner| scanner.enabled)
            .flat_map(|scanner| scanner.domains.iter().copied())
            .collect();
        domains.into_iter().collect()
    }

    /// Non-empty plugin option tables keyed by plugin name
    pub fn plugin_options(&self) -> BTreeMap<String, serde_json::Value> {
        let scanners = self.scanners.iter().map(|(name, s)| (name, &s.options));
        let enrichers = self.enrichers.iter().map(|(name, e)| (name, &e.options));
        scanners
            .chain(enrichers)
            .filter(|(_, options)| !is_empty_options(options))
            .map(|(name, options)| (name.clone(), options.clone()))
            .collect()
    }

    /// Pipeline settings derived from this configuration
    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::new()
            .with_max_workers(self.pipeline.max_workers)
            .with_sequential(self.pipeline.sequential)
            .with_enricher_order(self.pipeline.enrichers.iter().cloned())
            .with_enabled_enrichers(self.enabled_enricher_names())
            .with_scanner_timeout(Duration::from_secs(self.pipeline.scanner_timeout_secs));
        for (name, scanner) in &self.scanners {
            if let Some(secs) = scanner.timeout_secs {
                config = config.with_scanner_timeout_for(name.clone(), Duration::from_secs(secs));
            }
        }
        config
    }
}
