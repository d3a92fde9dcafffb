//! Scan Results
//!
//! Per-scanner execution records, run metadata, summary statistics and the
//! aggregated result produced once per pipeline run.

use crate::model::domain::ScanDomain;
use crate::model::issue::UnifiedIssue;
use crate::model::severity::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use strum_macros::Display;

/// Why a scanner produced no usable output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// Name not present in the plugin registry
    NotFound,
    /// Backing tool missing or not executable
    Unavailable,
    /// Tool ran but failed or produced unusable output
    Execution,
    Timeout,
    Panic,
}

/// Execution record for one scanner invocation
///
/// Zero issues is a successful run; only errors set `success = false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerResult {
    pub name: String,
    pub version: String,
    pub domains: Vec<ScanDomain>,
    pub success: bool,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    #[serde(default)]
    pub issue_count: usize,
    #[serde(default)]
    pub duration_ms: u64,
}

impl ScannerResult {
    pub fn succeeded(
        name: impl Into<String>,
        version: impl Into<String>,
        domains: Vec<ScanDomain>,
        issue_count: usize,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            domains,
            success: true,
            error: None,
            failure_kind: None,
            issue_count,
            duration_ms: 0,
        }
    }

    pub fn failed(
        name: impl Into<String>,
        version: impl Into<String>,
        domains: Vec<ScanDomain>,
        kind: FailureKind,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            domains,
            success: false,
            error: Some(error.into()),
            failure_kind: Some(kind),
            issue_count: 0,
            duration_ms: 0,
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Run metadata attached to every result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub tool_version: String,
    pub scan_started_at: DateTime<Utc>,
    pub scan_finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub project_root: PathBuf,
    /// Scanner records in execution order
    pub scanners_used: Vec<ScannerResult>,
}

impl ScanMetadata {
    pub fn failed_scanners(&self) -> impl Iterator<Item = &ScannerResult> {
        self.scanners_used.iter().filter(|r| !r.success)
    }

    /// True when at least one scanner ran and none of them succeeded
    pub fn all_scanners_failed(&self) -> bool {
        !self.scanners_used.is_empty() && self.scanners_used.iter().all(|r| !r.success)
    }
}

/// Issue counts over the final issue list
///
/// Only non-zero buckets are stored, which keeps them out of serialized
/// output; the accessors report zero for absent buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_domain: BTreeMap<ScanDomain, usize>,
    pub by_tool: BTreeMap<String, usize>,
}

impl ScanSummary {
    pub fn from_issues(issues: &[UnifiedIssue]) -> Self {
        let mut summary = Self {
            total: issues.len(),
            ..Self::default()
        };
        for issue in issues {
            *summary.by_severity.entry(issue.severity).or_insert(0) += 1;
            *summary.by_domain.entry(issue.domain).or_insert(0) += 1;
            *summary
                .by_tool
                .entry(issue.source_tool.clone())
                .or_insert(0) += 1;
        }
        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    pub fn domain_count(&self, domain: ScanDomain) -> usize {
        self.by_domain.get(&domain).copied().unwrap_or(0)
    }

    /// Number of issues at or above `threshold`
    pub fn count_at_or_above(&self, threshold: Severity) -> usize {
        self.by_severity
            .iter()
            .filter(|(severity, _)| severity.meets(threshold))
            .map(|(_, count)| count)
            .sum()
    }

    /// Most severe level present, if any
    pub fn highest_severity(&self) -> Option<Severity> {
        self.by_severity.keys().next_back().copied()
    }
}

/// Aggregated, immutable result of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    schema_version: String,
    issues: Vec<UnifiedIssue>,
    summary: ScanSummary,
    metadata: ScanMetadata,
}

impl ScanResult {
    /// Compose a result; the summary is computed from `issues`
    pub fn new(issues: Vec<UnifiedIssue>, metadata: ScanMetadata) -> Self {
        let summary = ScanSummary::from_issues(&issues);
        Self {
            schema_version: crate::core::version::REPORT_SCHEMA_VERSION.to_string(),
            issues,
            summary,
            metadata,
        }
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn issues(&self) -> &[UnifiedIssue] {
        &self.issues
    }

    pub fn summary(&self) -> &ScanSummary {
        &self.summary
    }

    pub fn metadata(&self) -> &ScanMetadata {
        &self.metadata
    }

    pub fn into_issues(self) -> Vec<UnifiedIssue> {
        self.issues
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
