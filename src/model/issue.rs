//! Unified Issue
//!
//! The normalized finding every scanner and enricher produces. Issue ids are
//! derived from the identifying fields only, so unchanged input yields the
//! same id on every run regardless of scanner completion order.

use crate::model::domain::ScanDomain;
use crate::model::severity::Severity;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Number of hex characters of the SHA256 digest kept in an issue id
const ISSUE_ID_HASH_LEN: usize = 12;

/// Normalized issue representation shared by all plugins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedIssue {
    pub id: String,
    pub domain: ScanDomain,
    pub source_tool: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_end: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_end: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    /// Affected package for dependency findings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,
    #[serde(default)]
    pub fixable: bool,
    /// Tool-specific data, passed through untouched
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl UnifiedIssue {
    /// Start building an issue
    pub fn builder(
        source_tool: impl Into<String>,
        domain: ScanDomain,
        severity: Severity,
        title: impl Into<String>,
    ) -> IssueBuilder {
        IssueBuilder::new(source_tool, domain, severity, title)
    }

    /// Recompute the id this issue would get from its identifying fields
    pub fn content_id(&self) -> String {
        generate_issue_id(
            &self.source_tool,
            self.rule_id.as_deref().unwrap_or(""),
            self.file_path.as_deref(),
            self.line_start,
            self.column_start,
            &self.description,
        )
    }
}

/// Generate a deterministic issue id
///
/// Format is `<tool>-<hash>` where the hash covers
/// `code:file:line:column:message`; a missing line or column hashes as `0`.
pub fn generate_issue_id(
    tool_prefix: &str,
    code: &str,
    file: Option<&Path>,
    line: Option<u32>,
    column: Option<u32>,
    message: &str,
) -> String {
    let file = file.map(|f| f.to_string_lossy()).unwrap_or_default();
    let content = format!(
        "{}:{}:{}:{}:{}",
        code,
        file,
        line.unwrap_or(0),
        column.unwrap_or(0),
        message
    );

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let hash_hex = format!("{:x}", hasher.finalize());
    format!("{}-{}", tool_prefix, &hash_hex[..ISSUE_ID_HASH_LEN])
}

/// Builder for [`UnifiedIssue`]
///
/// The id is computed in [`IssueBuilder::build`] unless one was set
/// explicitly with [`IssueBuilder::id`].
#[derive(Debug, Clone)]
pub struct IssueBuilder {
    issue: UnifiedIssue,
    explicit_id: bool,
}

impl IssueBuilder {
    pub fn new(
        source_tool: impl Into<String>,
        domain: ScanDomain,
        severity: Severity,
        title: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            issue: UnifiedIssue {
                id: String::new(),
                domain,
                source_tool: source_tool.into(),
                severity,
                rule_id: None,
                description: title.clone(),
                title,
                recommendation: None,
                suggested_fix: None,
                documentation_url: None,
                file_path: None,
                line_start: None,
                line_end: None,
                column_start: None,
                column_end: None,
                code_snippet: None,
                dependency: None,
                fixable: false,
                metadata: BTreeMap::new(),
            },
            explicit_id: false,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.issue.id = id.into();
        self.explicit_id = true;
        self
    }

    pub fn rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.issue.rule_id = Some(rule_id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.issue.description = description.into();
        self
    }

    pub fn recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.issue.recommendation = Some(recommendation.into());
        self
    }

    pub fn suggested_fix(mut self, fix: impl Into<String>) -> Self {
        self.issue.suggested_fix = Some(fix.into());
        self.issue.fixable = true;
        self
    }

    pub fn documentation_url(mut self, url: impl Into<String>) -> Self {
        self.issue.documentation_url = Some(url.into());
        self
    }

    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.issue.file_path = Some(path.into());
        self
    }

    /// Set the line range; `end` defaults to `start`
    pub fn lines(mut self, start: u32, end: Option<u32>) -> Self {
        self.issue.line_start = Some(start);
        self.issue.line_end = Some(end.unwrap_or(start));
        self
    }

    pub fn columns(mut self, start: u32, end: Option<u32>) -> Self {
        self.issue.column_start = Some(start);
        self.issue.column_end = end;
        self
    }

    /// Set both line fields as given, without filling in a missing end.
    pub fn line_span(mut self, start: Option<u32>, end: Option<u32>) -> Self {
        self.issue.line_start = start;
        self.issue.line_end = end;
        self
    }

    pub fn column_span(mut self, start: Option<u32>, end: Option<u32>) -> Self {
        self.issue.column_start = start;
        self.issue.column_end = end;
        self
    }

    pub fn code_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.issue.code_snippet = Some(snippet.into());
        self
    }

    pub fn dependency(mut self, dependency: impl Into<String>) -> Self {
        self.issue.dependency = Some(dependency.into());
        self
    }

    pub fn fixable(mut self, fixable: bool) -> Self {
        self.issue.fixable = fixable;
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.issue.metadata.insert(key.into(), value);
        self
    }

    pub fn build(mut self) -> UnifiedIssue {
        if !self.explicit_id || self.issue.id.is_empty() {
            self.issue.id = self.issue.content_id();
        }
        self.issue
    }
}
