//! Ignore enricher
//!
//! Suppresses issues in files matched by gitignore-style patterns read from
//! `config["ignore"]["patterns"]`:
//!
//! - blank lines and `#` comments are skipped
//! - `!pattern` re-includes a previously ignored path
//! - a trailing `/` ignores everything below that directory
//! - a pattern without `/` matches a name at any depth
//! - the last matching pattern decides
//!
//! Issues without a file path are never suppressed.

use crate::model::api::{ScanContext, UnifiedIssue};
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::traits::EnricherPlugin;
use glob::{MatchOptions, Pattern};
use std::path::{Component, Path, PathBuf};

pub const IGNORE_ENRICHER: &str = "ignore";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
struct IgnoreRule {
    pattern: Pattern,
    negated: bool,
    directory: bool,
    /// Pattern contains a separator and is matched against the whole path
    anchored: bool,
}

impl IgnoreRule {
    fn parse(line: &str) -> Result<Option<Self>, glob::PatternError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let (negated, body) = match trimmed.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (mut directory, body) = match body.strip_suffix('/') {
            Some(rest) => (true, rest),
            None => (false, body),
        };
        // `**/name` is the same as `name`
        let body = body.strip_prefix("**/").unwrap_or(body);
        let anchored = body.contains('/');
        // `dir/**` ignores everything below `dir`
        let body = match body.strip_suffix("/**") {
            Some(rest) => {
                directory = true;
                rest
            }
            None => body,
        };
        let body = body.trim_start_matches('/');
        if body.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self {
            pattern: Pattern::new(body)?,
            negated,
            directory,
            anchored,
        }))
    }

    fn matches(&self, relative: &str) -> bool {
        let components: Vec<&str> = relative.split('/').collect();

        if self.anchored {
            if !self.directory && self.pattern.matches_with(relative, MATCH_OPTIONS) {
                return true;
            }
            // Any matching parent directory covers its contents
            return (1..components.len()).any(|end| {
                self.pattern
                    .matches_with(&components[..end].join("/"), MATCH_OPTIONS)
            });
        }

        // Unanchored: compare against each path component
        let last = components.len().saturating_sub(1);
        components.iter().enumerate().any(|(i, component)| {
            let is_file = i == last;
            if self.directory && is_file {
                return false;
            }
            self.pattern.matches_with(component, MATCH_OPTIONS)
        })
    }
}

/// Compiled ignore pattern list
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns {
    rules: Vec<IgnoreRule>,
}

impl IgnorePatterns {
    pub fn parse<I, S>(lines: I) -> Result<Self, glob::PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();
        for line in lines {
            if let Some(rule) = IgnoreRule::parse(line.as_ref())? {
                rules.push(rule);
            }
        }
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `path` is ignored; absolute paths are made relative to `root`
    pub fn matches(&self, path: &Path, root: &Path) -> bool {
        let Some(relative) = relative_path(path, root) else {
            return false;
        };

        let mut ignored = false;
        for rule in &self.rules {
            if rule.matches(&relative) {
                ignored = !rule.negated;
            }
        }
        ignored
    }
}

/// Normalize to a `/`-separated path relative to `root`
fn relative_path(path: &Path, root: &Path) -> Option<String> {
    let relative: PathBuf = if path.is_absolute() {
        path.strip_prefix(root).ok()?.to_path_buf()
    } else {
        path.to_path_buf()
    };

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => return None,
            _ => {}
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Drops issues located in ignored files
#[derive(Debug, Default, Clone)]
pub struct IgnoreEnricher;

impl IgnoreEnricher {
    pub fn new() -> Self {
        Self
    }

    fn patterns(&self, context: &ScanContext) -> PluginResult<IgnorePatterns> {
        let Some(options) = context.plugin_config(IGNORE_ENRICHER) else {
            return Ok(IgnorePatterns::default());
        };
        let lines: Vec<&str> = match options.get("patterns") {
            None => Vec::new(),
            Some(serde_json::Value::Array(items)) => items.iter().filter_map(|v| v.as_str()).collect(),
            Some(other) => {
                return Err(PluginError::execution(
                    IGNORE_ENRICHER,
                    "configure",
                    format!("'patterns' must be a list of strings, got {}", other),
                ))
            }
        };
        IgnorePatterns::parse(lines)
            .map_err(|e| PluginError::execution(IGNORE_ENRICHER, "configure", e))
    }
}

#[async_trait::async_trait]
impl EnricherPlugin for IgnoreEnricher {
    fn name(&self) -> &str {
        IGNORE_ENRICHER
    }

    async fn enrich(
        &self,
        issues: &[UnifiedIssue],
        context: &ScanContext,
    ) -> PluginResult<Vec<UnifiedIssue>> {
        let patterns = self.patterns(context)?;
        if patterns.is_empty() {
            return Ok(issues.to_vec());
        }

        let root = context.project_root();
        let kept: Vec<UnifiedIssue> = issues
            .iter()
            .filter(|issue| match &issue.file_path {
                Some(path) => !patterns.matches(path, root),
                None => true,
            })
            .cloned()
            .collect();

        log::debug!("ignore: suppressed {} issue(s)", issues.len() - kept.len());
        Ok(kept)
    }
}
