//! Deduplication enricher
//!
//! Several tools often report the same finding. An issue is a duplicate when
//! its tool, rule, location and description all match one already seen.

use crate::model::api::{ScanContext, UnifiedIssue};
use crate::plugin::error::PluginResult;
use crate::plugin::traits::EnricherPlugin;
use std::collections::HashSet;
use std::path::PathBuf;

pub const DEDUP_ENRICHER: &str = "dedup";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DedupKey {
    source_tool: String,
    rule_id: Option<String>,
    file_path: Option<PathBuf>,
    line_start: Option<u32>,
    description: String,
}

impl From<&UnifiedIssue> for DedupKey {
    fn from(issue: &UnifiedIssue) -> Self {
        Self {
            source_tool: issue.source_tool.clone(),
            rule_id: issue.rule_id.clone(),
            file_path: issue.file_path.clone(),
            line_start: issue.line_start,
            description: issue.description.clone(),
        }
    }
}

/// Keeps the first occurrence of each finding, preserving order
#[derive(Debug, Default, Clone)]
pub struct DedupEnricher;

impl DedupEnricher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl EnricherPlugin for DedupEnricher {
    fn name(&self) -> &str {
        DEDUP_ENRICHER
    }

    async fn enrich(
        &self,
        issues: &[UnifiedIssue],
        _context: &ScanContext,
    ) -> PluginResult<Vec<UnifiedIssue>> {
        let mut seen = HashSet::with_capacity(issues.len());
        let unique: Vec<UnifiedIssue> = issues
            .iter()
            .filter(|issue| seen.insert(DedupKey::from(*issue)))
            .cloned()
            .collect();

        let removed = issues.len() - unique.len();
        if removed > 0 {
            log::debug!("dedup: removed {} duplicate issue(s)", removed);
        }
        Ok(unique)
    }
}
