//! Plugin Trait System
//!
//! Capability interfaces every scanner and enricher implements. The pipeline
//! depends only on these traits, never on concrete plugin types.
//!
//! # Plugin Architecture
//!
//! The data flow is: Scanners (concurrent) → Enrichers (ordered) → Result
//!
//! - **Scanner plugins** wrap one external analysis tool and normalize its
//!   output into [`UnifiedIssue`]s for one or more scan domains.
//! - **Enricher plugins** transform the full merged issue set, for example
//!   deduplication or path-based suppression.
//!
//! Plugins hold no cross-run state inside the pipeline; a plugin instance is
//! resolved from the registry for one run only.

use crate::model::api::{ScanContext, ScanDomain, UnifiedIssue};
use crate::plugin::error::PluginResult;
use std::path::PathBuf;

/// Scanner plugin contract
///
/// `scan` must be safe to call repeatedly and returns an empty list when the
/// tool found nothing; "no issues" is never an error.
#[async_trait::async_trait]
pub trait ScannerPlugin: Send + Sync {
    /// Stable plugin identifier (e.g. `trivy`, `clippy`)
    fn name(&self) -> &str;

    /// Scan domains this plugin can satisfy
    fn domains(&self) -> Vec<ScanDomain>;

    /// Locate the backing tool, failing with `Unavailable` when it is missing
    async fn ensure_binary(&self) -> PluginResult<PathBuf>;

    /// Best-effort version of the backing tool; never fails
    async fn get_version(&self) -> String;

    /// Run the tool and return normalized issues
    async fn scan(&self, context: &ScanContext) -> PluginResult<Vec<UnifiedIssue>>;
}

/// Enricher plugin contract
///
/// `enrich` receives the complete issue set and returns a replacement set.
/// It may keep state across issues within one call but not across runs.
#[async_trait::async_trait]
pub trait EnricherPlugin: Send + Sync {
    /// Stable plugin identifier (e.g. `dedup`)
    fn name(&self) -> &str;

    async fn enrich(
        &self,
        issues: &[UnifiedIssue],
        context: &ScanContext,
    ) -> PluginResult<Vec<UnifiedIssue>>;
}
