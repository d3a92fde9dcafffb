//! Pipeline Executor
//!
//! Orchestrates a full run: scanners, then enrichers, then aggregation into
//! an immutable [`ScanResult`].

use crate::model::api::{ScanContext, ScanMetadata, ScanResult};
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::enrichment::EnrichmentPipeline;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::parallel::ParallelScannerExecutor;
use crate::plugin::api::PluginRegistry;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct PipelineExecutor {
    registry: Arc<PluginRegistry>,
    config: PipelineConfig,
    tool_version: String,
}

impl PipelineExecutor {
    /// Create an executor; the configuration is validated up front
    pub fn new(registry: Arc<PluginRegistry>, config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            registry,
            config,
            tool_version: crate::core::version::tool_version().to_string(),
        })
    }

    /// Override the version recorded in result metadata
    pub fn with_tool_version(mut self, version: impl Into<String>) -> Self {
        self.tool_version = version.into();
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute the pipeline for `scanner_names`
    ///
    /// Returns an error only when the run cannot start. Any individual
    /// scanner or enricher failure is recorded in the result instead.
    pub async fn execute(
        &self,
        scanner_names: &[String],
        context: impl Into<Arc<ScanContext>>,
    ) -> PipelineResult<ScanResult> {
        let context: Arc<ScanContext> = context.into();

        if scanner_names.is_empty() {
            return Err(PipelineError::NoScanners);
        }
        check_project_root(&context).await?;

        let started_at = Utc::now();
        let clock = Instant::now();
        log::info!(
            "Starting scan of {} with {} scanner(s)",
            context.project_root().display(),
            scanner_names.len()
        );

        let scanners = ParallelScannerExecutor::from_config(Arc::clone(&self.registry), &self.config);
        let (issues, scanners_used) = scanners.execute(scanner_names, Arc::clone(&context)).await;
        log::debug!("Scanners produced {} issue(s)", issues.len());

        let enrichment = EnrichmentPipeline::new(
            Arc::clone(&self.registry),
            self.config.resolved_enricher_order(),
        );
        let issues = enrichment.run(issues, &context).await;

        let metadata = ScanMetadata {
            tool_version: self.tool_version.clone(),
            scan_started_at: started_at,
            scan_finished_at: Utc::now(),
            duration_ms: clock.elapsed().as_millis() as u64,
            project_root: context.project_root().to_path_buf(),
            scanners_used,
        };
        let result = ScanResult::new(issues, metadata);

        let failed = result.metadata().failed_scanners().count();
        log::info!(
            "Scan complete: {} issue(s) from {} scanner(s) ({} failed) in {}ms",
            result.summary().total,
            result.metadata().scanners_used.len(),
            failed,
            result.metadata().duration_ms
        );

        Ok(result)
    }
}

async fn check_project_root(context: &ScanContext) -> PipelineResult<()> {
    let root = context.project_root();
    match tokio::fs::metadata(root).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PipelineError::InvalidProjectRoot {
            path: root.to_path_buf(),
            reason: format!("{} is not a directory", root.display()),
        }),
        Err(e) => Err(PipelineError::InvalidProjectRoot {
            path: root.to_path_buf(),
            reason: format!("cannot access {}: {}", root.display(), e),
        }),
    }
}
