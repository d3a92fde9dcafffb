//! Enrichment Pipeline
//!
//! Applies enrichers one at a time in a fixed order, feeding each enricher's
//! output to the next. A missing enricher is skipped; a failing one is a
//! no-op stage and the chain continues with the list it was given.

use crate::model::api::{ScanContext, UnifiedIssue};
use crate::plugin::api::PluginRegistry;
use crate::plugin::error::panic_message;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct EnrichmentPipeline {
    registry: Arc<PluginRegistry>,
    order: Vec<String>,
}

impl EnrichmentPipeline {
    pub fn new(registry: Arc<PluginRegistry>, order: Vec<String>) -> Self {
        Self { registry, order }
    }

    /// Enricher names in execution order
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Run the chain over `issues`
    pub async fn run(&self, issues: Vec<UnifiedIssue>, context: &ScanContext) -> Vec<UnifiedIssue> {
        let mut current = issues;

        for enricher_name in &self.order {
            let Some(enricher) = self.registry.enricher(enricher_name) else {
                log::warn!("Enricher plugin '{}' not found, skipping", enricher_name);
                continue;
            };

            log::info!("Running {} enricher...", enricher_name);
            let before = current.len();

            let outcome = AssertUnwindSafe(enricher.enrich(&current, context))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(enriched)) => {
                    log::debug!(
                        "{}: processed {} issue(s), {} remain",
                        enricher_name,
                        before,
                        enriched.len()
                    );
                    current = enriched;
                }
                Ok(Err(e)) => {
                    log::error!("Enricher {} failed: {}", enricher_name, e);
                }
                Err(payload) => {
                    log::error!(
                        "Enricher {} panicked: {}",
                        enricher_name,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }

        current
    }
}
