//! Public API for the pipeline

pub use crate::pipeline::config::{
    PipelineConfig, DEFAULT_MAX_WORKERS, DEFAULT_SCANNER_TIMEOUT,
};
pub use crate::pipeline::enrichment::EnrichmentPipeline;
pub use crate::pipeline::error::{PipelineError, PipelineResult};
pub use crate::pipeline::executor::PipelineExecutor;
pub use crate::pipeline::parallel::ParallelScannerExecutor;
