//! Pipeline Orchestration
//!
//! Runs one scan pipeline:
//! 1. Scanner execution (bounded parallelism, per-scanner isolation and timeout)
//! 2. Enricher execution (sequential, in configured order)
//! 3. Result aggregation (metadata and summary)
//!
//! Report formatting and exit-code mapping belong to the caller.

// Internal modules - all access should go through api module
pub(crate) mod config;
pub(crate) mod enrichment;
pub(crate) mod error;
pub(crate) mod executor;
pub(crate) mod parallel;

// Public API module - the only public interface for the pipeline
pub mod api;

#[cfg(test)]
pub(crate) mod test_utils;
