//! Pipeline orchestration for code scanners
//!
//! Runs a set of scanner plugins concurrently against a project, feeds the
//! merged findings through an ordered chain of enrichers and returns one
//! aggregated, serializable [`ScanResult`](model::api::ScanResult).

pub mod app;
pub mod config;
pub mod core;
pub mod model;
pub mod pipeline;
pub mod plugin;
pub mod report;
pub mod streaming;
