//! Report Evaluation
//!
//! Caller-side helpers that turn a finished [`ScanResult`] into a process
//! outcome: fail-on threshold evaluation and the exit-code convention.
//!
//! [`ScanResult`]: crate::model::api::ScanResult

// Internal modules - all access should go through api module
pub(crate) mod exit_codes;
pub(crate) mod threshold;

// Public API module - the only public interface for reporting
pub mod api;
