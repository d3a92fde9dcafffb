//! Unified Data Model
//!
//! Value types shared by every stage of the pipeline: the issue schema all
//! plugins produce, the per-run scan context, per-scanner execution records
//! and the final aggregated result handed to reporters.

pub(crate) mod context;
pub(crate) mod domain;
pub(crate) mod issue;
pub(crate) mod result;
pub(crate) mod severity;

pub mod api;
