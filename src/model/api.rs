//! Public API for the data model
//!
//! External modules should import model types from here rather than from
//! the internal modules.

pub use crate::model::context::ScanContext;
pub use crate::model::domain::ScanDomain;
pub use crate::model::issue::{generate_issue_id, IssueBuilder, UnifiedIssue};
pub use crate::model::result::{
    FailureKind, ScanMetadata, ScanResult, ScanSummary, ScannerResult,
};
pub use crate::model::severity::Severity;
