//! Pipeline Error Types
//!
//! Only precondition failures are errors at this level. Plugin failures are
//! recovered inside the run and surface as fields of the result.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid project root {}: {reason}", path.display())]
    InvalidProjectRoot { path: PathBuf, reason: String },

    #[error("No scanners requested")]
    NoScanners,

    #[error("Invalid pipeline configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

impl crate::core::error_handling::ContextualError for PipelineError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            PipelineError::InvalidProjectRoot { reason, .. } => Some(reason),
            PipelineError::NoScanners => Some("No scanners requested"),
            PipelineError::InvalidConfig { message } => Some(message),
        }
    }
}
