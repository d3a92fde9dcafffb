//! Plugin Error Handling
//!
//! Error types for plugin resolution and execution. The pipeline never lets
//! these escape a run: they are turned into failed scanner records or logged
//! enricher failures at the task boundary.

use crate::model::api::FailureKind;

/// Result type alias for plugin operations
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Error types for plugin operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PluginError {
    /// Plugin not found in registry
    #[error("Plugin not found: {plugin_name}")]
    NotFound { plugin_name: String },

    /// Plugin name already taken in the registry
    #[error("Plugin '{plugin_name}' is already registered")]
    AlreadyRegistered { plugin_name: String },

    /// Backing tool missing or not executable
    #[error("Plugin '{plugin_name}' is unavailable: {reason}")]
    Unavailable { plugin_name: String, reason: String },

    /// Plugin execution failed
    #[error("Plugin '{plugin_name}' failed during '{operation}': {cause}")]
    ExecutionFailed {
        plugin_name: String,
        operation: String,
        cause: String,
    },

    /// Wrapped tool produced output that could not be parsed
    #[error("Plugin '{plugin_name}' produced invalid output: {cause}")]
    InvalidOutput { plugin_name: String, cause: String },

    /// Plugin exceeded its execution budget
    #[error("Plugin '{plugin_name}' timed out after {timeout_ms}ms")]
    Timeout { plugin_name: String, timeout_ms: u64 },

    /// Plugin code panicked
    #[error("Plugin '{plugin_name}' panicked: {message}")]
    Panicked { plugin_name: String, message: String },
}

impl PluginError {
    pub fn execution(
        plugin_name: impl Into<String>,
        operation: impl Into<String>,
        cause: impl std::fmt::Display,
    ) -> Self {
        PluginError::ExecutionFailed {
            plugin_name: plugin_name.into(),
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }

    /// Classification recorded on a failed scanner record
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            PluginError::NotFound { .. } => FailureKind::NotFound,
            PluginError::Unavailable { .. } => FailureKind::Unavailable,
            PluginError::Timeout { .. } => FailureKind::Timeout,
            PluginError::Panicked { .. } => FailureKind::Panic,
            PluginError::AlreadyRegistered { .. }
            | PluginError::ExecutionFailed { .. }
            | PluginError::InvalidOutput { .. } => FailureKind::Execution,
        }
    }
}

impl crate::core::error_handling::ContextualError for PluginError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            PluginError::NotFound { .. }
                | PluginError::AlreadyRegistered { .. }
                | PluginError::Unavailable { .. }
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            PluginError::Unavailable { reason, .. } => Some(reason),
            PluginError::NotFound { plugin_name } => Some(plugin_name),
            PluginError::AlreadyRegistered { plugin_name } => Some(plugin_name),
            _ => None,
        }
    }
}

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
