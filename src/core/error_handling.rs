//! Generic error handling utilities
//!
//! Lets the binary report any subsystem error the same way while keeping
//! domain-specific detail available at debug level.

/// Errors that know whether the user can fix them
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; system errors return `None`.
pub trait ContextualError: std::error::Error {
    /// True for configuration mistakes, bad arguments and other problems the
    /// user can correct; false for IO and other system failures
    fn is_user_actionable(&self) -> bool;

    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error at the right level of detail
///
/// User-actionable errors show their own message; system errors show
/// `operation_context`. The full error is always logged at debug level.
///
/// ```rust,no_run
/// # use lucidshark::core::error_handling::log_error_with_context;
/// # use lucidshark::pipeline::api::PipelineError;
/// log_error_with_context(&PipelineError::NoScanners, "Pipeline execution");
/// // Logs: "FATAL: No scanners requested"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("FATAL: {}", fatal_message(error, operation_context));
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// The one-line message [`log_error_with_context`] reports
pub fn fatal_message<E: ContextualError>(error: &E, operation_context: &str) -> String {
    match (error.is_user_actionable(), error.user_message()) {
        (true, Some(message)) => message.to_string(),
        _ => operation_context.to_string(),
    }
}
