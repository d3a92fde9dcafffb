//! Stream handler trait

use crate::streaming::event::StreamEvent;
use std::sync::Arc;

/// Sink for live tool output
///
/// Implementations must be internally synchronized: the scanner executor
/// calls these methods from several tasks at once.
pub trait StreamHandler: Send + Sync {
    /// Emit one event
    fn emit(&self, event: StreamEvent);

    /// A tool has started executing
    fn start_tool(&self, tool_name: &str);

    /// A tool has finished executing
    fn end_tool(&self, tool_name: &str, success: bool);
}

/// Shared handle stored in the scan context
pub type SharedStreamHandler = Arc<dyn StreamHandler>;
