//! Live Output Streaming
//!
//! Scanner plugins report progress and raw tool output while they run. Several
//! scanners run at once, so every handler here is safe to call concurrently
//! from multiple tasks. No ordering is guaranteed across tools.

// Internal modules - all access should go through api module
pub(crate) mod event;
pub(crate) mod handlers;
pub(crate) mod traits;

// Public API module - the only public interface for streaming
pub mod api;
