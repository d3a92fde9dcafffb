//! Plugin System Module
//!
//! Scanner and enricher contracts, the explicit registry that maps names to
//! plugin instances, and the plugins that ship with the binary.

// Internal modules - all access should go through api module
pub(crate) mod builtin;
pub(crate) mod error;
pub(crate) mod registry;
pub(crate) mod traits;

// Public API module - the only public interface for the plugin system
pub mod api;
