//! Configuration
//!
//! Typed model of `lucidshark.toml` plus discovery and loading. Plugin
//! options stay opaque JSON values and are handed to plugins through the
//! scan context.

// Internal modules - all access should go through api module
pub(crate) mod error;
pub(crate) mod loading;
pub(crate) mod types;

// Public API module - the only public interface for configuration
pub mod api;
