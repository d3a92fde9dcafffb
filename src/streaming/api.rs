//! Public API for live output streaming

pub use crate::streaming::event::{StreamEvent, StreamType};
pub use crate::streaming::handlers::{CallbackStreamHandler, LogStreamHandler, NullStreamHandler};
pub use crate::streaming::traits::{SharedStreamHandler, StreamHandler};
