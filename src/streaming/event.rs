//! Event types for live output streaming

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Kind of output carried by a [`StreamEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StreamType {
    Stdout,
    Stderr,
    Status,
}

/// A single line of output or status update from a running tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub tool_name: String,
    pub stream_type: StreamType,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
}

impl StreamEvent {
    pub fn new(tool_name: impl Into<String>, stream_type: StreamType, content: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            stream_type,
            content: content.into(),
            line_number: None,
        }
    }

    pub fn status(tool_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(tool_name, StreamType::Status, content)
    }

    pub fn with_line_number(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }
}
