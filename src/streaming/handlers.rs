//! Stream handler implementations

use crate::streaming::event::{StreamEvent, StreamType};
use crate::streaming::traits::StreamHandler;
use colored::Colorize;
use std::sync::Mutex;

/// Handler that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStreamHandler;

impl StreamHandler for NullStreamHandler {
    fn emit(&self, _event: StreamEvent) {}

    fn start_tool(&self, _tool_name: &str) {}

    fn end_tool(&self, _tool_name: &str, _success: bool) {}
}

/// Handler that writes tool output through the logging facade
///
/// Status lines go out at info level, raw tool output at debug level unless
/// `show_output` is set, in which case it is promoted to info.
#[derive(Debug, Clone, Copy)]
pub struct LogStreamHandler {
    show_output: bool,
}

impl LogStreamHandler {
    pub fn new(show_output: bool) -> Self {
        Self { show_output }
    }
}

impl Default for LogStreamHandler {
    fn default() -> Self {
        Self::new(false)
    }
}

impl StreamHandler for LogStreamHandler {
    fn emit(&self, event: StreamEvent) {
        match event.stream_type {
            StreamType::Status => log::info!("[{}] {}", event.tool_name, event.content),
            _ if self.show_output => {
                log::info!("  {}: {}", event.tool_name.dimmed(), event.content)
            }
            _ => log::debug!("  {}: {}", event.tool_name, event.content),
        }
    }

    fn start_tool(&self, tool_name: &str) {
        log::info!("[{}] Starting...", tool_name);
    }

    fn end_tool(&self, tool_name: &str, success: bool) {
        if success {
            log::info!("[{}] {}", tool_name, "Done".green());
        } else {
            log::info!("[{}] {}", tool_name, "Failed".red());
        }
    }
}

type EventCallback = Box<dyn Fn(&StreamEvent) + Send + Sync>;
type StartCallback = Box<dyn Fn(&str) + Send + Sync>;
type EndCallback = Box<dyn Fn(&str, bool) + Send + Sync>;

/// Handler that forwards events to caller-supplied closures
///
/// Callbacks are invoked one at a time under an internal lock, so they do not
/// need their own synchronization. Start and end notifications are also
/// forwarded to the event callback as status events.
#[derive(Default)]
pub struct CallbackStreamHandler {
    on_event: Option<EventCallback>,
    on_start: Option<StartCallback>,
    on_end: Option<EndCallback>,
    lock: Mutex<()>,
}

impl std::fmt::Debug for CallbackStreamHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackStreamHandler")
            .field("on_event", &self.on_event.is_some())
            .field("on_start", &self.on_start.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}

impl CallbackStreamHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_event(mut self, callback: impl Fn(&StreamEvent) + Send + Sync + 'static) -> Self {
        self.on_event = Some(Box::new(callback));
        self
    }

    pub fn on_start(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    pub fn on_end(mut self, callback: impl Fn(&str, bool) + Send + Sync + 'static) -> Self {
        self.on_end = Some(Box::new(callback));
        self
    }

    fn with_lock<R>(&self, f: impl FnOnce() -> R) -> R {
        // A panicking callback must not disable streaming for everyone else
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f()
    }
}

impl StreamHandler for CallbackStreamHandler {
    fn emit(&self, event: StreamEvent) {
        if let Some(callback) = &self.on_event {
            self.with_lock(|| callback(&event));
        }
    }

    fn start_tool(&self, tool_name: &str) {
        if let Some(callback) = &self.on_start {
            self.with_lock(|| callback(tool_name));
        }
        if self.on_event.is_some() {
            self.emit(StreamEvent::status(tool_name, "started"));
        }
    }

    fn end_tool(&self, tool_name: &str, success: bool) {
        if let Some(callback) = &self.on_end {
            self.with_lock(|| callback(tool_name, success));
        }
        if self.on_event.is_some() {
            let status = if success { "completed" } else { "failed" };
            self.emit(StreamEvent::status(tool_name, status));
        }
    }
}
