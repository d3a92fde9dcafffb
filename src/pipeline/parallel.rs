//! Parallel Scanner Executor
//!
//! Runs the requested scanners on a bounded pool of tokio tasks. Each plugin
//! call is driven on a blocking thread, so a scanner that blocks without
//! yielding cannot stall its siblings or outlive its timeout. An error,
//! timeout or panic inside a plugin becomes a failed [`ScannerResult`].

use crate::model::api::{FailureKind, ScanContext, ScannerResult, UnifiedIssue};
use crate::pipeline::config::{PipelineConfig, DEFAULT_SCANNER_TIMEOUT};
use crate::plugin::api::{PluginError, PluginRegistry, ScannerPlugin};
use crate::plugin::error::panic_message;
use futures::FutureExt;
use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::{oneshot, Semaphore};
use tokio::task::JoinHandle;

/// Version recorded when a scanner never reported one
const UNKNOWN_VERSION: &str = "unknown";

/// What one scanner task hands back to the executor
#[derive(Debug)]
struct TaskOutcome {
    result: ScannerResult,
    issues: Vec<UnifiedIssue>,
}

/// Executes scanner plugins concurrently with a fixed worker limit
#[derive(Debug, Clone)]
pub struct ParallelScannerExecutor {
    registry: Arc<PluginRegistry>,
    max_workers: usize,
    sequential: bool,
    default_timeout: Duration,
    timeouts: HashMap<String, Duration>,
}

impl ParallelScannerExecutor {
    pub fn new(registry: Arc<PluginRegistry>, max_workers: usize) -> Self {
        Self {
            registry,
            max_workers: max_workers.max(1),
            sequential: false,
            default_timeout: DEFAULT_SCANNER_TIMEOUT,
            timeouts: HashMap::new(),
        }
    }

    /// Build an executor from pipeline settings
    pub fn from_config(
        registry: Arc<PluginRegistry>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            registry,
            max_workers: config.max_workers.max(1),
            sequential: config.sequential,
            default_timeout: config.scanner_timeout,
            timeouts: config.scanner_timeouts.clone(),
        }
    }

    pub fn with_sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    fn timeout_for(&self, scanner: &str) -> Duration {
        self.timeouts
            .get(scanner)
            .copied()
            .unwrap_or(self.default_timeout)
    }

    /// Run every named scanner and merge their issues
    ///
    /// Duplicate names run once. Results and issues come back in the order
    /// the names were given, independent of completion order, so parallel
    /// and sequential runs produce identical output.
    pub async fn execute(
        &self,
        scanner_names: &[String],
        context: Arc<ScanContext>,
    ) -> (Vec<UnifiedIssue>, Vec<ScannerResult>) {
        let names = dedup_names(scanner_names);
        log::debug!(
            "Executing {} scanner(s) ({}): {:?}",
            names.len(),
            if self.sequential {
                "sequential".to_string()
            } else {
                format!("max {} workers", self.max_workers)
            },
            names
        );

        let outcomes = if self.sequential {
            self.run_sequential(&names, context).await
        } else {
            self.run_parallel(&names, context).await
        };

        let mut all_issues = Vec::new();
        let mut results = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            all_issues.extend(outcome.issues);
            results.push(outcome.result);
        }
        (all_issues, results)
    }

    async fn run_sequential(&self, names: &[String], context: Arc<ScanContext>) -> Vec<TaskOutcome> {
        let mut outcomes = Vec::with_capacity(names.len());
        for name in names {
            let outcome = match self.registry.scanner(name) {
                Some(plugin) => {
                    let handle = spawn_scanner_task(
                        plugin,
                        Arc::clone(&context),
                        self.timeout_for(name),
                        None,
                    );
                    join_outcome(name, handle).await
                }
                None => not_found(name),
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn run_parallel(&self, names: &[String], context: Arc<ScanContext>) -> Vec<TaskOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.max_workers));

        // Slots are claimed inside each task, so submission never blocks and
        // queued scanners start as running ones finish.
        let pending: Vec<(String, Option<JoinHandle<TaskOutcome>>)> = names
            .iter()
            .map(|name| {
                let handle = self.registry.scanner(name).map(|plugin| {
                    spawn_scanner_task(
                        plugin,
                        Arc::clone(&context),
                        self.timeout_for(name),
                        Some(Arc::clone(&semaphore)),
                    )
                });
                (name.clone(), handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(pending.len());
        for (name, handle) in pending {
            let outcome = match handle {
                Some(handle) => join_outcome(&name, handle).await,
                None => not_found(&name),
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

/// Drop repeated names, keeping the first occurrence
fn dedup_names(scanner_names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    scanner_names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

fn not_found(name: &str) -> TaskOutcome {
    log::warn!("Scanner plugin '{}' not found, skipping", name);
    TaskOutcome {
        result: ScannerResult::failed(
            name,
            UNKNOWN_VERSION,
            Vec::new(),
            FailureKind::NotFound,
            format!("scanner plugin '{}' not found", name),
        ),
        issues: Vec::new(),
    }
}

/// Await a scanner task, converting a lost task into a failed record
async fn join_outcome(name: &str, handle: JoinHandle<TaskOutcome>) -> TaskOutcome {
    match handle.await {
        Ok(outcome) => outcome,
        Err(join_error) => {
            let error = if join_error.is_panic() {
                PluginError::Panicked {
                    plugin_name: name.to_string(),
                    message: panic_message(join_error.into_panic().as_ref()),
                }
            } else {
                PluginError::execution(name, "scan", "task was cancelled")
            };
            log::warn!("Scanner '{}' failed: {}", name, error);
            TaskOutcome {
                result: ScannerResult::failed(
                    name,
                    UNKNOWN_VERSION,
                    Vec::new(),
                    error.failure_kind(),
                    error.to_string(),
                ),
                issues: Vec::new(),
            }
        }
    }
}

fn spawn_scanner_task(
    plugin: Arc<dyn ScannerPlugin>,
    context: Arc<ScanContext>,
    timeout: Duration,
    slots: Option<Arc<Semaphore>>,
) -> JoinHandle<TaskOutcome> {
    tokio::spawn(async move {
        let _permit = match slots {
            Some(semaphore) => match semaphore.acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(_) => {
                    let error = PluginError::execution(plugin.name(), "scan", "worker pool closed");
                    return TaskOutcome {
                        result: ScannerResult::failed(
                            plugin.name(),
                            UNKNOWN_VERSION,
                            plugin.domains(),
                            error.failure_kind(),
                            error.to_string(),
                        ),
                        issues: Vec::new(),
                    };
                }
            },
            None => None,
        };
        run_scanner(plugin, context, timeout).await
    })
}

/// Task boundary: everything a plugin can do wrong is caught here
async fn run_scanner(
    plugin: Arc<dyn ScannerPlugin>,
    context: Arc<ScanContext>,
    timeout: Duration,
) -> TaskOutcome {
    let name = plugin.name().to_string();
    let domains = plugin.domains();
    let stream = Arc::clone(context.stream_handler());

    stream.start_tool(&name);
    log::debug!("Scanner '{}' starting (timeout {:?})", name, timeout);
    let started = Instant::now();

    // The plugin runs on its own blocking thread so that a scan which blocks
    // synchronously still hits the timeout. Dropping `cancel` on expiry drops
    // the plugin future at its next await point.
    let (cancel, cancelled) = oneshot::channel::<()>();
    let runtime = Handle::current();
    let worker = tokio::task::spawn_blocking(move || {
        runtime.block_on(async move {
            let invocation =
                AssertUnwindSafe(invoke_scanner(plugin.as_ref(), &context)).catch_unwind();
            tokio::select! {
                guarded = invocation => Some(guarded),
                _ = cancelled => None,
            }
        })
    });

    let guarded = tokio::time::timeout(timeout, worker).await;
    drop(cancel);

    let (version, outcome) = match guarded {
        Ok(Ok(Some(Ok((version, outcome))))) => (version, outcome),
        Ok(Ok(Some(Err(payload)))) => (
            UNKNOWN_VERSION.to_string(),
            Err(PluginError::Panicked {
                plugin_name: name.clone(),
                message: panic_message(payload.as_ref()),
            }),
        ),
        Ok(Ok(None)) => (
            UNKNOWN_VERSION.to_string(),
            Err(PluginError::execution(&name, "scan", "cancelled")),
        ),
        Ok(Err(join_error)) => (
            UNKNOWN_VERSION.to_string(),
            Err(PluginError::execution(&name, "scan", join_error)),
        ),
        Err(_elapsed) => (
            UNKNOWN_VERSION.to_string(),
            Err(PluginError::Timeout {
                plugin_name: name.clone(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        ),
    };
    let duration_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(issues) => {
            stream.end_tool(&name, true);
            log::debug!(
                "Scanner '{}' finished: {} issue(s) in {}ms",
                name,
                issues.len(),
                duration_ms
            );
            TaskOutcome {
                result: ScannerResult::succeeded(&name, version, domains, issues.len())
                    .with_duration_ms(duration_ms),
                issues,
            }
        }
        Err(error) => {
            stream.end_tool(&name, false);
            log::warn!("Scanner '{}' failed: {}", name, error);
            TaskOutcome {
                result: ScannerResult::failed(
                    &name,
                    version,
                    domains,
                    error.failure_kind(),
                    error.to_string(),
                )
                .with_duration_ms(duration_ms),
                issues: Vec::new(),
            }
        }
    }
}

/// Resolve the tool, read its version, then scan
async fn invoke_scanner(
    plugin: &dyn ScannerPlugin,
    context: &ScanContext,
) -> (String, Result<Vec<UnifiedIssue>, PluginError>) {
    if let Err(error) = plugin.ensure_binary().await {
        return (UNKNOWN_VERSION.to_string(), Err(error));
    }
    let version = plugin.get_version().await;
    let issues = plugin.scan(context).await;
    (version, issues)
}
