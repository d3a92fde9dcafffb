//! Command Scanner
//!
//! Wraps an arbitrary external tool configured under `[scanners.<name>]`.
//! The tool runs in the project root with its configured arguments followed
//! by the target paths and must print a JSON array of issue records on
//! stdout. Stderr lines are forwarded to the stream handler as they arrive.

use crate::model::api::{ScanContext, ScanDomain, Severity, UnifiedIssue};
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::traits::ScannerPlugin;
use crate::streaming::api::{StreamEvent, StreamType};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

/// Upper bound for `<tool> --version`
const VERSION_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest stderr excerpt kept in an error message
const STDERR_EXCERPT_LEN: usize = 500;

/// One issue as printed by a wrapped tool
///
/// Only severity and title are required; tool and domain default to the
/// scanner's own, and the id is computed when absent.
#[derive(Debug, Deserialize)]
struct IssueRecord {
    id: Option<String>,
    domain: Option<ScanDomain>,
    source_tool: Option<String>,
    severity: Severity,
    title: String,
    description: Option<String>,
    rule_id: Option<String>,
    recommendation: Option<String>,
    suggested_fix: Option<String>,
    documentation_url: Option<String>,
    file_path: Option<PathBuf>,
    line_start: Option<u32>,
    line_end: Option<u32>,
    column_start: Option<u32>,
    column_end: Option<u32>,
    code_snippet: Option<String>,
    dependency: Option<String>,
    #[serde(default)]
    fixable: bool,
    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,
}

/// Scanner backed by an external command
#[derive(Debug, Clone)]
pub struct CommandScanner {
    name: String,
    program: String,
    args: Vec<String>,
    domains: Vec<ScanDomain>,
    append_paths: bool,
}

impl CommandScanner {
    pub fn new(name: impl Into<String>, program: impl Into<String>, domains: Vec<ScanDomain>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            domains,
            append_paths: true,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Whether target paths are appended after the configured arguments
    pub fn with_append_paths(mut self, append_paths: bool) -> Self {
        self.append_paths = append_paths;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn default_domain(&self) -> ScanDomain {
        self.domains.first().copied().unwrap_or(ScanDomain::Sast)
    }

    fn command_args(&self, context: &ScanContext) -> Vec<String> {
        let mut args = self.args.clone();
        if self.append_paths {
            args.extend(
                context
                    .paths()
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned()),
            );
        }
        args
    }

    /// Convert the tool's stdout into issues
    fn parse_output(&self, stdout: &str) -> PluginResult<Vec<UnifiedIssue>> {
        if stdout.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<IssueRecord> =
            serde_json::from_str(stdout).map_err(|e| PluginError::InvalidOutput {
                plugin_name: self.name.clone(),
                cause: e.to_string(),
            })?;

        Ok(records
            .into_iter()
            .map(|record| self.to_issue(record))
            .collect())
    }

    fn to_issue(&self, record: IssueRecord) -> UnifiedIssue {
        let tool = record.source_tool.unwrap_or_else(|| self.name.clone());
        let domain = record.domain.unwrap_or_else(|| self.default_domain());
        let mut builder = UnifiedIssue::builder(tool, domain, record.severity, record.title);

        if let Some(id) = record.id {
            builder = builder.id(id);
        }
        if let Some(description) = record.description {
            builder = builder.description(description);
        }
        if let Some(rule_id) = record.rule_id {
            builder = builder.rule_id(rule_id);
        }
        if let Some(recommendation) = record.recommendation {
            builder = builder.recommendation(recommendation);
        }
        if let Some(fix) = record.suggested_fix {
            builder = builder.suggested_fix(fix);
        }
        if let Some(url) = record.documentation_url {
            builder = builder.documentation_url(url);
        }
        if let Some(path) = record.file_path {
            builder = builder.file_path(path);
        }
        builder = builder
            .line_span(record.line_start, record.line_end)
            .column_span(record.column_start, record.column_end);
        if let Some(snippet) = record.code_snippet {
            builder = builder.code_snippet(snippet);
        }
        if let Some(dependency) = record.dependency {
            builder = builder.dependency(dependency);
        }
        if record.fixable {
            builder = builder.fixable(true);
        }
        for (key, value) in record.metadata {
            builder = builder.metadata(key, value);
        }
        builder.build()
    }
}

#[async_trait::async_trait]
impl ScannerPlugin for CommandScanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn domains(&self) -> Vec<ScanDomain> {
        self.domains.clone()
    }

    async fn ensure_binary(&self) -> PluginResult<PathBuf> {
        find_executable(&self.program).ok_or_else(|| PluginError::Unavailable {
            plugin_name: self.name.clone(),
            reason: format!("'{}' not found on PATH", self.program),
        })
    }

    async fn get_version(&self) -> String {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(VERSION_TIMEOUT, output).await {
            Ok(Ok(output)) if output.status.success() => {
                let text = String::from_utf8_lossy(&output.stdout);
                match text.lines().map(str::trim).find(|l| !l.is_empty()) {
                    Some(line) => line.to_string(),
                    None => "unknown".to_string(),
                }
            }
            _ => "unknown".to_string(),
        }
    }

    async fn scan(&self, context: &ScanContext) -> PluginResult<Vec<UnifiedIssue>> {
        let args = self.command_args(context);
        log::debug!("{}: running {} {:?}", self.name, self.program, args);

        let mut child = Command::new(&self.program)
            .args(&args)
            .current_dir(context.project_root())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PluginError::execution(&self.name, "spawn", e))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let handler = context.stream_handler();

        let read_stdout = async {
            let mut buffer = String::new();
            if let Some(mut stdout) = stdout {
                stdout.read_to_string(&mut buffer).await?;
            }
            Ok::<_, std::io::Error>(buffer)
        };
        let read_stderr = async {
            let mut collected = String::new();
            if let Some(stderr) = stderr {
                // Drain to EOF so the tool never sees a closed pipe
                let mut reader = BufReader::new(stderr);
                let mut raw = Vec::new();
                let mut line_number = 0;
                loop {
                    raw.clear();
                    match reader.read_until(b'\n', &mut raw).await {
                        Ok(0) => break,
                        Ok(_) => {}
                        Err(e) => {
                            log::debug!("{}: stderr read failed: {}", self.name, e);
                            break;
                        }
                    }
                    let line = String::from_utf8_lossy(&raw);
                    let line = line.trim_end_matches(['\n', '\r']);
                    line_number += 1;
                    handler.emit(
                        StreamEvent::new(&self.name, StreamType::Stderr, line)
                            .with_line_number(line_number),
                    );
                    collected.push_str(line);
                    collected.push('\n');
                }
            }
            collected
        };

        let (stdout, stderr) = tokio::join!(read_stdout, read_stderr);
        let stdout = stdout.map_err(|e| PluginError::execution(&self.name, "read output", e))?;
        let status = child
            .wait()
            .await
            .map_err(|e| PluginError::execution(&self.name, "wait", e))?;

        if !status.success() && stdout.trim().is_empty() {
            let excerpt: String = stderr.trim().chars().take(STDERR_EXCERPT_LEN).collect();
            return Err(PluginError::execution(
                &self.name,
                "scan",
                format!("exited with {}: {}", status, excerpt),
            ));
        }
        if !status.success() {
            // Many tools exit non-zero exactly when they report findings
            log::debug!("{}: exited with {}, parsing output", self.name, status);
        }

        self.parse_output(&stdout)
    }
}

/// Resolve `program` the way a shell would
fn find_executable(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    let search_path = std::env::var_os("PATH")?;
    std::env::split_paths(&search_path)
        .map(|dir| dir.join(program))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
