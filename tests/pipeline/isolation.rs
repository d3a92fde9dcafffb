//! Scanner isolation tests

use crate::common::plugins::{Script, ScriptedScanner};
use crate::common::{issue, names, registry};
use lucidshark::model::api::{FailureKind, ScanContext, ScanDomain, Severity};
use lucidshark::pipeline::api::{PipelineConfig, PipelineError, PipelineExecutor};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[tokio::test]
async fn test_one_failure_keeps_sibling_issues() {
    let temp = TempDir::new().unwrap();
    let registry = registry(
        vec![
            ScriptedScanner::new(
                "a",
                Script::Report(vec![
                    issue("a", ScanDomain::Sast, Severity::High, "injection"),
                    issue("a", ScanDomain::Sast, Severity::Low, "weak-hash"),
                ]),
            )
            .shared(),
            ScriptedScanner::new("b", Script::Fail("segfault in analyzer")).shared(),
        ],
        Vec::new(),
    );
    let executor =
        PipelineExecutor::new(registry, PipelineConfig::default().with_max_workers(2)).unwrap();

    let result = executor
        .execute(&names(&["a", "b"]), ScanContext::new(temp.path()))
        .await
        .unwrap();

    assert_eq!(result.summary().total, 2);
    assert_eq!(result.summary().count(Severity::High), 1);
    assert_eq!(result.summary().count(Severity::Low), 1);

    let b = &result.metadata().scanners_used[1];
    assert_eq!(b.name, "b");
    assert!(!b.success);
    assert_eq!(b.failure_kind, Some(FailureKind::Execution));
    assert!(b.error.as_deref().unwrap().contains("segfault in analyzer"));
}

#[tokio::test]
async fn test_timeout_and_panic_are_recorded() {
    let temp = TempDir::new().unwrap();
    let registry = registry(
        vec![
            ScriptedScanner::new(
                "hang",
                Script::ReportAfter(Duration::from_secs(30), Vec::new()),
            )
            .shared(),
            ScriptedScanner::new("crash", Script::Panic("index out of bounds")).shared(),
            ScriptedScanner::new(
                "good",
                Script::Report(vec![issue("good", ScanDomain::Linting, Severity::Info, "style")]),
            )
            .shared(),
        ],
        Vec::new(),
    );
    let executor = PipelineExecutor::new(
        registry,
        PipelineConfig::default().with_scanner_timeout(Duration::from_millis(200)),
    )
    .unwrap();

    let started = Instant::now();
    let result = executor
        .execute(&names(&["hang", "crash", "good"]), ScanContext::new(temp.path()))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    let used = &result.metadata().scanners_used;
    assert_eq!(used[0].failure_kind, Some(FailureKind::Timeout));
    assert_eq!(used[0].version, "unknown");
    assert_eq!(used[1].failure_kind, Some(FailureKind::Panic));
    assert!(used[1].error.as_deref().unwrap().contains("index out of bounds"));
    assert!(used[2].success);
    assert_eq!(result.summary().total, 1);
}

#[tokio::test]
async fn test_unavailable_tool_is_not_scanned() {
    let temp = TempDir::new().unwrap();
    let missing = ScriptedScanner::new("checkov", Script::Missing).with_domains(vec![ScanDomain::Iac]);
    let scans = missing.scan_counter();
    let registry = registry(vec![missing.shared()], Vec::new());
    let executor = PipelineExecutor::new(registry, PipelineConfig::default()).unwrap();

    let result = executor
        .execute(&names(&["checkov"]), ScanContext::new(temp.path()))
        .await
        .unwrap();

    let record = &result.metadata().scanners_used[0];
    assert_eq!(record.failure_kind, Some(FailureKind::Unavailable));
    assert_eq!(record.domains, vec![ScanDomain::Iac]);
    assert_eq!(scans.load(Ordering::SeqCst), 0);
    assert!(result.metadata().all_scanners_failed());
}

#[tokio::test]
async fn test_unknown_and_repeated_names() {
    let temp = TempDir::new().unwrap();
    let ruff = ScriptedScanner::new("ruff", Script::Report(Vec::new()));
    let scans = ruff.scan_counter();
    let registry = registry(vec![ruff.shared()], Vec::new());
    let executor = PipelineExecutor::new(registry, PipelineConfig::default()).unwrap();

    let result = executor
        .execute(&names(&["ruff", "nope", "ruff"]), ScanContext::new(temp.path()))
        .await
        .unwrap();

    let used = &result.metadata().scanners_used;
    assert_eq!(used.len(), 2);
    assert!(used[0].success);
    assert_eq!(used[0].version, "2.1.0");
    assert_eq!(used[1].failure_kind, Some(FailureKind::NotFound));
    assert_eq!(
        used[1].error.as_deref(),
        Some("scanner plugin 'nope' not found")
    );
    assert_eq!(scans.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_run_preconditions() {
    let temp = TempDir::new().unwrap();
    let executor = PipelineExecutor::new(registry(Vec::new(), Vec::new()), PipelineConfig::default()).unwrap();

    assert_eq!(
        executor
            .execute(&[], ScanContext::new(temp.path()))
            .await
            .unwrap_err(),
        PipelineError::NoScanners
    );
    assert!(matches!(
        executor
            .execute(&names(&["x"]), ScanContext::new(temp.path().join("missing")))
            .await
            .unwrap_err(),
        PipelineError::InvalidProjectRoot { .. }
    ));
}
