//! Enricher ordering and failure tests

use crate::common::plugins::{BrokenEnricher, MarkingEnricher, Script, ScriptedScanner};
use crate::common::{issue, names, registry};
use lucidshark::model::api::{ScanContext, ScanDomain, Severity};
use lucidshark::pipeline::api::{PipelineConfig, PipelineExecutor};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn scanner() -> Arc<dyn lucidshark::plugin::api::ScannerPlugin> {
    ScriptedScanner::new(
        "semgrep",
        Script::Report(vec![issue("semgrep", ScanDomain::Sast, Severity::Medium, "xss")]),
    )
    .shared()
}

#[tokio::test]
async fn test_enrichers_follow_explicit_order() {
    let temp = TempDir::new().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let registry = registry(
        vec![scanner()],
        vec![
            Arc::new(MarkingEnricher::new("epss", "+epss", Arc::clone(&calls))),
            Arc::new(MarkingEnricher::new("kev", "+kev", Arc::clone(&calls))),
        ],
    );
    let executor = PipelineExecutor::new(
        registry,
        PipelineConfig::default().with_enricher_order(["kev", "epss"]),
    )
    .unwrap();

    let result = executor
        .execute(&names(&["semgrep"]), ScanContext::new(temp.path()))
        .await
        .unwrap();

    assert_eq!(result.issues()[0].title, "xss+kev+epss");
    assert_eq!(*calls.lock().unwrap(), vec!["kev", "epss"]);
}

#[tokio::test]
async fn test_enabled_enrichers_run_by_name_without_explicit_order() {
    let temp = TempDir::new().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let registry = registry(
        vec![scanner()],
        vec![
            Arc::new(MarkingEnricher::new("zeta", "+z", Arc::clone(&calls))),
            Arc::new(MarkingEnricher::new("alpha", "+a", Arc::clone(&calls))),
            Arc::new(MarkingEnricher::new("unused", "+u", Arc::clone(&calls))),
        ],
    );
    let executor = PipelineExecutor::new(
        registry,
        PipelineConfig::default().with_enabled_enrichers(["zeta", "alpha"]),
    )
    .unwrap();

    let result = executor
        .execute(&names(&["semgrep"]), ScanContext::new(temp.path()))
        .await
        .unwrap();

    assert_eq!(result.issues()[0].title, "xss+a+z");
    assert_eq!(*calls.lock().unwrap(), vec!["alpha", "zeta"]);
}

#[tokio::test]
async fn test_failed_enricher_passes_input_through() {
    let temp = TempDir::new().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let registry = registry(
        vec![scanner()],
        vec![
            Arc::new(BrokenEnricher("epss")),
            Arc::new(MarkingEnricher::new("kev", "+kev", Arc::clone(&calls))),
        ],
    );
    let executor = PipelineExecutor::new(
        registry,
        PipelineConfig::default().with_enricher_order(["epss", "missing", "kev"]),
    )
    .unwrap();

    let result = executor
        .execute(&names(&["semgrep"]), ScanContext::new(temp.path()))
        .await
        .unwrap();

    assert_eq!(result.summary().total, 1);
    assert_eq!(result.issues()[0].title, "xss+kev");
    assert!(result.metadata().scanners_used[0].success);
}
