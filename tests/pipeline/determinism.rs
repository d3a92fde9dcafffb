//! Output stability tests

use crate::common::plugins::{Script, ScriptedScanner};
use crate::common::{issue, names, registry};
use lucidshark::model::api::{ScanContext, ScanDomain, ScanResult, Severity};
use lucidshark::plugin::api::{DedupEnricher, PluginRegistry};
use lucidshark::pipeline::api::{PipelineConfig, PipelineExecutor};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn scanners() -> Arc<PluginRegistry> {
    registry(
        vec![
            ScriptedScanner::new(
                "slow",
                Script::ReportAfter(
                    Duration::from_millis(80),
                    vec![
                        issue("slow", ScanDomain::Sca, Severity::Critical, "cve-1"),
                        issue("slow", ScanDomain::Sca, Severity::Medium, "cve-2"),
                    ],
                ),
            )
            .shared(),
            ScriptedScanner::new(
                "medium",
                Script::ReportAfter(
                    Duration::from_millis(30),
                    vec![issue("medium", ScanDomain::Iac, Severity::High, "open-bucket")],
                ),
            )
            .shared(),
            ScriptedScanner::new(
                "fast",
                Script::Report(vec![issue("fast", ScanDomain::Linting, Severity::Low, "unused")]),
            )
            .shared(),
            ScriptedScanner::new("broken", Script::Fail("bad config")).shared(),
        ],
        vec![Arc::new(DedupEnricher::new())],
    )
}

async fn run(config: PipelineConfig, root: &std::path::Path) -> ScanResult {
    PipelineExecutor::new(scanners(), config.with_enricher_order(["dedup"]))
        .unwrap()
        .execute(
            &names(&["slow", "medium", "fast", "broken"]),
            ScanContext::new(root),
        )
        .await
        .unwrap()
}

fn ids(result: &ScanResult) -> Vec<String> {
    result.issues().iter().map(|i| i.id.clone()).collect()
}

#[tokio::test]
async fn test_parallel_matches_sequential() {
    let temp = TempDir::new().unwrap();

    let parallel = run(PipelineConfig::default().with_max_workers(4), temp.path()).await;
    let sequential = run(PipelineConfig::default().with_sequential(true), temp.path()).await;

    assert_eq!(parallel.issues(), sequential.issues());
    assert_eq!(parallel.summary(), sequential.summary());
    let outcome = |r: &ScanResult| {
        r.metadata()
            .scanners_used
            .iter()
            .map(|s| (s.name.clone(), s.success, s.issue_count))
            .collect::<Vec<_>>()
    };
    assert_eq!(outcome(&parallel), outcome(&sequential));
}

#[tokio::test]
async fn test_issue_order_follows_submission_not_completion() {
    let temp = TempDir::new().unwrap();
    let result = run(PipelineConfig::default().with_max_workers(4), temp.path()).await;

    let tools: Vec<&str> = result
        .issues()
        .iter()
        .map(|i| i.source_tool.as_str())
        .collect();
    assert_eq!(tools, vec!["slow", "slow", "medium", "fast"]);
}

#[tokio::test]
async fn test_repeated_runs_yield_identical_ids() {
    let temp = TempDir::new().unwrap();
    let first = run(PipelineConfig::default().with_max_workers(2), temp.path()).await;
    let second = run(PipelineConfig::default().with_max_workers(3), temp.path()).await;

    assert_eq!(ids(&first), ids(&second));
    for issue in first.issues() {
        assert_eq!(issue.id, issue.content_id());
    }
}

#[tokio::test]
async fn test_summary_is_consistent_with_issues() {
    let temp = TempDir::new().unwrap();
    let result = run(PipelineConfig::default(), temp.path()).await;
    let summary = result.summary();

    assert_eq!(summary.total, result.issues().len());
    assert_eq!(summary.by_severity.values().sum::<usize>(), summary.total);
    assert_eq!(summary.by_domain.values().sum::<usize>(), summary.total);
    assert_eq!(summary.by_tool.values().sum::<usize>(), summary.total);
    assert_eq!(summary.highest_severity(), Some(Severity::Critical));
}
