//! JSON report tests

use super::{project_with_report, run_cli};
use serde_json::Value;

#[cfg(unix)]
#[test]
fn test_report_is_written_to_stdout() {
    let project = project_with_report(
        r#"[
            {"severity": "high", "title": "a", "file_path": "x.py", "line_start": 1},
            {"severity": "low", "title": "b", "file_path": "y.py", "line_start": 2}
        ]"#,
        "",
    );

    let output = run_cli(project.path(), &["--log-level", "off"]);
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(report["schema_version"], "1.0");
    assert_eq!(report["summary"]["total"], 2);
    assert_eq!(report["summary"]["by_severity"]["high"], 1);
    assert_eq!(report["summary"]["by_severity"]["low"], 1);
    assert!(report["summary"]["by_severity"].get("critical").is_none());
    assert_eq!(report["metadata"]["scanners_used"][0]["name"], "replay");
    assert_eq!(report["metadata"]["scanners_used"][0]["success"], true);
    assert_eq!(report["issues"][0]["source_tool"], "replay");
}

#[cfg(unix)]
#[test]
fn test_unknown_scanner_selected_on_command_line() {
    let project = project_with_report("[]", "");

    let output = run_cli(project.path(), &["--scanner", "replay,missing"]);
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();

    let used = report["metadata"]["scanners_used"].as_array().unwrap();
    assert_eq!(used.len(), 2);
    assert_eq!(used[1]["name"], "missing");
    assert_eq!(used[1]["success"], false);
    assert_eq!(used[1]["failure_kind"], "not_found");
    assert_eq!(output.status.code(), Some(0));
}

#[cfg(unix)]
#[test]
fn test_logs_go_to_stderr() {
    let project = project_with_report("[]", "");

    let output = run_cli(project.path(), &["--log-level", "debug", "--log-format", "json"]);

    assert!(serde_json::from_slice::<Value>(&output.stdout).is_ok());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"level\":\"DBG\""));
}
