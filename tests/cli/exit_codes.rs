//! Exit-code convention tests

use super::{project_with_report, run_cli};

const HIGH_FINDING: &str = r#"[{"severity": "high", "title": "hardcoded secret", "file_path": "app.py", "line_start": 3}]"#;

#[cfg(unix)]
#[test]
fn test_threshold_breach_exits_one() {
    let project = project_with_report(HIGH_FINDING, "[fail_on]\ndefault = \"high\"\n");
    let output = run_cli(project.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
}

#[cfg(unix)]
#[test]
fn test_cli_fail_on_overrides_config() {
    let project = project_with_report(HIGH_FINDING, "[fail_on]\ndefault = \"high\"\n");
    let output = run_cli(project.path(), &["--fail-on", "critical"]);
    assert_eq!(output.status.code(), Some(0));
}

#[cfg(unix)]
#[test]
fn test_no_threshold_exits_zero() {
    let project = project_with_report(HIGH_FINDING, "");
    let output = run_cli(project.path(), &[]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_invalid_config_exits_three() {
    let project = tempfile::TempDir::new().unwrap();
    std::fs::write(
        project.path().join("lucidshark.toml"),
        "[pipeline]\nmax_workers = 0\n",
    )
    .unwrap();

    let output = run_cli(project.path(), &[]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_no_scanners_exits_three() {
    let project = tempfile::TempDir::new().unwrap();
    let output = run_cli(project.path(), &[]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_missing_project_root_exits_three() {
    let project = tempfile::TempDir::new().unwrap();
    let output = run_cli(&project.path().join("gone"), &[]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_all_tools_unavailable_exits_four() {
    let project = tempfile::TempDir::new().unwrap();
    std::fs::write(
        project.path().join("lucidshark.toml"),
        r#"
[scanners.ghost]
command = "lucidshark-test-tool-that-does-not-exist"
domains = ["linting"]
"#,
    )
    .unwrap();

    let output = run_cli(project.path(), &[]);
    assert_eq!(output.status.code(), Some(4));
}

#[cfg(unix)]
#[test]
fn test_all_scanners_failing_exits_two() {
    let project = tempfile::TempDir::new().unwrap();
    std::fs::write(
        project.path().join("lucidshark.toml"),
        r#"
[scanners.broken]
command = "sh"
args = ["-c", "echo misconfigured >&2; exit 2"]
append_paths = false
"#,
    )
    .unwrap();

    let output = run_cli(project.path(), &[]);
    assert_eq!(output.status.code(), Some(2));
}
