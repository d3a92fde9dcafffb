//! CLI Integration Test Modules

pub mod exit_codes;
pub mod report;

use std::path::Path;
use std::process::{Command, Output};

/// Run the binary with `args` against `project_root`
pub fn run_cli(project_root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lucidshark"))
        .arg("--project-root")
        .arg(project_root)
        .arg("--no-color")
        .args(args)
        .output()
        .expect("failed to run lucidshark binary")
}

/// Write `lucidshark.toml` with one `cat` scanner replaying `report`
pub fn project_with_report(report: &str, extra_config: &str) -> tempfile::TempDir {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::write(temp.path().join("report.json"), report).unwrap();
    std::fs::write(
        temp.path().join("lucidshark.toml"),
        format!(
            r#"
[scanners.replay]
command = "cat"
args = ["report.json"]
append_paths = false
domains = ["sast"]

{}
"#,
            extra_config
        ),
    )
    .unwrap();
    temp
}
