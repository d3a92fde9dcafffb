//! Process exit codes
//!
//! | code | meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | no threshold tripped                      |
//! | 1    | issues at or above a fail-on threshold    |
//! | 2    | every scanner failed                      |
//! | 3    | invalid usage or configuration            |
//! | 4    | every scanner was unavailable             |

use crate::model::api::{FailureKind, ScanResult};
use crate::report::threshold::{evaluate_thresholds, FailOn};

/// Exit code constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode;

impl ExitCode {
    pub const SUCCESS: i32 = 0;
    pub const ISSUES_FOUND: i32 = 1;
    pub const SCANNER_ERROR: i32 = 2;
    pub const INVALID_USAGE: i32 = 3;
    pub const BOOTSTRAP_FAILURE: i32 = 4;
}

/// Map a finished run to its exit code
///
/// Tripped thresholds win over scanner failures: the issues that were found
/// are still real.
pub fn exit_code_for(result: &ScanResult, fail_on: &FailOn) -> i32 {
    let breaches = evaluate_thresholds(result, fail_on);
    if !breaches.is_empty() {
        for breach in &breaches {
            log::info!(
                "{} issue(s) in '{}' at or above fail-on threshold '{}'",
                breach.issue_count,
                breach.group,
                breach.threshold
            );
        }
        return ExitCode::ISSUES_FOUND;
    }

    let metadata = result.metadata();
    if metadata.all_scanners_failed() {
        let all_unavailable = metadata
            .scanners_used
            .iter()
            .all(|r| r.failure_kind == Some(FailureKind::Unavailable));
        return if all_unavailable {
            ExitCode::BOOTSTRAP_FAILURE
        } else {
            ExitCode::SCANNER_ERROR
        };
    }

    ExitCode::SUCCESS
}
