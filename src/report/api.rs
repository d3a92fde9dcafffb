//! Public API for result evaluation

pub use crate::report::exit_codes::{exit_code_for, ExitCode};
pub use crate::report::threshold::{evaluate_thresholds, FailOn, Threshold, ThresholdBreach};
