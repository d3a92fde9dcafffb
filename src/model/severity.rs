//! Unified severity levels

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Severity shared by all scanners
///
/// Variants are declared from least to most severe so the derived ordering
/// can be used directly for threshold comparisons.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, most severe first
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    /// True when this severity is at or above `threshold`
    pub fn meets(self, threshold: Severity) -> bool {
        self >= threshold
    }
}
