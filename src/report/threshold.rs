//! Fail-on thresholds
//!
//! A threshold decides whether the issues of one group make the run fail.
//! Groups are looked up by exact domain name first, then by the domain's
//! threshold group, then the default.

use crate::model::api::{ScanDomain, ScanResult, Severity, UnifiedIssue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// When the issues of a group fail the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Threshold {
    /// Any issue at or above this severity
    Severity(Severity),
    /// Any high or critical issue
    Error,
    /// Any issue at all
    Any,
    /// Never
    None,
}

impl Threshold {
    /// Whether `issue` trips this threshold
    pub fn is_tripped_by(&self, issue: &UnifiedIssue) -> bool {
        match self {
            Threshold::Severity(min) => issue.severity.meets(*min),
            Threshold::Error => issue.severity.meets(Severity::High),
            Threshold::Any => true,
            Threshold::None => false,
        }
    }
}

impl FromStr for Threshold {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Threshold::Error),
            "any" => Ok(Threshold::Any),
            "none" => Ok(Threshold::None),
            other => other.parse::<Severity>().map(Threshold::Severity).map_err(|_| {
                format!(
                    "invalid threshold '{}': expected a severity (info, low, medium, high, critical), 'error', 'any' or 'none'",
                    s
                )
            }),
        }
    }
}

impl TryFrom<String> for Threshold {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl From<Threshold> for String {
    fn from(threshold: Threshold) -> Self {
        threshold.to_string()
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Severity(severity) => write!(f, "{}", severity),
            Threshold::Error => write!(f, "error"),
            Threshold::Any => write!(f, "any"),
            Threshold::None => write!(f, "none"),
        }
    }
}

/// `[fail_on]` table: a default plus per-group overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailOn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Threshold>,
    #[serde(flatten)]
    pub groups: BTreeMap<String, Threshold>,
}

impl FailOn {
    /// Same threshold for every group
    pub fn uniform(threshold: Threshold) -> Self {
        Self {
            default: Some(threshold),
            groups: BTreeMap::new(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>, threshold: Threshold) -> Self {
        self.groups.insert(group.into(), threshold);
        self
    }

    /// Threshold applying to `domain`, if any
    pub fn threshold_for(&self, domain: ScanDomain) -> Option<Threshold> {
        self.groups
            .get(&domain.to_string())
            .or_else(|| self.groups.get(domain.threshold_group()))
            .copied()
            .or(self.default)
    }

    /// Group keys that are neither a domain nor a threshold group
    pub fn unknown_groups(&self) -> Vec<&str> {
        self.groups
            .keys()
            .map(String::as_str)
            .filter(|key| !is_known_group(key))
            .collect()
    }
}

fn is_known_group(key: &str) -> bool {
    use strum::IntoEnumIterator;
    ScanDomain::iter().any(|d| d.to_string() == key || d.threshold_group() == key)
}

/// A group whose issues exceeded its threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdBreach {
    pub group: String,
    pub threshold: Threshold,
    pub issue_count: usize,
}

/// Evaluate `fail_on` against the final issue list
///
/// Breaches are reported per threshold group, ordered by group name.
pub fn evaluate_thresholds(result: &ScanResult, fail_on: &FailOn) -> Vec<ThresholdBreach> {
    let mut breaches: BTreeMap<&'static str, ThresholdBreach> = BTreeMap::new();

    for issue in result.issues() {
        let Some(threshold) = fail_on.threshold_for(issue.domain) else {
            continue;
        };
        if !threshold.is_tripped_by(issue) {
            continue;
        }
        let group = issue.domain.threshold_group();
        breaches
            .entry(group)
            .or_insert_with(|| ThresholdBreach {
                group: group.to_string(),
                threshold,
                issue_count: 0,
            })
            .issue_count += 1;
    }

    breaches.into_values().collect()
}
