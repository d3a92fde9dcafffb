//! Scan domains
//!
//! A domain is a category of analysis. Security scanners report one of the
//! fine-grained security domains; linters, type checkers and the other tool
//! families report their own domain.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ScanDomain {
    /// Dependency / software composition analysis
    Sca,
    /// Static application security testing
    Sast,
    /// Infrastructure as code
    Iac,
    Container,
    Security,
    Linting,
    TypeChecking,
    Testing,
    Coverage,
    Duplication,
}

impl ScanDomain {
    /// Name of the fail-on threshold group this domain is evaluated under
    pub fn threshold_group(self) -> &'static str {
        match self {
            ScanDomain::Sca
            | ScanDomain::Sast
            | ScanDomain::Iac
            | ScanDomain::Container
            | ScanDomain::Security => "security",
            ScanDomain::Linting => "linting",
            ScanDomain::TypeChecking => "type_checking",
            ScanDomain::Testing => "testing",
            ScanDomain::Coverage => "coverage",
            ScanDomain::Duplication => "duplication",
        }
    }
}
