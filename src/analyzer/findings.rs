//! Structured analyzer output: findings record, severity tier, outcome tuple.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse risk tier assigned to one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Lowercase label matching the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One keyword-vocabulary hit: the keyword and its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordHit {
    pub keyword: String,
    pub count: usize,
}

/// Open-ended findings record produced by one analysis run.
///
/// Fields are populated only when the relevant log-kind branch fired;
/// `None` / empty means "not applicable", never zero. Serialized field
/// names stay camelCase for parity with the course tool's JSON exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Findings {
    /// Count of non-blank lines in the decoded content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_lines: Option<usize>,
    /// Failed login attempts (SSH/FTP branches; FTP overwrites SSH).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_logins: Option<usize>,
    /// Successful logins (SSH/FTP branches; FTP overwrites SSH).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub successful_logins: Option<usize>,
    /// Distinct dotted-quad strings, first-seen order (SSH branch only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_ips: Option<Vec<String>>,
    /// DHCPDISCOVER count (DHCP branch only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_discover_count: Option<usize>,
    /// Human-readable pattern-detection strings, append-only, detection order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
    /// Keyword vocabulary hits with count > 0, vocabulary order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<KeywordHit>,
}

/// What [`crate::analyzer::engine::AnalyzerEngine::analyze`] returns:
/// findings + summary string + severity. Always well-formed; there is no
/// error path out of the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub findings: Findings,
    pub summary: String,
    pub severity: Severity,
}
