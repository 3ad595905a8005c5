//! Analysis engine: file-type dispatch, log heuristics, severity pipeline,
//! summary assembly.
//!
//! `analyze` is a pure, total function over the artifact's bytes and
//! filename. There is no error path: undecodable content degrades to a
//! fixed minimal outcome so a bad upload can never abort the surrounding
//! workflow.

use crate::analyzer::findings::{AnalysisOutcome, Findings, Severity};
use crate::analyzer::rules::{
    self, LogRules, MSG_BRUTE_FORCE, MSG_DHCP_STARVATION, MSG_FTP_FAILURES, MSG_GENERIC_STUB,
    MSG_MULTIPLE_FAILED_LOGINS, MSG_NXDOMAIN_FLOOD, MSG_PCAP_STUB, SubtypeMatches,
};
use crate::core::config::AnalyzerConfig;
use crate::core::errors::Result;
use crate::store::records::{Artifact, FileType};

/// Summary emitted when the artifact bytes are not valid text.
pub const MSG_UNREADABLE: &str = "Unable to analyze file. File may be binary or corrupted.";

/// Heuristic analyzer with a compiled rule set and configured thresholds.
#[derive(Debug, Clone)]
pub struct AnalyzerEngine {
    config: AnalyzerConfig,
    rules: LogRules,
}

impl AnalyzerEngine {
    /// Build an engine, compiling the fixed rule set once.
    pub fn new(config: &AnalyzerConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            rules: LogRules::new()?,
        })
    }

    /// Engine with the course tool's default thresholds.
    pub fn from_defaults() -> Result<Self> {
        Self::new(&AnalyzerConfig::default())
    }

    /// Analyze one stored artifact. Never fails; see module docs.
    #[must_use]
    pub fn analyze(&self, artifact: &Artifact) -> AnalysisOutcome {
        let Ok(content) = std::str::from_utf8(&artifact.content) else {
            return unreadable_outcome();
        };

        match artifact.file_type {
            FileType::Log => self.analyze_log(content, &artifact.filename),
            FileType::Pcap => pcap_outcome(&artifact.filename),
            FileType::Screenshot | FileType::Other => generic_outcome(content),
        }
    }

    /// Full heuristic log analysis.
    ///
    /// Branch order matters: SSH then FTP then DHCP then DNS. The FTP branch
    /// overwrites SSH-derived login counts when both subtypes match
    /// (last-branch-wins, kept as-is from the original tool), and the DHCP
    /// storm rule can downgrade a critical login-tier severity to high.
    fn analyze_log(&self, content: &str, filename: &str) -> AnalysisOutcome {
        let cfg = &self.config;
        let total_lines = non_blank_lines(content);
        let filename_lower = filename.to_lowercase();
        let content_lower = content.to_lowercase();
        let matched = SubtypeMatches::classify(&filename_lower, &content_lower);

        let mut findings = Findings {
            total_lines: Some(total_lines),
            ..Findings::default()
        };

        if matched.ssh {
            let failed = self.rules.ssh_failed_count(content);
            findings.failed_logins = Some(failed);
            findings.successful_logins = Some(self.rules.ssh_accepted_count(content));
            findings.unique_ips = Some(self.rules.unique_ips(content));

            if failed > cfg.failed_login_pattern_threshold {
                findings.patterns.push(MSG_MULTIPLE_FAILED_LOGINS.to_string());
            }
            if failed > cfg.brute_force_threshold {
                findings.patterns.push(MSG_BRUTE_FORCE.to_string());
            }
        }

        if matched.ftp {
            let failed = self.rules.ftp_failed_count(content);
            findings.failed_logins = Some(failed);
            findings.successful_logins = Some(self.rules.ftp_accepted_count(content));

            if failed > cfg.ftp_failure_threshold {
                findings.patterns.push(MSG_FTP_FAILURES.to_string());
            }
        }

        if matched.dhcp {
            let discovers = self.rules.dhcp_discover_count(content);
            let requests = self.rules.dhcp_request_count(content);
            let acks = self.rules.dhcp_ack_count(content);
            findings.dhcp_discover_count = Some(discovers);

            if discovers > cfg.dhcp_storm_threshold {
                findings.patterns.push(MSG_DHCP_STARVATION.to_string());
            }
            findings.patterns.push(format!(
                "DHCP Activity: {discovers} discovers, {requests} requests, {acks} acks"
            ));
        }

        if matched.dns {
            let queries = self.rules.dns_query_count(content);
            let nxdomains = self.rules.dns_nxdomain_count(content);

            findings.patterns.push(format!(
                "DNS Queries: {queries} total, {nxdomains} NXDOMAIN responses"
            ));
            if nxdomains > cfg.nxdomain_threshold {
                findings.patterns.push(MSG_NXDOMAIN_FLOOD.to_string());
            }
        }

        findings.keywords = rules::keyword_hits(&content_lower);

        // Severity is an ordered pipeline, not a max-merge: login tiering
        // first, then the DHCP storm rule forces high — even over critical.
        let mut severity = Severity::Low;
        let mut summary = format!("Analyzed {total_lines} log lines. ");

        if let Some(failed) = findings.failed_logins.filter(|f| *f > 0) {
            summary.push_str(&format!("Found {failed} failed login attempts. "));
            if failed > cfg.critical_login_threshold {
                severity = Severity::Critical;
            } else if failed > cfg.high_login_threshold {
                severity = Severity::High;
            } else if failed > cfg.medium_login_threshold {
                severity = Severity::Medium;
            }
        }

        if let Some(discovers) = findings
            .dhcp_discover_count
            .filter(|d| *d > cfg.dhcp_storm_threshold)
        {
            severity = Severity::High;
            summary.push_str(&format!(
                "Detected {discovers} DHCP DISCOVER messages (potential attack). "
            ));
        }

        if !findings.patterns.is_empty() {
            summary.push_str(&format!("{} patterns identified.", findings.patterns.len()));
        }

        if severity == Severity::Low && findings.patterns.is_empty() {
            summary.push_str("No significant security issues detected.");
        }

        AnalysisOutcome {
            findings,
            summary,
            severity,
        }
    }
}

fn non_blank_lines(content: &str) -> usize {
    content.lines().filter(|line| !line.trim().is_empty()).count()
}

fn unreadable_outcome() -> AnalysisOutcome {
    AnalysisOutcome {
        findings: Findings::default(),
        summary: MSG_UNREADABLE.to_string(),
        severity: Severity::Low,
    }
}

fn pcap_outcome(filename: &str) -> AnalysisOutcome {
    AnalysisOutcome {
        findings: Findings {
            patterns: vec![MSG_PCAP_STUB.to_string()],
            ..Findings::default()
        },
        summary: format!(
            "PCAP file \"{filename}\" uploaded. Use network analysis tools like Wireshark for detailed packet inspection."
        ),
        severity: Severity::Low,
    }
}

fn generic_outcome(content: &str) -> AnalysisOutcome {
    let total_lines = non_blank_lines(content);
    AnalysisOutcome {
        findings: Findings {
            total_lines: Some(total_lines),
            patterns: vec![MSG_GENERIC_STUB.to_string()],
            ..Findings::default()
        },
        summary: format!(
            "File contains {total_lines} lines. No specific security patterns identified."
        ),
        severity: Severity::Low,
    }
}
