//! Fixed detection rule set: subtype keyword sets, per-protocol regex
//! counters, keyword vocabulary, pattern message strings.
//!
//! All regexes are case-insensitive and use ASCII digit classes, matching
//! the course tool's JavaScript patterns (`\d` there is `[0-9]`). Counts are
//! non-overlapping leftmost matches, which both engines agree on.

#![allow(missing_docs)]

use regex::Regex;

use crate::analyzer::findings::KeywordHit;
use crate::core::errors::Result;

/// Fixed keyword vocabulary scanned on every log analysis, in declaration
/// order. Order is part of the output contract.
pub const KEYWORD_VOCABULARY: [&str; 6] =
    ["error", "warning", "denied", "failed", "attack", "suspicious"];

// Pattern-detection message strings. Fixed wording; thresholds that gate
// them live in `AnalyzerConfig`.
pub const MSG_MULTIPLE_FAILED_LOGINS: &str = "Multiple failed login attempts detected";
pub const MSG_BRUTE_FORCE: &str = "Possible brute force attack detected";
pub const MSG_FTP_FAILURES: &str = "Multiple FTP authentication failures detected";
pub const MSG_DHCP_STARVATION: &str =
    "Excessive DHCP DISCOVER messages - possible DHCP starvation attack";
pub const MSG_NXDOMAIN_FLOOD: &str =
    "High number of NXDOMAIN responses - possible DNS spoofing or tunneling";
pub const MSG_PCAP_STUB: &str =
    "PCAP file detected - requires Wireshark or tcpdump for detailed analysis";
pub const MSG_GENERIC_STUB: &str = "Generic file analysis - no specific patterns detected";

/// Which log subtypes a file matched. Classification is OR-based across
/// filename and content and non-exclusive: all matched branches run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct SubtypeMatches {
    pub ssh: bool,
    pub ftp: bool,
    pub dhcp: bool,
    pub dns: bool,
}

impl SubtypeMatches {
    /// Classify from pre-lowercased filename and content.
    #[must_use]
    pub fn classify(filename_lower: &str, content_lower: &str) -> Self {
        let hit = |needles: &[&str]| {
            needles
                .iter()
                .any(|n| filename_lower.contains(n) || content_lower.contains(n))
        };
        Self {
            ssh: hit(&["ssh", "sshd"]),
            ftp: hit(&["ftp"]),
            dhcp: hit(&["dhcp"]),
            dns: hit(&["dns", "bind", "named"]),
        }
    }
}

/// Compiled regex counters for the four log subtypes.
#[derive(Debug, Clone)]
pub struct LogRules {
    ssh_failed: Regex,
    ssh_accepted: Regex,
    ipv4: Regex,
    ftp_failed: Regex,
    ftp_accepted: Regex,
    dhcp_discover: Regex,
    dhcp_request: Regex,
    dhcp_ack: Regex,
    dns_query: Regex,
    dns_nxdomain: Regex,
}

impl LogRules {
    /// Compile the fixed rule set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            ssh_failed: Regex::new(r"(?i)Failed password|authentication failure|Invalid user")?,
            ssh_accepted: Regex::new(r"(?i)Accepted password|session opened")?,
            // Permissive on purpose: no octet range validation, so
            // 999.999.999.999 counts as an address.
            ipv4: Regex::new(r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}")?,
            ftp_failed: Regex::new(r"(?i)530 Login incorrect|Login failed|Authentication failed")?,
            ftp_accepted: Regex::new(r"(?i)230 Login successful|User .* logged in")?,
            dhcp_discover: Regex::new(r"(?i)DHCPDISCOVER|DHCP DISCOVER")?,
            dhcp_request: Regex::new(r"(?i)DHCPREQUEST|DHCP REQUEST")?,
            dhcp_ack: Regex::new(r"(?i)DHCPACK|DHCP ACK")?,
            dns_query: Regex::new(r"(?i)query:|A\?|AAAA\?")?,
            dns_nxdomain: Regex::new(r"(?i)NXDOMAIN")?,
        })
    }

    pub fn ssh_failed_count(&self, content: &str) -> usize {
        self.ssh_failed.find_iter(content).count()
    }

    pub fn ssh_accepted_count(&self, content: &str) -> usize {
        self.ssh_accepted.find_iter(content).count()
    }

    /// Dotted-quad substrings, deduplicated preserving first occurrence.
    pub fn unique_ips(&self, content: &str) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut ips = Vec::new();
        for m in self.ipv4.find_iter(content) {
            if seen.insert(m.as_str()) {
                ips.push(m.as_str().to_string());
            }
        }
        ips
    }

    pub fn ftp_failed_count(&self, content: &str) -> usize {
        self.ftp_failed.find_iter(content).count()
    }

    pub fn ftp_accepted_count(&self, content: &str) -> usize {
        self.ftp_accepted.find_iter(content).count()
    }

    pub fn dhcp_discover_count(&self, content: &str) -> usize {
        self.dhcp_discover.find_iter(content).count()
    }

    pub fn dhcp_request_count(&self, content: &str) -> usize {
        self.dhcp_request.find_iter(content).count()
    }

    pub fn dhcp_ack_count(&self, content: &str) -> usize {
        self.dhcp_ack.find_iter(content).count()
    }

    pub fn dns_query_count(&self, content: &str) -> usize {
        self.dns_query.find_iter(content).count()
    }

    pub fn dns_nxdomain_count(&self, content: &str) -> usize {
        self.dns_nxdomain.find_iter(content).count()
    }
}

/// Scan pre-lowercased content for the fixed vocabulary.
///
/// Returns only keywords with count > 0, in vocabulary order. Counting is
/// plain non-overlapping substring search; the vocabulary is all-lowercase
/// so this equals the original's case-insensitive regex count.
#[must_use]
pub fn keyword_hits(content_lower: &str) -> Vec<KeywordHit> {
    KEYWORD_VOCABULARY
        .iter()
        .filter_map(|keyword| {
            let count = content_lower.match_indices(keyword).count();
            (count > 0).then(|| KeywordHit {
                keyword: (*keyword).to_string(),
                count,
            })
        })
        .collect()
}
