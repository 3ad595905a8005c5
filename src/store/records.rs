//! Record types for the session notebook: services, attack writeups,
//! artifacts, analysis results.

#![allow(missing_docs)]

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::analyzer::findings::{AnalysisOutcome, Findings, Severity};

/// Network service category a configuration record documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Dns,
    Dhcp,
    Ftp,
    Ssh,
}

/// Attack-simulation category a writeup documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    ArpSpoofing,
    DnsSpoofing,
    DhcpStarvation,
    FtpBruteForce,
    SshBruteForce,
}

/// Declared type tag of an uploaded artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Log,
    Pcap,
    Screenshot,
    Other,
}

impl FileType {
    /// Lowercase label matching the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Pcap => "pcap",
            Self::Screenshot => "screenshot",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A logged network-service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    #[serde(rename = "serviceType")]
    pub kind: ServiceKind,
    pub title: String,
    pub description: String,
    pub commands: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new service record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDraft {
    pub kind: ServiceKind,
    pub title: String,
    pub description: String,
    pub commands: String,
    pub notes: String,
}

/// Partial update for a service record; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceUpdate {
    pub kind: Option<ServiceKind>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub commands: Option<String>,
    pub notes: Option<String>,
}

/// An attack-simulation writeup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attack {
    pub id: String,
    #[serde(rename = "attackType")]
    pub kind: AttackKind,
    pub title: String,
    pub description: String,
    pub results: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new attack writeup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackDraft {
    pub kind: AttackKind,
    pub title: String,
    pub description: String,
    pub results: String,
    pub notes: String,
}

/// Partial update for an attack writeup; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttackUpdate {
    pub kind: Option<AttackKind>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub results: Option<String>,
    pub notes: Option<String>,
}

/// An uploaded file plus metadata. Immutable once created; the analyzer
/// never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: String,
    pub filename: String,
    pub file_type: FileType,
    /// Raw bytes. Not serialized; exports carry metadata and the digest.
    #[serde(skip)]
    pub content: Vec<u8>,
    pub size_bytes: u64,
    /// SHA-256 hex digest of the content, computed at ingest.
    pub sha256: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_attack: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDraft {
    pub filename: String,
    pub file_type: FileType,
    pub content: Vec<u8>,
    pub notes: String,
    pub related_service: Option<String>,
    pub related_attack: Option<String>,
}

impl Artifact {
    /// Build a full record from a draft: id, size, digest, timestamp.
    #[must_use]
    pub fn from_draft(draft: ArtifactDraft) -> Self {
        let size_bytes = draft.content.len() as u64;
        let sha256 = sha256_hex(&draft.content);
        Self {
            id: record_id(),
            filename: draft.filename,
            file_type: draft.file_type,
            content: draft.content,
            size_bytes,
            sha256,
            notes: draft.notes,
            related_service: draft.related_service,
            related_attack: draft.related_attack,
            created_at: Utc::now(),
        }
    }
}

/// One analysis run over one artifact. Created once, never mutated; removed
/// only when the owning artifact is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub artifact_id: String,
    /// `"<filetype>_analysis"`, e.g. `log_analysis`.
    pub analysis_type: String,
    pub findings: Findings,
    pub summary: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Wrap an analyzer outcome for a given artifact.
    #[must_use]
    pub fn from_outcome(artifact: &Artifact, outcome: AnalysisOutcome) -> Self {
        Self {
            id: record_id(),
            artifact_id: artifact.id.clone(),
            analysis_type: format!("{}_analysis", artifact.file_type),
            findings: outcome.findings,
            summary: outcome.summary,
            severity: outcome.severity,
            created_at: Utc::now(),
        }
    }
}

/// Random 32-hex record id (128 bits), the session-scoped stand-in for the
/// browser tool's `crypto.randomUUID()`.
#[must_use]
pub fn record_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    let mut out = String::with_capacity(32);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// SHA-256 hex digest of a byte slice.
#[must_use]
pub fn sha256_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}
