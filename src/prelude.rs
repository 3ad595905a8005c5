//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use seclab_notebook::prelude::*;
//! ```

// Core
pub use crate::core::config::{AnalyzerConfig, Config};
pub use crate::core::errors::{Result, SlnError};

// Analyzer
pub use crate::analyzer::engine::AnalyzerEngine;
pub use crate::analyzer::findings::{AnalysisOutcome, Findings, KeywordHit, Severity};
pub use crate::analyzer::rules::{LogRules, SubtypeMatches};

// Store
pub use crate::store::notebook::Notebook;
pub use crate::store::records::{
    AnalysisResult, Artifact, ArtifactDraft, Attack, AttackDraft, AttackKind, AttackUpdate,
    FileType, Service, ServiceDraft, ServiceKind, ServiceUpdate,
};

// Logger
pub use crate::logger::jsonl::{EventLevel, EventType, JsonlConfig, JsonlWriter, LogEntry};
