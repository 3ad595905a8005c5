//! SLN-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, SlnError>;

/// Top-level error type for Seclab Notebook.
///
/// The analyzer itself never produces one of these from `analyze` — decode
/// failures degrade to a minimal outcome instead. Errors cover the
/// surrounding crate: config loading, store lookups, rule compilation, IO.
#[derive(Debug, Error)]
pub enum SlnError {
    #[error("[SLN-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[SLN-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[SLN-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[SLN-2001] unknown {kind} record: {id}")]
    UnknownRecord { kind: &'static str, id: String },

    #[error("[SLN-2002] rule pattern compile failure: {details}")]
    Pattern { details: String },

    #[error("[SLN-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[SLN-3001] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[SLN-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl SlnError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "SLN-1001",
            Self::MissingConfig { .. } => "SLN-1002",
            Self::ConfigParse { .. } => "SLN-1003",
            Self::UnknownRecord { .. } => "SLN-2001",
            Self::Pattern { .. } => "SLN-2002",
            Self::Serialization { .. } => "SLN-2101",
            Self::Io { .. } => "SLN-3001",
            Self::Runtime { .. } => "SLN-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Runtime { .. })
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for SlnError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for SlnError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<regex::Error> for SlnError {
    fn from(value: regex::Error) -> Self {
        Self::Pattern {
            details: value.to_string(),
        }
    }
}
