//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SlnError};

/// Full notebook configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
    pub paths: PathsConfig,
}

/// Analyzer thresholds.
///
/// Defaults reproduce the course tool's fixed constants; raising or lowering
/// them shifts when escalation patterns fire and how severity tiers, but the
/// emitted message strings never change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Failed-login count above which the "multiple failed attempts" pattern fires.
    pub failed_login_pattern_threshold: usize,
    /// Failed-login count above which the brute-force pattern fires.
    pub brute_force_threshold: usize,
    /// FTP auth-failure count above which the FTP failure pattern fires.
    pub ftp_failure_threshold: usize,
    /// DHCPDISCOVER count above which the starvation pattern fires and
    /// severity is forced to high.
    pub dhcp_storm_threshold: usize,
    /// NXDOMAIN count above which the spoofing/tunneling pattern fires.
    pub nxdomain_threshold: usize,
    /// Failed-login severity tiers: counts above these map to
    /// medium/high/critical respectively.
    pub medium_login_threshold: usize,
    pub high_login_threshold: usize,
    pub critical_login_threshold: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            failed_login_pattern_threshold: 10,
            brute_force_threshold: 50,
            ftp_failure_threshold: 20,
            dhcp_storm_threshold: 100,
            nxdomain_threshold: 50,
            medium_login_threshold: 5,
            high_login_threshold: 20,
            critical_login_threshold: 50,
        }
    }
}

/// File locations used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    /// Effective config file path.
    pub config_file: PathBuf,
    /// Optional JSONL activity log. Unset by default: the notebook is a
    /// session-only tool and writes nothing unless asked to.
    pub activity_log: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!("[SLN-CONFIG] WARNING: HOME not set, falling back to /tmp for paths");
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        Self {
            config_file: home_dir.join(".config").join("sln").join("config.toml"),
            activity_log: None,
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from the default
    /// path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| SlnError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(SlnError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        set_env_usize(
            "SLN_ANALYZER_FAILED_LOGIN_PATTERN_THRESHOLD",
            &mut self.analyzer.failed_login_pattern_threshold,
        )?;
        set_env_usize(
            "SLN_ANALYZER_BRUTE_FORCE_THRESHOLD",
            &mut self.analyzer.brute_force_threshold,
        )?;
        set_env_usize(
            "SLN_ANALYZER_FTP_FAILURE_THRESHOLD",
            &mut self.analyzer.ftp_failure_threshold,
        )?;
        set_env_usize(
            "SLN_ANALYZER_DHCP_STORM_THRESHOLD",
            &mut self.analyzer.dhcp_storm_threshold,
        )?;
        set_env_usize(
            "SLN_ANALYZER_NXDOMAIN_THRESHOLD",
            &mut self.analyzer.nxdomain_threshold,
        )?;
        set_env_usize(
            "SLN_ANALYZER_MEDIUM_LOGIN_THRESHOLD",
            &mut self.analyzer.medium_login_threshold,
        )?;
        set_env_usize(
            "SLN_ANALYZER_HIGH_LOGIN_THRESHOLD",
            &mut self.analyzer.high_login_threshold,
        )?;
        set_env_usize(
            "SLN_ANALYZER_CRITICAL_LOGIN_THRESHOLD",
            &mut self.analyzer.critical_login_threshold,
        )?;

        if let Some(raw) = env::var_os("SLN_ACTIVITY_LOG") {
            let raw = PathBuf::from(raw);
            self.paths.activity_log = if raw.as_os_str().is_empty() {
                None
            } else {
                Some(raw)
            };
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let a = &self.analyzer;
        for (name, val) in [
            (
                "failed_login_pattern_threshold",
                a.failed_login_pattern_threshold,
            ),
            ("brute_force_threshold", a.brute_force_threshold),
            ("ftp_failure_threshold", a.ftp_failure_threshold),
            ("dhcp_storm_threshold", a.dhcp_storm_threshold),
            ("nxdomain_threshold", a.nxdomain_threshold),
            ("medium_login_threshold", a.medium_login_threshold),
            ("high_login_threshold", a.high_login_threshold),
            ("critical_login_threshold", a.critical_login_threshold),
        ] {
            if val == 0 {
                return Err(SlnError::InvalidConfig {
                    details: format!("analyzer.{name} must be >= 1"),
                });
            }
        }

        if !(a.medium_login_threshold < a.high_login_threshold
            && a.high_login_threshold < a.critical_login_threshold)
        {
            return Err(SlnError::InvalidConfig {
                details: "login severity tiers must strictly ascend: medium < high < critical"
                    .to_string(),
            });
        }

        Ok(())
    }
}

fn set_env_usize(name: &str, slot: &mut usize) -> Result<()> {
    if let Ok(raw) = env::var(name) {
        *slot = raw.parse().map_err(|_| SlnError::InvalidConfig {
            details: format!("{name} must be a non-negative integer, got {raw:?}"),
        })?;
    }
    Ok(())
}
