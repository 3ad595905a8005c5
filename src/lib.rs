#![forbid(unsafe_code)]

//! Seclab Notebook (sln) — session-scoped record keeper for a network
//! security lab course.
//!
//! Three pieces:
//! 1. **Session store** — in-memory services, attack writeups, uploaded
//!    artifacts, and analysis results, with cascade delete
//! 2. **Artifact analyzer** — heuristic log classification (SSH/FTP/DHCP/DNS)
//!    with regex counters, keyword scan, and a severity rating
//! 3. **Activity log** — opt-in append-only JSONL event trail
//!
//! Nothing is persisted: all records live for the lifetime of one
//! [`store::notebook::Notebook`], matching the session-only design of the
//! course tool this crate backs.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use seclab_notebook::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use seclab_notebook::analyzer::engine::AnalyzerEngine;
//! use seclab_notebook::store::notebook::Notebook;
//! ```

pub mod prelude;

pub mod analyzer;
pub mod core;
pub mod logger;
pub mod store;
