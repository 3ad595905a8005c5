//! Heuristic artifact analyzer: log subtype classification, regex counters,
//! keyword scan, severity derivation.

pub mod engine;
pub mod findings;
pub mod rules;
