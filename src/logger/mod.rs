//! Activity logging (opt-in append-only JSONL).

pub mod jsonl;
