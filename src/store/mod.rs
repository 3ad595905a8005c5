//! Session store: record types and the in-memory notebook.

pub mod notebook;
pub mod records;
