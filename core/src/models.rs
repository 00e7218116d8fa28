use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot document: one entry per program key.
pub type ProgramMap = BTreeMap<String, ProgramRecord>;

/// Ingested representation of one academic program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramRecord {
    pub key: String,
    pub name: String,
    pub url: String,
    pub text_chunks: Vec<String>,
    /// Heuristically extracted course titles; may be empty, in which case
    /// consumers fall back to mid-length text chunks.
    pub courses: Vec<String>,
}
