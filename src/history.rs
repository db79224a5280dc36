//! In-memory generation history.
//!
//! An append-only log owned by the application layer; the core components
//! stay stateless and never own it. Nothing persists beyond the process.

use serde::{Deserialize, Serialize};

use crate::prompt::ProblemType;
use crate::splitter::ParsedDocument;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Human-readable label, e.g. topic and timestamp chosen by the caller.
    pub label: String,
    pub problem_type: ProblemType,
    pub parsed: ParsedDocument,
    pub had_audio: bool,
}

#[derive(Debug, Default)]
pub struct HistoryLog {
    records: Vec<GenerationRecord>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: GenerationRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GenerationRecord> {
        self.records.get(index)
    }

    pub fn latest(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenerationRecord> {
        self.records.iter()
    }

    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records)
    }
}
