//! Optional authoritative lexicon keyed by composite segment id.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::segment::{GrammaticalCase, NounPattern, NounState};

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("lexicon parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<GrammaticalCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<NounState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<NounPattern>,
}

impl LexiconEntry {
    pub fn is_genitive(&self) -> bool {
        self.case == Some(GrammaticalCase::Genitive)
    }

    /// Asserts a case other than genitive.
    pub fn rules_out_genitive(&self) -> bool {
        matches!(self.case, Some(case) if case != GrammaticalCase::Genitive)
    }
}

/// Lexicon entries take priority over text-pattern heuristics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon {
    entries: HashMap<String, LexiconEntry>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON object mapping composite ids to entries.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn insert(&mut self, id: impl Into<String>, entry: LexiconEntry) {
        self.entries.insert(id.into(), entry);
    }

    pub fn get(&self, id: &str) -> Option<&LexiconEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, LexiconEntry)> for Lexicon {
    fn from_iter<I: IntoIterator<Item = (String, LexiconEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
