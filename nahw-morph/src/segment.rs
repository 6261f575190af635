//! Segment Model
//!
//! Tagged morphemes as delivered by the upstream segmentation collaborator,
//! together with the structural composite key used to order them.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SegmentIdError {
    #[error("segment id string cannot be empty")]
    EmptyString,

    #[error("segment id {id:?} must have 4 dash-separated parts, got {parts}")]
    PartCount { id: String, parts: usize },

    #[error("segment id {id:?} has a non-numeric part {part:?}")]
    NonNumeric { id: String, part: String },

    #[error("segment id {id:?} must have positive parts")]
    NonPositive { id: String },
}

/// Composite `{surah}-{verse}-{word}-{segment}` key.
///
/// Field order matters: the derived ordering is the numeric 4-tuple order, so
/// `1-2-10-1` sorts after `1-2-9-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId {
    pub surah: u32,
    pub verse: u32,
    pub word: u32,
    pub segment: u32,
}

impl SegmentId {
    pub fn new(surah: u32, verse: u32, word: u32, segment: u32) -> Self {
        Self {
            surah,
            verse,
            word,
            segment,
        }
    }

    /// Key of the orthographic word this segment belongs to.
    pub fn word_key(&self) -> (u32, u32, u32) {
        (self.surah, self.verse, self.word)
    }

    pub fn same_word(&self, other: &SegmentId) -> bool {
        self.word_key() == other.word_key()
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.surah, self.verse, self.word, self.segment
        )
    }
}

impl FromStr for SegmentId {
    type Err = SegmentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SegmentIdError::EmptyString);
        }

        let parts: Vec<&str> = trimmed.split('-').collect();
        if parts.len() != 4 {
            return Err(SegmentIdError::PartCount {
                id: s.to_string(),
                parts: parts.len(),
            });
        }

        let mut values = [0u32; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse::<u32>().map_err(|_| SegmentIdError::NonNumeric {
                id: s.to_string(),
                part: part.to_string(),
            })?;
        }

        if values.iter().any(|v| *v == 0) {
            return Err(SegmentIdError::NonPositive { id: s.to_string() });
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphCategory {
    Noun,
    Verb,
    Particle,
    Adjective,
}

impl MorphCategory {
    /// Nouns and adjectives.
    pub fn is_nominal(&self) -> bool {
        matches!(self, MorphCategory::Noun | MorphCategory::Adjective)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SegmentRole {
    Prefix,
    #[default]
    Root,
    Suffix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammaticalCase {
    Nominative,
    Accusative,
    Genitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NounState {
    Construct,
    Definite,
    Indefinite,
}

/// Declension class of a noun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NounPattern {
    /// Fully declinable (triptote).
    Flexible,
    /// Diptote: takes fatha in the genitive.
    PartlyFlexible,
    /// Indeclinable: no visible case ending.
    NonFlexible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammaticalRole {
    DefiniteArticle,
    Pronoun,
    AttachedPronoun,
    Preposition,
    Conjunction,
    Particle,
    #[serde(other)]
    Other,
}

/// Optional linguistic features of a segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<GrammaticalCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<NounState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<NounPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammatical_role: Option<GrammaticalRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tense: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

impl SegmentFeatures {
    pub fn is_genitive(&self) -> bool {
        self.case == Some(GrammaticalCase::Genitive)
    }

    /// An explicit case tag that is not genitive.
    pub fn has_conflicting_case(&self) -> bool {
        matches!(self.case, Some(case) if case != GrammaticalCase::Genitive)
    }

    pub fn is_construct(&self) -> bool {
        self.state == Some(NounState::Construct)
    }

    pub fn is_definite(&self) -> bool {
        self.state == Some(NounState::Definite)
    }

    pub fn is_definite_article(&self) -> bool {
        self.grammatical_role == Some(GrammaticalRole::DefiniteArticle)
    }

    pub fn has_pattern(&self, pattern: NounPattern) -> bool {
        self.pattern == Some(pattern)
    }
}

/// A tagged morpheme.
///
/// `text` and `morphology` may be absent on malformed upstream records; the
/// engines degrade instead of rejecting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morphology: Option<MorphCategory>,
    #[serde(rename = "type", default)]
    pub role: SegmentRole,
    #[serde(flatten)]
    pub features: SegmentFeatures,
}

impl Segment {
    pub fn new(id: impl Into<String>, text: impl Into<String>, morphology: MorphCategory) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            morphology: Some(morphology),
            role: SegmentRole::Root,
            features: SegmentFeatures::default(),
        }
    }

    pub fn with_role(mut self, role: SegmentRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_case(mut self, case: GrammaticalCase) -> Self {
        self.features.case = Some(case);
        self
    }

    pub fn with_state(mut self, state: NounState) -> Self {
        self.features.state = Some(state);
        self
    }

    pub fn with_pattern(mut self, pattern: NounPattern) -> Self {
        self.features.pattern = Some(pattern);
        self
    }

    pub fn with_grammatical_role(mut self, role: GrammaticalRole) -> Self {
        self.features.grammatical_role = Some(role);
        self
    }

    /// Parse the composite id.
    pub fn key(&self) -> Result<SegmentId, SegmentIdError> {
        self.id.parse()
    }

    /// Missing text or morphology.
    pub fn is_malformed(&self) -> bool {
        self.text.trim().is_empty() || self.morphology.is_none()
    }

    pub fn is_prefix(&self) -> bool {
        self.role == SegmentRole::Prefix
    }

    pub fn is_suffix(&self) -> bool {
        self.role == SegmentRole::Suffix
    }

    pub fn is_verb(&self) -> bool {
        self.morphology == Some(MorphCategory::Verb)
    }

    pub fn is_nominal(&self) -> bool {
        self.morphology.map(|m| m.is_nominal()).unwrap_or(false)
    }
}

/// Orders segments by structural key; unparseable ids sort last, by raw id.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<SegmentId>(), b.parse::<SegmentId>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
