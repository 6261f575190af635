//! Morphological layer for classical-Arabic construction detection.
//!
//! Provides:
//! - The tagged segment model and its structural composite key
//! - Diacritic-aware orthography helpers
//! - Centralized closed-set particle and pronoun tables
//! - An optional authoritative lexicon
//! - The morpheme aggregation engine

pub mod aggregate;
pub mod closed_sets;
pub mod lexicon;
pub mod orthography;
pub mod segment;

pub use aggregate::{aggregate, AggregatedUnit, Aggregator, UnitKind};
pub use closed_sets::{ClosedSets, MorphemeKind, ParticleClass};
pub use lexicon::{Lexicon, LexiconEntry, LexiconError};
pub use orthography::{ArabicNormalizer, PronounSplit};
pub use segment::{
    compare_ids, GrammaticalCase, GrammaticalRole, MorphCategory, NounPattern, NounState,
    Segment, SegmentFeatures, SegmentId, SegmentIdError, SegmentRole,
};
