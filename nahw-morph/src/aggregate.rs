//! Morpheme Aggregation
//!
//! Groups orthographically fused morphemes into single display/answer units.
//! Segments with independent syntactic function always stand alone; purely
//! morphological prefixes are folded into the stem they attach to. A stem
//! always carries its trailing suffixes, fused or not.

use serde::{Deserialize, Serialize};

use crate::closed_sets::{ClosedSets, MorphemeKind, ParticleClass};
use crate::orthography::is_definite_article_form;
use crate::segment::{Segment, SegmentId};

/// How a unit came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "class", rename_all = "snake_case")]
pub enum UnitKind {
    /// A closed-class word with its own syntactic function.
    Syntactic(ParticleClass),
    /// Prefix run fused with its stem.
    Fused(MorphemeKind),
    Plain,
}

/// A derived grouping of one or more segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedUnit {
    /// Id of the stem segment, or of the first segment when there is no stem.
    pub id: String,
    pub text: String,
    /// Indices into the input slice, ascending.
    pub segment_indices: Vec<usize>,
    pub kind: UnitKind,
}

impl AggregatedUnit {
    fn single(segments: &[Segment], index: usize, kind: UnitKind) -> Self {
        let segment = &segments[index];
        Self {
            id: segment.id.clone(),
            text: segment.text.clone(),
            segment_indices: vec![index],
            kind,
        }
    }

    fn span(segments: &[Segment], start: usize, end: usize, kind: UnitKind) -> Self {
        let members = &segments[start..=end];
        let representative = members
            .iter()
            .find(|segment| !segment.is_prefix() && !segment.is_suffix())
            .unwrap_or(&members[0]);

        Self {
            id: representative.id.clone(),
            text: members.iter().map(|segment| segment.text.as_str()).collect(),
            segment_indices: (start..=end).collect(),
            kind,
        }
    }

    pub fn len(&self) -> usize {
        self.segment_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segment_indices.is_empty()
    }

    pub fn is_fused(&self) -> bool {
        matches!(self.kind, UnitKind::Fused(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Morphological(MorphemeKind),
    Independent(ParticleClass),
    Plain,
}

/// Aggregation engine over a set of closed-class tables.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    sets: &'a ClosedSets,
}

impl Default for Aggregator<'static> {
    fn default() -> Self {
        Self::new(ClosedSets::standard())
    }
}

impl<'a> Aggregator<'a> {
    pub fn new(sets: &'a ClosedSets) -> Self {
        Self { sets }
    }

    /// Group an ordered segment list into units. Total and deterministic.
    pub fn aggregate(&self, segments: &[Segment]) -> Vec<AggregatedUnit> {
        let keys: Vec<Option<SegmentId>> = segments.iter().map(|s| s.key().ok()).collect();
        let mut units = Vec::with_capacity(segments.len());
        let mut i = 0;

        while i < segments.len() {
            match self.disposition(segments, &keys, i) {
                Disposition::Independent(class) => {
                    units.push(AggregatedUnit::single(segments, i, UnitKind::Syntactic(class)));
                    i += 1;
                }
                Disposition::Morphological(kind) => {
                    let end = self.run_end(segments, &keys, i, kind);
                    if end == i {
                        units.push(AggregatedUnit::single(segments, i, UnitKind::Plain));
                    } else {
                        units.push(AggregatedUnit::span(segments, i, end, UnitKind::Fused(kind)));
                    }
                    i = end + 1;
                }
                Disposition::Plain if !segments[i].is_prefix() => {
                    let end = suffix_end(segments, &keys, i);
                    units.push(AggregatedUnit::span(segments, i, end, UnitKind::Plain));
                    i = end + 1;
                }
                Disposition::Plain => {
                    units.push(AggregatedUnit::single(segments, i, UnitKind::Plain));
                    i += 1;
                }
            }
        }

        tracing::trace!(segments = segments.len(), units = units.len(), "aggregated segments");
        units
    }

    fn disposition(
        &self,
        segments: &[Segment],
        keys: &[Option<SegmentId>],
        index: usize,
    ) -> Disposition {
        let segment = &segments[index];

        // The article is morphological even when tagged as a particle.
        if is_article(segment) {
            return Disposition::Morphological(MorphemeKind::DefiniteArticle);
        }

        if segment.is_prefix() && segment.is_verb() && self.sets.is_imperfect_prefix(&segment.text)
        {
            return Disposition::Morphological(MorphemeKind::ImperfectPrefix);
        }

        // A preposition prefix with no nominal of its own word still governs
        // syntactically.
        if segment.is_prefix() && self.sets.is_prefix_preposition(&segment.text) {
            let governs_nominal = segments
                .get(index + 1)
                .filter(|_| same_word(keys, index, index + 1))
                .map(|next| next.is_nominal() || is_article(next))
                .unwrap_or(false);
            return if governs_nominal {
                Disposition::Morphological(MorphemeKind::PrepositionPrefix)
            } else {
                Disposition::Independent(ParticleClass::Preposition)
            };
        }

        match self.sets.classify(segment) {
            Some(class) => Disposition::Independent(class),
            None => Disposition::Plain,
        }
    }

    /// Last index of the maximal run starting at `start`, or `start` itself.
    fn run_end(
        &self,
        segments: &[Segment],
        keys: &[Option<SegmentId>],
        start: usize,
        kind: MorphemeKind,
    ) -> usize {
        let mut end = start;
        let mut kind = kind;

        while let Some(next) = segments.get(end + 1) {
            if !same_word(keys, end, end + 1) || !attaches(kind, next) {
                break;
            }
            end += 1;
            match self.disposition(segments, keys, end) {
                Disposition::Morphological(next_kind) if next.is_prefix() => kind = next_kind,
                _ => break,
            }
        }

        if end == start {
            return start;
        }
        suffix_end(segments, keys, end)
    }
}

/// Last index of the same-word suffixes trailing `end`.
fn suffix_end(segments: &[Segment], keys: &[Option<SegmentId>], mut end: usize) -> usize {
    while let Some(next) = segments.get(end + 1) {
        if !same_word(keys, end, end + 1) || !next.is_suffix() {
            break;
        }
        end += 1;
    }
    end
}

fn is_article(segment: &Segment) -> bool {
    segment.features.is_definite_article() || is_definite_article_form(&segment.text)
}

fn attaches(kind: MorphemeKind, next: &Segment) -> bool {
    match kind {
        MorphemeKind::DefiniteArticle => next.is_nominal(),
        MorphemeKind::ImperfectPrefix => next.is_verb(),
        MorphemeKind::PrepositionPrefix => next.is_nominal() || is_article(next),
    }
}

fn same_word(keys: &[Option<SegmentId>], a: usize, b: usize) -> bool {
    match (keys[a], keys[b]) {
        (Some(x), Some(y)) => x.same_word(&y),
        _ => false,
    }
}

/// Aggregate with the standard tables.
pub fn aggregate(segments: &[Segment]) -> Vec<AggregatedUnit> {
    Aggregator::default().aggregate(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{GrammaticalRole, MorphCategory, SegmentRole};

    fn prefix(id: &str, text: &str, morphology: MorphCategory) -> Segment {
        Segment::new(id, text, morphology).with_role(SegmentRole::Prefix)
    }

    fn suffix(id: &str, text: &str) -> Segment {
        Segment::new(id, text, MorphCategory::Noun).with_role(SegmentRole::Suffix)
    }

    fn noun(id: &str, text: &str) -> Segment {
        Segment::new(id, text, MorphCategory::Noun)
    }

    #[test]
    fn fuses_article_with_noun() {
        let segments = vec![
            prefix("1-1-1-1", "ٱلْ", MorphCategory::Particle),
            noun("1-1-1-2", "حَمْدُ"),
        ];
        let units = aggregate(&segments);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].id, "1-1-1-2");
        assert_eq!(units[0].text, "ٱلْحَمْدُ");
        assert_eq!(units[0].segment_indices, vec![0, 1]);
        assert_eq!(units[0].kind, UnitKind::Fused(MorphemeKind::DefiniteArticle));
    }

    #[test]
    fn article_tag_overrides_particle_classification() {
        let article = Segment::new("1-1-1-1", "ٱلْ", MorphCategory::Particle)
            .with_grammatical_role(GrammaticalRole::DefiniteArticle);
        let units = aggregate(&[article, noun("1-1-1-2", "كِتَٰبُ")]);
        assert_eq!(units.len(), 1);
        assert!(units[0].is_fused());
    }

    #[test]
    fn fuses_preposition_article_noun_and_suffix() {
        let segments = vec![
            prefix("1-1-1-1", "بِ", MorphCategory::Particle),
            prefix("1-1-1-2", "ٱلْ", MorphCategory::Particle),
            noun("1-1-1-3", "كِتَٰبِ"),
            noun("1-1-2-1", "رَبِّ"),
        ];
        let units = aggregate(&segments);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].segment_indices, vec![0, 1, 2]);
        assert_eq!(units[0].kind, UnitKind::Fused(MorphemeKind::PrepositionPrefix));
        assert_eq!(units[1].segment_indices, vec![3]);
    }

    #[test]
    fn run_absorbs_trailing_pronoun() {
        let segments = vec![
            prefix("1-1-1-1", "بِ", MorphCategory::Particle),
            noun("1-1-1-2", "رَبِّ"),
            suffix("1-1-1-3", "هِمْ"),
        ];
        let units = aggregate(&segments);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "بِرَبِّهِمْ");
        assert_eq!(units[0].id, "1-1-1-2");
    }

    #[test]
    fn fuses_imperfect_prefix_with_verb() {
        let segments = vec![
            prefix("1-1-1-1", "يَ", MorphCategory::Verb),
            Segment::new("1-1-1-2", "عْلَمُ", MorphCategory::Verb),
            suffix("1-1-1-3", "ونَ"),
        ];
        let units = aggregate(&segments);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].kind, UnitKind::Fused(MorphemeKind::ImperfectPrefix));
        assert_eq!(units[0].len(), 3);
    }

    #[test]
    fn independent_particles_stand_alone() {
        let segments = vec![
            prefix("1-1-1-1", "وَ", MorphCategory::Particle),
            noun("1-1-1-2", "رَبُّ"),
            suffix("1-1-1-3", "هُمْ"),
        ];
        let units = aggregate(&segments);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].kind, UnitKind::Syntactic(ParticleClass::Conjunction));
        assert_eq!(units[1].kind, UnitKind::Plain);
        assert_eq!(units[1].id, "1-1-1-2");
        assert_eq!(units[1].text, "رَبُّهُمْ");
        assert_eq!(units[1].segment_indices, vec![1, 2]);
    }

    #[test]
    fn plain_stem_keeps_its_suffixes() {
        let segments = vec![
            Segment::new("2-1-1-1", "قَالُ", MorphCategory::Verb),
            Segment::new("2-1-1-2", "وا", MorphCategory::Verb).with_role(SegmentRole::Suffix),
            noun("2-1-2-1", "رَبُّ"),
        ];
        let units = aggregate(&segments);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text, "قَالُوا");
        assert_eq!(units[0].kind, UnitKind::Plain);
        assert_eq!(units[1].segment_indices, vec![2]);
    }

    #[test]
    fn preposition_prefix_without_own_nominal_is_syntactic() {
        let segments = vec![
            prefix("1-1-1-1", "بِ", MorphCategory::Particle),
            noun("1-1-2-1", "رَبِّ"),
        ];
        let units = aggregate(&segments);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].kind, UnitKind::Syntactic(ParticleClass::Preposition));
        assert_eq!(units[1].kind, UnitKind::Plain);
    }

    #[test]
    fn article_without_attachable_stem_stands_alone() {
        let segments = vec![
            prefix("1-1-1-1", "ٱلْ", MorphCategory::Particle),
            Segment::new("1-1-1-2", "قَالَ", MorphCategory::Verb),
        ];
        let units = aggregate(&segments);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].kind, UnitKind::Plain);
    }

    #[test]
    fn never_fuses_across_words() {
        let segments = vec![
            prefix("1-1-1-1", "ٱلْ", MorphCategory::Particle),
            noun("1-1-2-1", "كِتَٰبُ"),
        ];
        assert_eq!(aggregate(&segments).len(), 2);
    }

    #[test]
    fn unparseable_ids_do_not_fuse() {
        let segments = vec![
            prefix("bogus", "ٱلْ", MorphCategory::Particle),
            noun("1-1-1-2", "كِتَٰبُ"),
        ];
        assert_eq!(aggregate(&segments).len(), 2);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let segments = vec![
            prefix("1-1-1-1", "بِ", MorphCategory::Particle),
            noun("1-1-1-2", "سْمِ"),
            prefix("1-1-2-1", "ٱل", MorphCategory::Particle),
            noun("1-1-2-2", "لَّهِ"),
        ];
        let first = aggregate(&segments);
        let second = aggregate(&segments);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_units() {
        assert!(aggregate(&[]).is_empty());
    }
}
