//! The three-question test.
//!
//! Q1 and Q2 qualify a first term; Q3 decides whether a following token is
//! its genitive second term and with what evidence.

use nahw_morph::orthography::{
    ends_with_fatha, ends_with_kasra, has_tanween, is_definite_article_form,
    split_attached_pronoun, starts_with_definite_article, PronounSplit,
};
use nahw_morph::{
    ClosedSets, LexiconEntry, MorphCategory, NounPattern, NounState, ParticleClass, Segment,
    SegmentId,
};

use crate::construction::{AppliedRule, PossessorKind};

/// A segment prepared for rule evaluation.
#[derive(Debug, Clone)]
pub(crate) struct Token<'s> {
    pub id: &'s str,
    pub segment: &'s Segment,
    pub entry: Option<&'s LexiconEntry>,
    /// Missing morphology defaults to noun.
    pub morphology: MorphCategory,
    pub degraded: bool,
    pub class: Option<ParticleClass>,
    /// An article segment precedes this one within the same word.
    pub article_prefix: bool,
}

impl<'s> Token<'s> {
    pub fn new(
        id: &'s str,
        segment: &'s Segment,
        entry: Option<&'s LexiconEntry>,
        sets: &ClosedSets,
    ) -> Self {
        Self {
            id,
            segment,
            entry,
            morphology: segment.morphology.unwrap_or(MorphCategory::Noun),
            degraded: segment.is_malformed(),
            class: sets.classify(segment),
            article_prefix: false,
        }
    }

    pub fn text(&self) -> &'s str {
        &self.segment.text
    }

    fn is_pronoun(&self) -> bool {
        self.class.map(|class| class.is_pronoun()).unwrap_or(false)
    }

    fn is_stem(&self) -> bool {
        !self.segment.is_prefix() && !self.segment.is_suffix()
    }

    fn lexicon_state(&self) -> Option<NounState> {
        self.entry.and_then(|entry| entry.state)
    }

    fn pattern(&self) -> Option<NounPattern> {
        self.segment
            .features
            .pattern
            .or_else(|| self.entry.and_then(|entry| entry.pattern))
    }

    fn has_explicit_genitive(&self) -> bool {
        self.segment.features.is_genitive()
            || self.entry.map(|entry| entry.is_genitive()).unwrap_or(false)
    }

    pub fn is_article_particle(&self) -> bool {
        self.segment.features.is_definite_article() || is_definite_article_form(self.text())
    }

    /// Text, tag or lexicon marks the word as definite.
    fn is_definite(&self) -> bool {
        self.has_article()
            || self.segment.features.is_definite_article()
            || self.segment.features.is_definite()
            || self.lexicon_state() == Some(NounState::Definite)
    }

    /// Article written on the segment itself or segmented off before it.
    fn has_article(&self) -> bool {
        self.article_prefix || starts_with_definite_article(self.text())
    }

    pub fn possessor_kind(&self) -> PossessorKind {
        if !self.is_pronoun() {
            PossessorKind::Noun
        } else if self.segment.is_suffix() || self.class == Some(ParticleClass::AttachedPronoun) {
            PossessorKind::AttachedPronoun
        } else {
            PossessorKind::Pronoun
        }
    }
}

/// Flag tokens whose word carries a segmented article before them.
///
/// `keys` holds the structural id of each token, in the same order.
pub(crate) fn mark_article_prefixes(tokens: &mut [Token<'_>], keys: &[SegmentId]) {
    for i in 1..tokens.len() {
        let mut k = i;
        while k > 0 && keys[k - 1].same_word(&keys[i]) {
            k -= 1;
            if tokens[k].is_article_particle() {
                tokens[i].article_prefix = true;
                break;
            }
        }
    }
}

/// Nouns and pronoun-classified particles may head a construction.
pub(crate) fn is_candidate(token: &Token<'_>) -> bool {
    if !token.is_stem() {
        return false;
    }
    match token.morphology {
        MorphCategory::Noun => true,
        MorphCategory::Particle => token.is_pronoun(),
        MorphCategory::Verb | MorphCategory::Adjective => false,
    }
}

/// Q1: is the word light (no tanwin, able to be annexed)?
pub(crate) fn is_light(token: &Token<'_>, sets: &ClosedSets) -> bool {
    match token.lexicon_state() {
        Some(NounState::Construct) => return true,
        Some(NounState::Indefinite) => return false,
        _ => {}
    }

    if has_tanween(token.text()) {
        return false;
    }
    if token.segment.features.is_construct() || sets.is_light_word(token.text()) {
        return true;
    }
    true
}

/// Q2: does the word lack the definite article?
pub(crate) fn lacks_article(token: &Token<'_>) -> bool {
    !token.is_definite()
}

/// Outcome of examining one token after a qualified first term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Accept(AppliedRule),
    /// Token may sit between the terms; keep looking.
    Skip,
    /// Token ends the search for this first term.
    Stop(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopReason {
    Verb,
    ArticleParticle,
    DefiniteNoun,
    NoApplicableRule,
}

/// Q3: is `token` the genitive second term?
///
/// `adjacent` is set when the token directly follows the first term.
pub(crate) fn examine(token: &Token<'_>, adjacent: bool, sets: &ClosedSets) -> Verdict {
    let segment = token.segment;

    if segment.is_suffix() && !token.is_pronoun() {
        return Verdict::Skip;
    }
    if token.morphology == MorphCategory::Verb {
        return Verdict::Stop(StopReason::Verb);
    }
    if token.is_article_particle() {
        return Verdict::Stop(StopReason::ArticleParticle);
    }
    if token.morphology == MorphCategory::Particle
        && !token.is_pronoun()
        && sets.is_boundary_safe(token.text())
    {
        return Verdict::Skip;
    }

    // An explicit genitive tag is authoritative; otherwise the article marks
    // a descriptive adjective or a new definite phrase.
    let explicit_genitive = token.has_explicit_genitive();
    if token.is_definite() && !explicit_genitive {
        return Verdict::Stop(StopReason::DefiniteNoun);
    }

    let nominal = token.morphology.is_nominal();
    if token.degraded {
        return if nominal && !segment.features.has_conflicting_case() {
            Verdict::Accept(AppliedRule::ContextualFallback)
        } else {
            Verdict::Stop(StopReason::NoApplicableRule)
        };
    }

    if segment.features.is_genitive() {
        return Verdict::Accept(AppliedRule::GenitiveCaseTag);
    }

    let lexicon_veto = token
        .entry
        .map(|entry| entry.rules_out_genitive())
        .unwrap_or(false);
    // Pronouns are indeclinable; a vowel on the pronoun is not case evidence.
    if token.is_pronoun() && !lexicon_veto {
        return Verdict::Accept(AppliedRule::PronounPossessor);
    }
    if nominal && !lexicon_veto && ends_with_kasra(token.text()) {
        return Verdict::Accept(AppliedRule::KasraDiacritic);
    }
    if explicit_genitive {
        return Verdict::Accept(AppliedRule::LexiconGenitive);
    }
    if lexicon_veto {
        return Verdict::Stop(StopReason::NoApplicableRule);
    }

    match token.pattern() {
        Some(NounPattern::PartlyFlexible) if nominal && ends_with_fatha(token.text()) => {
            return Verdict::Accept(AppliedRule::DiptoteFatha);
        }
        Some(NounPattern::NonFlexible) if nominal && adjacent => {
            return Verdict::Accept(AppliedRule::IndeclinableNoun);
        }
        _ => {}
    }

    if nominal && !segment.features.has_conflicting_case() && !has_tanween_non_genitive(token) {
        return Verdict::Accept(AppliedRule::ContextualFallback);
    }

    Verdict::Stop(StopReason::NoApplicableRule)
}

/// Nunation other than kasratan cannot mark a genitive.
fn has_tanween_non_genitive(token: &Token<'_>) -> bool {
    token
        .text()
        .chars()
        .any(|ch| matches!(ch, '\u{064B}' | '\u{064C}' | '\u{08F0}' | '\u{08F1}'))
}

/// Attached-pronoun split for a noun-like token, if one applies.
pub(crate) fn attached_pronoun(token: &Token<'_>, min_stem: usize) -> Option<PronounSplit> {
    let noun_like = token.morphology.is_nominal() && token.class.is_none() && token.is_stem();
    if !noun_like || token.text().is_empty() {
        return None;
    }
    if has_tanween(token.text()) || token.has_article() {
        return None;
    }
    split_attached_pronoun(token.text(), min_stem)
}
