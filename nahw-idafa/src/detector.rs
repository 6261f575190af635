//! Idafa detector.
//!
//! Each call builds its own token list and result; nothing survives between
//! calls, so one detector can serve any number of inputs.

use std::collections::HashMap;

use nahw_morph::{ClosedSets, Lexicon, Segment, SegmentId};
use tracing::{debug, info, trace, warn};

use crate::config::DetectorConfig;
use crate::construction::{
    AppliedRule, Construction, ConstructionContext, DetectionResult, PossessorKind,
    PossessorTerm, RoleTerm, ATTACHED_PRONOUN_ID_SUFFIX,
};
use crate::error::DetectError;
use crate::rules::{self, Token, Verdict};

#[derive(Debug, Clone)]
pub struct IdafaDetector<'a> {
    config: DetectorConfig,
    sets: &'a ClosedSets,
}

impl Default for IdafaDetector<'static> {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl IdafaDetector<'static> {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            sets: ClosedSets::standard(),
        }
    }
}

impl<'a> IdafaDetector<'a> {
    pub fn with_sets(config: DetectorConfig, sets: &'a ClosedSets) -> Self {
        Self { config, sets }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect constructions over an id-keyed segment map.
    pub fn detect(
        &self,
        segments: &HashMap<String, Segment>,
        lexicon: Option<&Lexicon>,
    ) -> Result<DetectionResult, DetectError> {
        self.run(
            segments.iter().map(|(id, segment)| (id.as_str(), segment)),
            lexicon,
        )
    }

    /// Detect constructions over segments carrying their own ids.
    pub fn detect_segments<'s, I>(
        &self,
        segments: I,
        lexicon: Option<&Lexicon>,
    ) -> Result<DetectionResult, DetectError>
    where
        I: IntoIterator<Item = &'s Segment>,
    {
        self.run(
            segments
                .into_iter()
                .map(|segment| (segment.id.as_str(), segment)),
            lexicon,
        )
    }

    fn run<'s, I>(&self, entries: I, lexicon: Option<&'s Lexicon>) -> Result<DetectionResult, DetectError>
    where
        I: Iterator<Item = (&'s str, &'s Segment)>,
    {
        let mut keyed: Vec<(SegmentId, &'s str, &'s Segment)> = Vec::new();
        for (id, segment) in entries {
            let key = id.parse::<SegmentId>().map_err(|source| DetectError::InvalidSegmentId {
                id: id.to_string(),
                source,
            })?;
            keyed.push((key, id, segment));
        }

        if keyed.is_empty() {
            debug!("empty input, nothing to detect");
            let mut result = DetectionResult::empty();
            result.notes.push("empty input".to_string());
            return Ok(result);
        }

        keyed.sort_by_key(|(key, _, _)| *key);

        let mut notes = Vec::new();
        let mut tokens: Vec<Token<'s>> = keyed
            .iter()
            .map(|&(_, id, segment)| {
                if segment.is_malformed() {
                    let note = malformed_note(id, segment);
                    warn!(segment = %id, "{}", note);
                    notes.push(note);
                }
                let entry = lexicon.and_then(|lexicon| lexicon.get(id));
                Token::new(id, segment, entry, self.sets)
            })
            .collect();
        let keys: Vec<SegmentId> = keyed.iter().map(|(key, _, _)| *key).collect();
        rules::mark_article_prefixes(&mut tokens, &keys);

        let mut constructions = Vec::new();
        for i in 0..tokens.len() {
            let has_pronoun = match self.pronoun_construction(&tokens, i) {
                Some(construction) => {
                    constructions.push(construction);
                    true
                }
                None => false,
            };

            let token = &tokens[i];
            if !rules::is_candidate(token) {
                continue;
            }
            if !rules::is_light(token, self.sets) {
                trace!(segment = token.id, "not light");
                continue;
            }
            if !rules::lacks_article(token) {
                trace!(segment = token.id, "carries the article");
                continue;
            }
            if let Some(construction) = self.find_possessor(&tokens, i, has_pronoun) {
                constructions.push(construction);
            }
        }

        let result = DetectionResult::assemble(constructions, notes);
        info!(
            segments = tokens.len(),
            constructions = result.statistics.total,
            chains = result.chains.len(),
            "detection finished"
        );
        Ok(result)
    }

    fn pronoun_construction(&self, tokens: &[Token<'_>], i: usize) -> Option<Construction> {
        let token = &tokens[i];
        let split = rules::attached_pronoun(token, self.config.min_pronoun_stem)?;

        let construction = Construction::new(
            RoleTerm {
                id: token.id.to_string(),
                text: split.stem,
                position: i,
            },
            PossessorTerm {
                id: format!("{}{}", token.id, ATTACHED_PRONOUN_ID_SUFFIX),
                text: split.pronoun,
                position: i,
                kind: PossessorKind::AttachedPronoun,
            },
            AppliedRule::AttachedPronoun,
            context(tokens, i, i),
        );
        debug!(construction = %construction.id, "attached pronoun");
        Some(construction)
    }

    /// Bounded forward search for the second term of `tokens[i]`.
    ///
    /// With `case_evidence_only` set (the word already ends in an attached
    /// pronoun) only a case-marked genitive is accepted.
    fn find_possessor(
        &self,
        tokens: &[Token<'_>],
        i: usize,
        case_evidence_only: bool,
    ) -> Option<Construction> {
        let window_end = (i + 1 + self.config.search_window).min(tokens.len());

        for j in (i + 1)..window_end {
            let candidate = &tokens[j];
            match rules::examine(candidate, j == i + 1, self.sets) {
                Verdict::Accept(rule) if case_evidence_only && !rule.is_case_evidence() => {
                    trace!(segment = tokens[i].id, at = candidate.id, ?rule, "no case evidence");
                    return None;
                }
                Verdict::Accept(rule) => {
                    let construction = Construction::new(
                        RoleTerm {
                            id: tokens[i].id.to_string(),
                            text: tokens[i].text().to_string(),
                            position: i,
                        },
                        PossessorTerm {
                            id: candidate.id.to_string(),
                            text: candidate.text().to_string(),
                            position: j,
                            kind: candidate.possessor_kind(),
                        },
                        rule,
                        context(tokens, i, j),
                    );
                    debug!(
                        construction = %construction.id,
                        rule = ?rule,
                        certainty = ?construction.certainty,
                        "accepted possessor"
                    );
                    return Some(construction);
                }
                Verdict::Skip => continue,
                Verdict::Stop(reason) => {
                    trace!(segment = tokens[i].id, at = candidate.id, ?reason, "search stopped");
                    return None;
                }
            }
        }

        None
    }
}

fn context(tokens: &[Token<'_>], first: usize, last: usize) -> ConstructionContext {
    ConstructionContext {
        preceding_word: first
            .checked_sub(1)
            .map(|index| tokens[index].text().to_string()),
        following_word: tokens.get(last + 1).map(|token| token.text().to_string()),
    }
}

fn malformed_note(id: &str, segment: &Segment) -> String {
    match (segment.text.trim().is_empty(), segment.morphology.is_none()) {
        (true, true) => format!("segment {id}: missing text and morphology, treated as noun"),
        (true, false) => format!("segment {id}: missing text"),
        _ => format!("segment {id}: missing morphology, treated as noun"),
    }
}

/// Detect with the default configuration.
pub fn detect(
    segments: &HashMap<String, Segment>,
    lexicon: Option<&Lexicon>,
) -> Result<DetectionResult, DetectError> {
    IdafaDetector::default().detect(segments, lexicon)
}
