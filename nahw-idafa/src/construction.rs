use std::collections::HashSet;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::chains::find_chains;

/// Confidence tier tied to the rule that accepted the possessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Certainty {
    Definite,
    Probable,
    Inferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PossessorKind {
    Noun,
    Pronoun,
    AttachedPronoun,
}

impl PossessorKind {
    pub fn is_pronoun(&self) -> bool {
        !matches!(self, PossessorKind::Noun)
    }
}

/// Evidence that accepted the second term, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedRule {
    GenitiveCaseTag,
    KasraDiacritic,
    LexiconGenitive,
    DiptoteFatha,
    IndeclinableNoun,
    PronounPossessor,
    ContextualFallback,
    AttachedPronoun,
}

impl AppliedRule {
    pub fn certainty(&self) -> Certainty {
        match self {
            AppliedRule::GenitiveCaseTag
            | AppliedRule::KasraDiacritic
            | AppliedRule::LexiconGenitive
            | AppliedRule::PronounPossessor
            | AppliedRule::AttachedPronoun => Certainty::Definite,
            AppliedRule::DiptoteFatha => Certainty::Probable,
            AppliedRule::IndeclinableNoun | AppliedRule::ContextualFallback => Certainty::Inferred,
        }
    }

    /// Accepted on a case marking of the second term itself.
    pub fn is_case_evidence(&self) -> bool {
        matches!(
            self,
            AppliedRule::GenitiveCaseTag | AppliedRule::KasraDiacritic | AppliedRule::LexiconGenitive
        )
    }
}

/// First term (mudaf).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTerm {
    pub id: String,
    pub text: String,
    pub position: usize,
}

/// Second term (mudaf ilayh).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossessorTerm {
    pub id: String,
    pub text: String,
    pub position: usize,
    pub kind: PossessorKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preceding_word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following_word: Option<String>,
}

/// Suffix appended to a host segment id to address its attached pronoun.
pub const ATTACHED_PRONOUN_ID_SUFFIX: &str = ":pron";

/// A detected idafa construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Construction {
    pub id: String,
    pub role_a: RoleTerm,
    pub role_b: PossessorTerm,
    #[serde(default)]
    pub is_chain: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_level: Option<usize>,
    pub certainty: Certainty,
    pub applied_rule: AppliedRule,
    #[serde(default)]
    pub context: ConstructionContext,
}

impl Construction {
    pub fn new(
        role_a: RoleTerm,
        role_b: PossessorTerm,
        applied_rule: AppliedRule,
        context: ConstructionContext,
    ) -> Self {
        Self {
            id: format!("{}>{}", role_a.id, role_b.id),
            role_a,
            role_b,
            is_chain: false,
            chain_level: None,
            certainty: applied_rule.certainty(),
            applied_rule,
            context,
        }
    }

    /// Segment ids a reader would select to mark this construction.
    ///
    /// An attached pronoun lives inside its host word, so it maps back to the
    /// host segment.
    pub fn word_ids(&self) -> HashSet<String> {
        let role_b = self
            .role_b
            .id
            .strip_suffix(ATTACHED_PRONOUN_ID_SUFFIX)
            .unwrap_or(&self.role_b.id);
        [self.role_a.id.clone(), role_b.to_string()]
            .into_iter()
            .collect()
    }
}

/// Counts derived from a construction list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: usize,
    pub definite: usize,
    pub probable: usize,
    pub inferred: usize,
    pub with_chains: usize,
    pub with_pronouns: usize,
}

impl Statistics {
    pub fn from_constructions(constructions: &[Construction]) -> Self {
        constructions.iter().fold(Self::default(), |mut stats, c| {
            stats.total += 1;
            match c.certainty {
                Certainty::Definite => stats.definite += 1,
                Certainty::Probable => stats.probable += 1,
                Certainty::Inferred => stats.inferred += 1,
            }
            if c.is_chain {
                stats.with_chains += 1;
            }
            if c.role_b.kind.is_pronoun() {
                stats.with_pronouns += 1;
            }
            stats
        })
    }
}

impl Add for Statistics {
    type Output = Statistics;

    fn add(mut self, rhs: Statistics) -> Statistics {
        self += rhs;
        self
    }
}

impl AddAssign for Statistics {
    fn add_assign(&mut self, rhs: Statistics) {
        self.total += rhs.total;
        self.definite += rhs.definite;
        self.probable += rhs.probable;
        self.inferred += rhs.inferred;
        self.with_chains += rhs.with_chains;
        self.with_pronouns += rhs.with_pronouns;
    }
}

impl<'a> Sum<&'a Statistics> for Statistics {
    fn sum<I: Iterator<Item = &'a Statistics>>(iter: I) -> Self {
        iter.fold(Statistics::default(), |acc, stats| acc + *stats)
    }
}

/// Result of one detection call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub constructions: Vec<Construction>,
    /// Ordered construction-id sequences of length two or more.
    pub chains: Vec<Vec<String>>,
    pub statistics: Statistics,
    pub notes: Vec<String>,
}

impl DetectionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Link chains, mark their members and derive statistics.
    pub fn assemble(mut constructions: Vec<Construction>, notes: Vec<String>) -> Self {
        let chains = find_chains(&constructions);
        for chain in &chains {
            for (level, index) in chain.iter().enumerate() {
                let construction = &mut constructions[*index];
                construction.is_chain = true;
                construction.chain_level = Some(level + 1);
            }
        }

        let chains = chains
            .iter()
            .map(|chain| {
                chain
                    .iter()
                    .map(|index| constructions[*index].id.clone())
                    .collect()
            })
            .collect();
        let statistics = Statistics::from_constructions(&constructions);

        Self {
            constructions,
            chains,
            statistics,
            notes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.constructions.is_empty()
    }
}
