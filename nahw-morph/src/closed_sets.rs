//! Closed-Set Particle and Pronoun Tables
//!
//! Every closed word class the rule engines consult lives here, keyed by bare
//! form. The tables are normalized and indexed once per process.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::orthography::bare;
use crate::segment::{GrammaticalRole, MorphCategory, Segment};

/// Closed word classes with independent syntactic function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleClass {
    Preposition,
    Accusative,
    Jussive,
    Negation,
    Modal,
    Vocative,
    Conditional,
    Interrogative,
    Conjunction,
    Emphasis,
    Exception,
    Result,
    IndependentPronoun,
    AttachedPronoun,
    Demonstrative,
    Relative,
}

impl ParticleClass {
    pub fn is_pronoun(&self) -> bool {
        matches!(
            self,
            ParticleClass::IndependentPronoun
                | ParticleClass::AttachedPronoun
                | ParticleClass::Demonstrative
                | ParticleClass::Relative
        )
    }
}

/// Purely morphological prefixes that fuse with the following stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphemeKind {
    DefiniteArticle,
    ImperfectPrefix,
    PrepositionPrefix,
}

// Free-standing prepositions
pub static PREPOSITIONS: &[&str] = &[
    "في", "من", "على", "إلى", "عن", "مع", "حتى", "منذ", "مذ", "لدى", "لدن",
];
pub static ACCUSATIVE_PARTICLES: &[&str] = &["إن", "أن", "كأن", "لكن", "ليت", "لعل", "كي"];
pub static JUSSIVE_PARTICLES: &[&str] = &["لم", "لما"];
pub static NEGATION_PARTICLES: &[&str] = &["ما", "لا", "لن", "ليس", "لات"];
pub static MODAL_PARTICLES: &[&str] = &["قد", "لقد", "سوف", "س"];
pub static VOCATIVE_PARTICLES: &[&str] = &["يا", "أيها", "أيتها"];
pub static CONDITIONAL_PARTICLES: &[&str] = &["إذا", "إذ", "لو", "لولا", "لوما", "أما", "مهما", "أينما", "كلما"];
pub static INTERROGATIVE_PARTICLES: &[&str] = &["أ", "هل", "كيف", "أين", "متى", "أنى", "أيان", "كم", "ماذا"];
pub static CONJUNCTIONS: &[&str] = &["و", "ف", "ثم", "أو", "أم", "بل"];
pub static EMPHASIS_PARTICLES: &[&str] = &["إنما", "ألا", "أما", "كلا"];
pub static EXCEPTION_PARTICLES: &[&str] = &["إلا", "سوى", "عدا", "خلا", "حاشا"];
pub static RESULT_PARTICLES: &[&str] = &["إذن", "إذا"];
pub static INDEPENDENT_PRONOUNS: &[&str] = &[
    "هو", "هي", "هما", "هم", "هن", "أنت", "أنتما", "أنتم", "أنتن", "أنا", "نحن", "إيا",
];
pub static ATTACHED_PRONOUNS: &[&str] = &[
    "ه", "ها", "هما", "هم", "هن", "ك", "كما", "كم", "كن", "ي", "نا", "ني",
];
/// Attached pronouns as they end a fused word, longest first.
pub static ATTACHED_PRONOUN_SUFFIXES: &[&str] = &[
    "هما", "كما", "هم", "هن", "كم", "كن", "نا", "ها", "ه", "ك", "ي",
];
pub static DEMONSTRATIVES: &[&str] = &[
    "هذا", "هذه", "هذان", "هاتان", "هؤلاء", "ذلك", "تلك", "ذلكم", "أولئك", "هنالك", "ذا",
];
pub static RELATIVE_PRONOUNS: &[&str] = &[
    "الذي", "التي", "الذين", "اللذان", "اللتان", "اللاتي", "اللائي", "اللذين",
];

/// Nouns that habitually stand as the first term of a construction.
pub static LIGHT_WORDS: &[&str] = &[
    "كل", "بعض", "غير", "عند", "ذو", "ذي", "ذا", "ذات", "أولو", "أولي", "مثل", "بين",
    "يوم", "عبد", "عباد", "أهل", "أصحاب", "سبيل", "لدى", "قبل", "بعد", "فوق", "تحت",
];

/// Particles that may sit between the two terms without breaking annexation.
pub static BOUNDARY_SAFE_PARTICLES: &[&str] = &["ما", "لا"];

static IMPERFECT_PREFIXES: &[&str] = &["ي", "ت", "ن", "أ"];
static PREFIX_PREPOSITIONS: &[&str] = &["ب", "ل", "ك"];

/// Indexed closed sets.
#[derive(Debug, Clone)]
pub struct ClosedSets {
    particles: HashMap<String, ParticleClass>,
    attached_pronouns: HashSet<String>,
    pronoun_nominals: HashMap<String, ParticleClass>,
    light_words: HashSet<String>,
    boundary_safe: HashSet<String>,
    imperfect_prefixes: HashSet<String>,
    prefix_prepositions: HashSet<String>,
}

impl ClosedSets {
    /// Build the tables. The first class listed for an ambiguous form wins.
    pub fn build() -> Self {
        let groups: &[(ParticleClass, &[&str])] = &[
            (ParticleClass::IndependentPronoun, INDEPENDENT_PRONOUNS),
            (ParticleClass::Demonstrative, DEMONSTRATIVES),
            (ParticleClass::Relative, RELATIVE_PRONOUNS),
            (ParticleClass::Preposition, PREPOSITIONS),
            (ParticleClass::Exception, EXCEPTION_PARTICLES),
            (ParticleClass::Emphasis, EMPHASIS_PARTICLES),
            (ParticleClass::Accusative, ACCUSATIVE_PARTICLES),
            (ParticleClass::Jussive, JUSSIVE_PARTICLES),
            (ParticleClass::Negation, NEGATION_PARTICLES),
            (ParticleClass::Modal, MODAL_PARTICLES),
            (ParticleClass::Vocative, VOCATIVE_PARTICLES),
            (ParticleClass::Conditional, CONDITIONAL_PARTICLES),
            (ParticleClass::Interrogative, INTERROGATIVE_PARTICLES),
            (ParticleClass::Conjunction, CONJUNCTIONS),
            (ParticleClass::Result, RESULT_PARTICLES),
        ];

        let mut particles = HashMap::new();
        let mut pronoun_nominals = HashMap::new();
        for (class, words) in groups {
            for word in words.iter() {
                particles.entry(bare(word)).or_insert(*class);
                if class.is_pronoun() {
                    pronoun_nominals.entry(bare(word)).or_insert(*class);
                }
            }
        }

        Self {
            particles,
            attached_pronouns: normalized(ATTACHED_PRONOUNS),
            pronoun_nominals,
            light_words: normalized(LIGHT_WORDS),
            boundary_safe: normalized(BOUNDARY_SAFE_PARTICLES),
            imperfect_prefixes: normalized(IMPERFECT_PREFIXES),
            prefix_prepositions: normalized(PREFIX_PREPOSITIONS),
        }
    }

    /// Process-wide tables.
    pub fn standard() -> &'static ClosedSets {
        static TABLES: OnceLock<ClosedSets> = OnceLock::new();
        TABLES.get_or_init(ClosedSets::build)
    }

    /// Closed class of a segment, if it has independent syntactic function.
    ///
    /// Suffix segments are only ever attached pronouns. Nouns are checked
    /// against the pronoun classes only (upstream tags demonstratives and
    /// relatives as nominals). Particles are checked against every class.
    pub fn classify(&self, segment: &Segment) -> Option<ParticleClass> {
        let form = bare(&segment.text);
        if form.is_empty() {
            return None;
        }

        if segment.is_suffix() {
            return self
                .attached_pronouns
                .contains(&form)
                .then_some(ParticleClass::AttachedPronoun);
        }

        match segment.features.grammatical_role {
            Some(GrammaticalRole::AttachedPronoun) => return Some(ParticleClass::AttachedPronoun),
            Some(GrammaticalRole::Pronoun) => {
                return Some(
                    self.pronoun_nominals
                        .get(&form)
                        .copied()
                        .unwrap_or(ParticleClass::IndependentPronoun),
                )
            }
            _ => {}
        }

        match segment.morphology {
            Some(MorphCategory::Particle) | None => self.particles.get(&form).copied(),
            Some(MorphCategory::Noun) | Some(MorphCategory::Adjective) => {
                self.pronoun_nominals.get(&form).copied()
            }
            Some(MorphCategory::Verb) => None,
        }
    }

    pub fn is_light_word(&self, text: &str) -> bool {
        self.light_words.contains(&bare(text))
    }

    pub fn is_boundary_safe(&self, text: &str) -> bool {
        self.boundary_safe.contains(&bare(text))
    }

    pub fn is_attached_pronoun(&self, text: &str) -> bool {
        self.attached_pronouns.contains(&bare(text))
    }

    pub fn is_imperfect_prefix(&self, text: &str) -> bool {
        self.imperfect_prefixes.contains(&bare(text))
    }

    pub fn is_prefix_preposition(&self, text: &str) -> bool {
        self.prefix_prepositions.contains(&bare(text))
    }

    /// Number of indexed particle forms.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

fn normalized(words: &[&str]) -> HashSet<String> {
    words.iter().map(|word| bare(word)).collect()
}
