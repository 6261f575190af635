//! Idafa (genitive construction) detection over tagged segments.

mod chains;
pub mod config;
pub mod construction;
pub mod corpus;
pub mod detector;
pub mod error;
pub mod export;
mod rules;
pub mod scoring;

pub use chains::find_chains;
pub use config::{DetectorConfig, CONFIG_ENV};
pub use construction::{
    AppliedRule, Certainty, Construction, ConstructionContext, DetectionResult, PossessorKind,
    PossessorTerm, RoleTerm, Statistics, ATTACHED_PRONOUN_ID_SUFFIX,
};
pub use corpus::{process_corpus, CorpusProcessor, CorpusResult, CorpusSegment};
pub use detector::{detect, IdafaDetector};
pub use error::{ConfigError, DetectError, ExportError};
pub use export::{corpus_to_json, from_json, to_json, ExportDocument, ExportOptions};
pub use scoring::{answer_sets, jaccard, score, AnswerScore};
