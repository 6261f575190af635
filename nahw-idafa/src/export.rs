//! JSON export of detection results.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::construction::{Construction, DetectionResult, Statistics};
use crate::corpus::CorpusResult;
use crate::error::ExportError;

pub const ALGORITHM: &str = "three-question-idafa";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub include_statistics: bool,
    pub include_chains: bool,
    pub prettify: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_statistics: true,
            include_chains: true,
            prettify: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub timestamp: String,
    pub algorithm: String,
    pub version: String,
    pub constructions: Vec<Construction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chains: Option<Vec<Vec<String>>>,
}

impl ExportDocument {
    pub fn new(result: &DetectionResult, options: &ExportOptions) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            algorithm: ALGORITHM.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            constructions: result.constructions.clone(),
            statistics: options.include_statistics.then_some(result.statistics),
            chains: options.include_chains.then(|| result.chains.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurahSummary {
    pub total_constructions: usize,
    pub statistics: Statistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusDocument {
    #[serde(flatten)]
    pub document: ExportDocument,
    pub elapsed_ms: u64,
    /// Keyed by surah number.
    pub surah_breakdown: BTreeMap<String, SurahSummary>,
}

pub fn to_json(result: &DetectionResult, options: &ExportOptions) -> Result<String, ExportError> {
    render(&ExportDocument::new(result, options), options.prettify)
}

/// Export a corpus run; constructions are concatenated in surah order.
pub fn corpus_to_json(corpus: &CorpusResult, options: &ExportOptions) -> Result<String, ExportError> {
    let combined = DetectionResult {
        constructions: corpus
            .surahs
            .values()
            .flat_map(|result| result.constructions.iter().cloned())
            .collect(),
        chains: corpus
            .surahs
            .values()
            .flat_map(|result| result.chains.iter().cloned())
            .collect(),
        statistics: corpus.global_statistics,
        notes: Vec::new(),
    };

    let surah_breakdown = corpus
        .surahs
        .iter()
        .map(|(surah, result)| {
            (
                surah.to_string(),
                SurahSummary {
                    total_constructions: result.constructions.len(),
                    statistics: result.statistics,
                },
            )
        })
        .collect();

    let document = CorpusDocument {
        document: ExportDocument::new(&combined, options),
        elapsed_ms: corpus.elapsed.as_millis() as u64,
        surah_breakdown,
    };
    render(&document, options.prettify)
}

pub fn from_json(json: &str) -> Result<ExportDocument, ExportError> {
    Ok(serde_json::from_str(json)?)
}

fn render<T: Serialize>(value: &T, prettify: bool) -> Result<String, ExportError> {
    let json = if prettify {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::process_corpus;
    use crate::detector::detect;
    use nahw_morph::{GrammaticalCase, MorphCategory, Segment};
    use std::collections::HashMap;

    fn result() -> DetectionResult {
        let segments: HashMap<String, Segment> = [
            Segment::new("1-1-1-1", "رَبِّ", MorphCategory::Noun),
            Segment::new("1-1-2-1", "ٱلْعَٰلَمِينَ", MorphCategory::Noun).with_case(GrammaticalCase::Genitive),
        ]
        .into_iter()
        .map(|segment| (segment.id.clone(), segment))
        .collect();
        detect(&segments, None).unwrap()
    }

    #[test]
    fn options_control_optional_sections() {
        let options = ExportOptions {
            include_statistics: false,
            include_chains: false,
            prettify: false,
        };
        let json = to_json(&result(), &options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("statistics").is_none());
        assert!(value.get("chains").is_none());
        assert_eq!(value["algorithm"], ALGORITHM);
        assert_eq!(value["constructions"][0]["role_b"]["kind"], "noun");
        assert_eq!(value["constructions"][0]["certainty"], "definite");
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let document = ExportDocument::new(&result(), &ExportOptions::default());
        assert!(chrono::DateTime::parse_from_rfc3339(&document.timestamp).is_ok());
    }

    #[test]
    fn corpus_export_has_breakdown() {
        let segments = vec![
            Segment::new("2-1-1-1", "رَبِّ", MorphCategory::Noun),
            Segment::new("2-1-2-1", "ٱلنَّاسِ", MorphCategory::Noun).with_case(GrammaticalCase::Genitive),
        ];
        let corpus = process_corpus(&segments).unwrap();
        let json = corpus_to_json(&corpus, &ExportOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["surah_breakdown"]["2"]["total_constructions"], 1);
        assert!(value["elapsed_ms"].is_u64());
        assert_eq!(value["statistics"]["total"], 1);
    }
}
