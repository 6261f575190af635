//! End-to-end detection tests over the upstream JSON schema.
//!
//! Tests cover:
//! - The reference scenarios (annexation, attached pronoun, tanwin, chains, empty input)
//! - Definite-article exclusion
//! - Detector state isolation
//! - Corpus additivity
//! - Export round-trip
//! - Answer scoring against detector output

use std::collections::{HashMap, HashSet};

use nahw_idafa::{
    answer_sets, corpus_to_json, detect, from_json, process_corpus, score, to_json,
    AppliedRule, Certainty, DetectionResult, DetectorConfig, ExportOptions, IdafaDetector,
    PossessorKind, Statistics,
};
use nahw_morph::{GrammaticalCase, MorphCategory, NounPattern, Segment};

fn segments(json: &str) -> HashMap<String, Segment> {
    let list: Vec<Segment> = serde_json::from_str(json).unwrap();
    list.into_iter()
        .map(|segment| (segment.id.clone(), segment))
        .collect()
}

fn run(json: &str) -> DetectionResult {
    detect(&segments(json), None).unwrap()
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_scenario_lord_of_the_worlds() {
    let result = run(r#"[
        {"id": "1-2-3-1", "text": "رَبِّ", "morphology": "noun", "case": "genitive", "pattern": "partly_flexible"},
        {"id": "1-2-4-1", "text": "الْعَالَمِينَ", "morphology": "noun", "case": "genitive"}
    ]"#);

    assert_eq!(result.constructions.len(), 1);
    let construction = &result.constructions[0];
    assert_eq!(construction.role_a.text, "رَبِّ");
    assert_eq!(construction.role_b.text, "الْعَالَمِينَ");
    assert_eq!(construction.certainty, Certainty::Definite);
    assert_eq!(construction.id, "1-2-3-1>1-2-4-1");
}

#[test]
fn test_scenario_attached_pronoun() {
    let result = run(r#"[{"id": "2-5-1-1", "text": "رَبُّهُمْ"}]"#);

    assert_eq!(result.constructions.len(), 1);
    let construction = &result.constructions[0];
    assert_eq!(construction.role_b.kind, PossessorKind::AttachedPronoun);
    assert_eq!(construction.certainty, Certainty::Definite);
    assert_eq!(construction.applied_rule, AppliedRule::AttachedPronoun);
    assert_eq!(construction.role_a.text, "رَبُّ");
    assert_eq!(construction.role_b.text, "هُمْ");
    assert_eq!(construction.role_b.id, "2-5-1-1:pron");
    assert_eq!(result.statistics.with_pronouns, 1);
}

#[test]
fn test_scenario_tanwin_blocks_annexation() {
    let result = run(r#"[
        {"id": "3-1-1-1", "text": "كِتَابٌ", "morphology": "noun"},
        {"id": "3-1-2-1", "text": "طَالِبٍ", "morphology": "noun", "case": "genitive"}
    ]"#);

    assert!(result.constructions.is_empty());
    assert_eq!(result.statistics.total, 0);
}

#[test]
fn test_scenario_three_noun_chain() {
    let result = run(r#"[
        {"id": "4-1-1-1", "text": "كِتَابِ", "morphology": "noun", "case": "genitive"},
        {"id": "4-1-2-1", "text": "رَبِّ", "morphology": "noun", "case": "genitive"},
        {"id": "4-1-3-1", "text": "ٱلْعَٰلَمِينَ", "morphology": "noun", "case": "genitive"}
    ]"#);

    assert!(result.constructions.len() >= 2);
    assert!(!result.chains.is_empty());
    assert!(result.chains.iter().any(|chain| chain.len() >= 2));
    assert_eq!(result.chains[0], vec!["4-1-1-1>4-1-2-1", "4-1-2-1>4-1-3-1"]);
    assert!(result.constructions.iter().all(|c| c.is_chain));
    assert_eq!(result.constructions[1].chain_level, Some(2));
    assert_eq!(result.statistics.with_chains, 2);
}

#[test]
fn test_scenario_empty_input() {
    let result = detect(&HashMap::new(), None).unwrap();

    assert!(result.constructions.is_empty());
    assert_eq!(result.statistics.total, 0);
    assert_eq!(result.statistics.definite, 0);
    assert!(result.chains.is_empty());
}

// ============================================================================
// Rule properties
// ============================================================================

#[test]
fn test_article_excludes_untagged_second_term() {
    // Adjectival reading: the article marks a new definite phrase.
    let result = run(r#"[
        {"id": "5-1-1-1", "text": "بَيْتِ", "morphology": "noun"},
        {"id": "5-1-2-1", "text": "ٱلْكَبِيرِ", "morphology": "adjective"}
    ]"#);

    assert!(result.constructions.is_empty());
}

#[test]
fn test_article_never_heads_a_construction() {
    let result = run(r#"[
        {"id": "5-2-1-1", "text": "ٱلْبَيْتِ", "morphology": "noun", "case": "genitive"},
        {"id": "5-2-2-1", "text": "رَجُلِ", "morphology": "noun", "case": "genitive"}
    ]"#);

    assert!(result.constructions.iter().all(|c| c.role_a.id != "5-2-1-1"));
}

#[test]
fn test_pronoun_particle_as_second_term() {
    let result = run(r#"[
        {"id": "6-1-1-1", "text": "عِندَ", "morphology": "noun"},
        {"id": "6-1-1-2", "text": "هُ", "morphology": "noun", "type": "suffix"}
    ]"#);

    assert_eq!(result.constructions.len(), 1);
    assert_eq!(result.constructions[0].role_b.kind, PossessorKind::AttachedPronoun);
}

#[test]
fn test_certainty_tiers_follow_rules() {
    let result = run(r#"[
        {"id": "7-1-1-1", "text": "مِلَّةَ", "morphology": "noun"},
        {"id": "7-1-2-1", "text": "إِبْرَٰهِيمَ", "morphology": "noun", "pattern": "partly_flexible"}
    ]"#);

    assert_eq!(result.constructions.len(), 1);
    assert_eq!(result.constructions[0].certainty, Certainty::Probable);
    assert_eq!(result.statistics.probable, 1);
}

// ============================================================================
// Detector and corpus properties
// ============================================================================

#[test]
fn test_detector_is_stateless_between_calls() {
    let detector = IdafaDetector::new(DetectorConfig::default());
    let first = segments(r#"[
        {"id": "1-2-3-1", "text": "رَبِّ", "morphology": "noun"},
        {"id": "1-2-4-1", "text": "ٱلْعَٰلَمِينَ", "morphology": "noun", "case": "genitive"}
    ]"#);

    let before = detector.detect(&first, None).unwrap();
    let empty = detector.detect(&HashMap::new(), None).unwrap();
    let after = detector.detect(&first, None).unwrap();

    assert!(empty.constructions.is_empty());
    assert_eq!(before.constructions, after.constructions);
    assert_eq!(before.statistics, after.statistics);
}

#[test]
fn test_corpus_statistics_are_additive() {
    let corpus: Vec<Segment> = vec![
        Segment::new("1-2-3-1", "رَبِّ", MorphCategory::Noun),
        Segment::new("1-2-4-1", "ٱلْعَٰلَمِينَ", MorphCategory::Noun).with_case(GrammaticalCase::Genitive),
        Segment::new("2-5-1-1", "رَبُّهُمْ", MorphCategory::Noun),
        Segment::new("2-6-1-1", "يَوْمَ", MorphCategory::Noun),
        Segment::new("2-6-2-1", "ٱلدِّينِ", MorphCategory::Noun).with_case(GrammaticalCase::Genitive),
        Segment::new("3-95-1-1", "مِلَّةَ", MorphCategory::Noun),
        Segment::new("3-95-2-1", "إِبْرَٰهِيمَ", MorphCategory::Noun).with_pattern(NounPattern::PartlyFlexible),
        Segment::new("4-1-1-1", "مِثْلَ", MorphCategory::Noun),
        Segment::new("4-1-2-1", "قَوْمُ", MorphCategory::Noun),
    ];

    let result = process_corpus(&corpus).unwrap();

    let summed: Statistics = result.surahs.values().map(|r| &r.statistics).sum();
    assert_eq!(result.global_statistics, summed);
    assert_eq!(
        result.global_statistics,
        Statistics {
            total: 5,
            definite: 3,
            probable: 1,
            inferred: 1,
            with_chains: 0,
            with_pronouns: 1,
        }
    );
    assert_eq!(result.total_constructions, 5);
    assert_eq!(result.surah(2).unwrap().constructions.len(), 2);
    assert_eq!(result.surah(3).unwrap().statistics.probable, 1);
    assert_eq!(
        result.surah(4).unwrap().constructions[0].applied_rule,
        AppliedRule::ContextualFallback
    );
}

#[test]
fn test_export_round_trip_preserves_terms() {
    let result = run(r#"[
        {"id": "4-1-1-1", "text": "كِتَابِ", "morphology": "noun", "case": "genitive"},
        {"id": "4-1-2-1", "text": "رَبِّ", "morphology": "noun", "case": "genitive"},
        {"id": "4-1-3-1", "text": "ٱلْعَٰلَمِينَ", "morphology": "noun", "case": "genitive"}
    ]"#);

    let options = ExportOptions {
        prettify: true,
        ..Default::default()
    };
    let json = to_json(&result, &options).unwrap();
    let document = from_json(&json).unwrap();

    assert_eq!(document.constructions.len(), result.constructions.len());
    for (exported, original) in document.constructions.iter().zip(&result.constructions) {
        assert_eq!(exported.role_a.text, original.role_a.text);
        assert_eq!(exported.role_b.text, original.role_b.text);
        assert_eq!(exported.certainty, original.certainty);
    }
    assert_eq!(document.chains.as_ref(), Some(&result.chains));
    assert_eq!(document.statistics, Some(result.statistics));
}

#[test]
fn test_corpus_export_parses_as_document() {
    let corpus = vec![
        Segment::new("1-2-3-1", "رَبِّ", MorphCategory::Noun),
        Segment::new("1-2-4-1", "ٱلْعَٰلَمِينَ", MorphCategory::Noun).with_case(GrammaticalCase::Genitive),
    ];
    let result = process_corpus(&corpus).unwrap();
    let json = corpus_to_json(&result, &ExportOptions::default()).unwrap();
    let document = from_json(&json).unwrap();
    assert_eq!(document.constructions.len(), 1);
}

// ============================================================================
// Scoring
// ============================================================================

#[test]
fn test_scoring_against_detected_answers() {
    let result = run(r#"[
        {"id": "1-2-3-1", "text": "رَبِّ", "morphology": "noun"},
        {"id": "1-2-4-1", "text": "ٱلْعَٰلَمِينَ", "morphology": "noun", "case": "genitive"},
        {"id": "1-3-1-1", "text": "رَبُّهُمْ", "morphology": "noun"}
    ]"#);
    let answers = answer_sets(&result);
    assert_eq!(answers.len(), 2);

    let exact: HashSet<String> = ["1-2-3-1", "1-2-4-1"].iter().map(|s| s.to_string()).collect();
    assert!(score(&answers, &exact).is_correct);

    let host: HashSet<String> = ["1-3-1-1".to_string()].into_iter().collect();
    assert_eq!(score(&answers, &host).score, 100);

    let half: HashSet<String> = ["1-2-3-1".to_string()].into_iter().collect();
    let half_score = score(&answers, &half);
    assert!(half_score.is_partial);
    assert_eq!(half_score.score, 50);
}
