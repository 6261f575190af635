//! Quranic Orthography Helpers
//!
//! Diacritic-aware inspection of segment text:
//! - Bare-form normalization (diacritics, tatweel, alef variants)
//! - Tanwin, kasra and fatha detection on the final letter
//! - Definite-article detection
//! - Attached-pronoun suffix splitting

use crate::closed_sets::ATTACHED_PRONOUN_SUFFIXES;

/// Arabic text normalizer producing the bare form used for table lookups.
///
/// Taa marbuta, alef maqsura and hamza carriers are kept as written: they
/// distinguish nouns from pronoun suffixes (`ة` vs `ه`, `ى` vs `ي`).
#[derive(Debug, Clone)]
pub struct ArabicNormalizer {
    /// Remove diacritical marks (tashkeel and Quranic annotation marks)
    pub remove_diacritics: bool,
    /// Remove tatweel (kashida)
    pub remove_tatweel: bool,
    /// Normalize alef variants (including alef wasla) to bare alef
    pub normalize_alef: bool,
}

impl Default for ArabicNormalizer {
    fn default() -> Self {
        Self {
            remove_diacritics: true,
            remove_tatweel: true,
            normalize_alef: true,
        }
    }
}

impl ArabicNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize Arabic text.
    pub fn normalize(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());

        for ch in text.chars() {
            if self.remove_diacritics && is_diacritic(ch) {
                continue;
            }

            if self.remove_tatweel && ch == TATWEEL {
                continue;
            }

            if self.normalize_alef && is_alef_variant(ch) {
                result.push('\u{0627}');
                continue;
            }

            result.push(ch);
        }

        result
    }
}

const TATWEEL: char = '\u{0640}';
const FATHA: char = '\u{064E}';
const KASRA: char = '\u{0650}';

/// Definite article in bare form.
pub const DEFINITE_ARTICLE: &str = "ال";

/// Check if a character is a diacritical or Quranic annotation mark.
pub fn is_diacritic(ch: char) -> bool {
    matches!(ch,
        '\u{064B}'..='\u{065F}' | // Fathatan to wavy hamza below
        '\u{0670}' |              // Superscript alef
        '\u{06D6}'..='\u{06DC}' | // Small high ligatures (pause marks)
        '\u{06DF}'..='\u{06E4}' | // Small high marks
        '\u{06E7}'..='\u{06E8}' |
        '\u{06EA}'..='\u{06ED}' |
        '\u{08F0}'..='\u{08F2}'   // Open tanwin
    )
}

/// Check if a character is a tanwin (nunation) mark.
pub fn is_tanween(ch: char) -> bool {
    matches!(ch, '\u{064B}'..='\u{064D}' | '\u{08F0}'..='\u{08F2}')
}

fn is_alef_variant(ch: char) -> bool {
    matches!(ch,
        '\u{0622}' | // Alef with madda
        '\u{0623}' | // Alef with hamza above
        '\u{0625}' | // Alef with hamza below
        '\u{0671}'   // Alef wasla
    )
}

/// Bare form with the default normalizer.
pub fn bare(text: &str) -> String {
    ArabicNormalizer::default().normalize(text)
}

/// Marks attached to the last base letter of `text`.
fn final_marks(text: &str) -> Vec<char> {
    let mut marks: Vec<char> = text
        .chars()
        .rev()
        .take_while(|ch| is_diacritic(*ch) || *ch == TATWEEL)
        .filter(|ch| *ch != TATWEEL)
        .collect();
    marks.reverse();
    marks
}

pub fn has_tanween(text: &str) -> bool {
    text.chars().any(is_tanween)
}

/// Final letter carries kasra and the word carries no tanwin.
pub fn ends_with_kasra(text: &str) -> bool {
    !has_tanween(text) && final_marks(text).contains(&KASRA)
}

/// Final letter carries fatha and the word carries no tanwin.
pub fn ends_with_fatha(text: &str) -> bool {
    !has_tanween(text) && final_marks(text).contains(&FATHA)
}

/// Bare text begins with `ال` and is long enough to hold a stem after it.
///
/// Three-letter forms (`الم`, `الف`) are disjoint letters or roots, not the
/// article.
pub fn starts_with_definite_article(text: &str) -> bool {
    let bare = bare(text);
    bare.starts_with(DEFINITE_ARTICLE) && bare.chars().count() >= 4
}

/// Bare text is exactly the definite article.
pub fn is_definite_article_form(text: &str) -> bool {
    bare(text) == DEFINITE_ARTICLE
}

/// A word split into its stem and an attached pronoun, both in written form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PronounSplit {
    pub stem: String,
    pub pronoun: String,
}

/// Split a trailing attached pronoun off `text`.
///
/// The bare stem must keep at least `min_stem` letters. Diacritics stay with
/// the letter they follow, so `رَبُّهُمْ` splits into `رَبُّ` and `هُمْ`.
pub fn split_attached_pronoun(text: &str, min_stem: usize) -> Option<PronounSplit> {
    let bare = bare(text);
    let letters = bare.chars().count();

    let suffix = ATTACHED_PRONOUN_SUFFIXES.iter().find(|suffix| {
        bare.ends_with(*suffix) && letters - suffix.chars().count() >= min_stem.max(1)
    })?;
    let stem_letters = letters - suffix.chars().count();

    // Byte offset of the first letter after the stem.
    let mut seen = 0;
    let mut cut = text.len();
    for (offset, ch) in text.char_indices() {
        if is_diacritic(ch) || ch == TATWEEL {
            continue;
        }
        if seen == stem_letters {
            cut = offset;
            break;
        }
        seen += 1;
    }

    let (stem, pronoun) = text.split_at(cut);
    if stem.is_empty() || pronoun.is_empty() {
        return None;
    }
    Some(PronounSplit {
        stem: stem.to_string(),
        pronoun: pronoun.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_form() {
        assert_eq!(bare("كِتَابٌ"), "كتاب");
        assert_eq!(bare("ٱلْعَـٰلَمِينَ"), "العلمين");
        assert_eq!(bare("إِلَىٰ"), "الى");
    }

    #[test]
    fn test_keeps_taa_marbuta() {
        assert_eq!(bare("رَحْمَةُ"), "رحمة");
    }

    #[test]
    fn test_tanween() {
        assert!(has_tanween("كِتَابٌ"));
        assert!(has_tanween("طَالِبٍ"));
        assert!(!has_tanween("رَبِّ"));
    }

    #[test]
    fn test_final_vowel() {
        assert!(ends_with_kasra("رَبِّ"));
        assert!(!ends_with_kasra("طَالِبٍ"));
        assert!(ends_with_fatha("إِبْرَاهِيمَ"));
        assert!(!ends_with_fatha("رَبِّ"));
    }

    #[test]
    fn test_definite_article() {
        assert!(starts_with_definite_article("الْعَالَمِينَ"));
        assert!(starts_with_definite_article("ٱلْكِتَٰبِ"));
        assert!(!starts_with_definite_article("الٓمٓ"));
        assert!(!starts_with_definite_article("رَبِّ"));
        assert!(is_definite_article_form("ٱلْ"));
    }

    #[test]
    fn test_split_attached_pronoun() {
        let split = split_attached_pronoun("رَبُّهُمْ", 2).unwrap();
        assert_eq!(split.stem, "رَبُّ");
        assert_eq!(split.pronoun, "هُمْ");

        let split = split_attached_pronoun("كِتَابُهُ", 2).unwrap();
        assert_eq!(split.stem, "كِتَابُ");
        assert_eq!(split.pronoun, "هُ");
    }

    #[test]
    fn test_split_requires_stem() {
        assert!(split_attached_pronoun("هُمْ", 2).is_none());
        assert!(split_attached_pronoun("رَبِّ", 2).is_none());
    }
}
