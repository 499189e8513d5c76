//! Speech-to-text medical term normalization.
//!
//! Upstream transcribers reliably garble drug names ("metfonnin",
//! "lysinopril"). Before scanning, each word is checked against the
//! medical dictionary and corrected when there is a single close match
//! (edit distance <= 2, word length >= 5). Short words and ambiguous
//! matches are left alone.

use std::sync::LazyLock;

use crate::lexicon::medications::MEDICATION_NAMES;

/// Clinical terms beyond drug names the transcriber commonly mangles.
static CLINICAL_TERMS: &[&str] = &[
    "anaphylaxis", "appendicitis", "arrhythmia", "bradycardia", "cyanosis",
    "diaphoresis", "diaphoretic", "diverticulitis", "dyspnea", "hematemesis",
    "hemoptysis", "hypertension", "hypotension", "melena", "meningitis",
    "pancreatitis", "photophobia", "pneumonia", "sepsis", "syncope",
    "tachycardia", "troponin",
];

/// Combined correction dictionary, sorted lowercase.
static DICTIONARY: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut terms: Vec<&'static str> = MEDICATION_NAMES
        .iter()
        .chain(CLINICAL_TERMS.iter())
        .copied()
        .collect();
    terms.sort_unstable();
    terms.dedup();
    terms
});

const MIN_WORD_LEN: usize = 5;
const MAX_EDIT_DISTANCE: u32 = 2;

/// Correct garbled medical terms in transcript text, preserving all
/// punctuation, spacing, and the original capitalization pattern.
pub fn correct_medical_terms(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();

    for ch in text.chars() {
        if ch.is_alphabetic() {
            word.push(ch);
        } else {
            flush_word(&mut out, &mut word);
            out.push(ch);
        }
    }
    flush_word(&mut out, &mut word);

    out
}

fn flush_word(out: &mut String, word: &mut String) {
    if !word.is_empty() {
        out.push_str(&correct_word(word));
        word.clear();
    }
}

fn correct_word(word: &str) -> String {
    if word.chars().count() < MIN_WORD_LEN {
        return word.to_string();
    }

    let lower = word.to_lowercase();
    if DICTIONARY.binary_search(&lower.as_str()).is_ok() {
        return word.to_string();
    }

    match closest_term(&lower) {
        Some(term) => apply_case(word, term),
        None => word.to_string(),
    }
}

/// The unique dictionary term within MAX_EDIT_DISTANCE, if any.
fn closest_term(lower: &str) -> Option<&'static str> {
    let mut best: Option<&'static str> = None;
    let mut best_distance = MAX_EDIT_DISTANCE + 1;
    let mut ambiguous = false;

    for &term in DICTIONARY.iter() {
        let len_gap = lower.len().abs_diff(term.len());
        if len_gap > MAX_EDIT_DISTANCE as usize {
            continue;
        }

        let distance = edit_distance(lower, term);
        if distance < best_distance {
            best_distance = distance;
            best = Some(term);
            ambiguous = false;
        } else if distance == best_distance {
            ambiguous = true;
        }
    }

    if ambiguous {
        None
    } else {
        best
    }
}

/// Reapply the original word's capitalization shape to the correction.
fn apply_case(original: &str, correction: &str) -> String {
    if original.chars().all(char::is_uppercase) {
        return correction.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = correction.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    correction.to_string()
}

/// Levenshtein distance, two-row formulation.
fn edit_distance(a: &str, b: &str) -> u32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len() as u32;
    }
    if b.is_empty() {
        return a.len() as u32;
    }

    let mut prev: Vec<u32> = (0..=b.len() as u32).collect();
    let mut curr = vec![0u32; b.len() + 1];

    for (i, &a_ch) in a.iter().enumerate() {
        curr[0] = i as u32 + 1;
        for (j, &b_ch) in b.iter().enumerate() {
            let substitution = prev[j] + u32::from(a_ch != b_ch);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrects_transcribed_drug_names() {
        assert_eq!(correct_medical_terms("metfonnin"), "metformin");
        assert_eq!(correct_medical_terms("lisinoprill"), "lisinopril");
        assert_eq!(correct_medical_terms("warfarine"), "warfarin");
    }

    #[test]
    fn corrects_clinical_terms() {
        assert_eq!(correct_medical_terms("diaphoretik"), "diaphoretic");
        assert_eq!(correct_medical_terms("apendicitis"), "appendicitis");
    }

    #[test]
    fn exact_terms_untouched() {
        assert_eq!(correct_medical_terms("metformin"), "metformin");
        assert_eq!(correct_medical_terms("troponin"), "troponin");
    }

    #[test]
    fn short_words_never_corrected() {
        assert_eq!(correct_medical_terms("mg po"), "mg po");
        assert_eq!(correct_medical_terms("the dose"), "the dose");
    }

    #[test]
    fn ordinary_words_untouched() {
        assert_eq!(correct_medical_terms("patient morning hospital"), "patient morning hospital");
    }

    #[test]
    fn case_shape_preserved() {
        assert_eq!(correct_medical_terms("Metfonnin"), "Metformin");
        assert_eq!(correct_medical_terms("METFONNIN"), "METFORMIN");
    }

    #[test]
    fn punctuation_and_numbers_preserved() {
        let corrected = correct_medical_terms("takes metfonnin 500mg, twice daily.");
        assert_eq!(corrected, "takes metformin 500mg, twice daily.");
    }

    #[test]
    fn dictionary_is_sorted_unique() {
        for window in DICTIONARY.windows(2) {
            assert!(window[0] < window[1]);
        }
    }

    #[test]
    fn edit_distance_symmetric_cases() {
        assert_eq!(edit_distance("abc", "abc"), 0);
        assert_eq!(edit_distance("", "abcd"), 4);
        assert_eq!(edit_distance("metformin", "metfonnin"), 2);
    }
}
