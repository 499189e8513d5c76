//! Negation scope resolution.
//!
//! A keyword occurrence is negated when any negation cue appears in the
//! window of preceding words. Evaluation is per occurrence; the
//! keyword-level verdict used by the batch helpers takes the last
//! occurrence in the text, so "chest pain earlier, no chest pain now"
//! reads as denied.

use crate::config::DEFAULT_NEGATION_WINDOW;
use crate::lexicon::Lexicon;

/// One case-insensitive occurrence of a keyword with its negation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Byte offset of the occurrence in the scanned text.
    pub offset: usize,
    pub negated: bool,
}

/// Window-based negation resolver. Cheap to construct; holds no state
/// beyond the window size.
#[derive(Debug, Clone, Copy)]
pub struct NegationResolver {
    window_words: usize,
}

impl Default for NegationResolver {
    fn default() -> Self {
        Self {
            window_words: DEFAULT_NEGATION_WINDOW,
        }
    }
}

impl NegationResolver {
    pub fn new(window_words: usize) -> Self {
        Self { window_words }
    }

    /// Every occurrence of `keyword` in `text` with its per-occurrence
    /// negation state. Word-boundary matched, case-insensitive.
    pub fn occurrences(&self, keyword: &str, text: &str) -> Vec<Occurrence> {
        let lower_text = text.to_lowercase();
        let lower_keyword = keyword.to_lowercase();
        if lower_keyword.is_empty() {
            return Vec::new();
        }

        let mut found = Vec::new();
        for (offset, matched) in lower_text.match_indices(&lower_keyword) {
            if !on_word_boundary(&lower_text, offset, matched.len()) {
                continue;
            }
            found.push(Occurrence {
                offset,
                negated: self.window_is_negated(&lower_text[..offset]),
            });
        }
        found
    }

    /// Keyword-level verdict: negated iff the last occurrence is negated.
    /// Absent keyword is not negated.
    pub fn is_negated(&self, keyword: &str, text: &str) -> bool {
        self.occurrences(keyword, text)
            .last()
            .map(|occ| occ.negated)
            .unwrap_or(false)
    }

    /// Combined presence + negation check: `(found, negated)`.
    /// Absent keyword returns `(false, false)`.
    pub fn extract_with_negation(&self, keyword: &str, text: &str) -> (bool, bool) {
        let occurrences = self.occurrences(keyword, text);
        match occurrences.last() {
            Some(occ) => (true, occ.negated),
            None => (false, false),
        }
    }

    /// Whether a specific occurrence (by byte offset) is negated.
    pub fn occurrence_is_negated(&self, text: &str, offset: usize) -> bool {
        let lower = text.to_lowercase();
        let mut end = offset.min(lower.len());
        while end > 0 && !lower.is_char_boundary(end) {
            end -= 1;
        }
        self.window_is_negated(&lower[..end])
    }

    /// Keep only keywords that appear and are not denied.
    pub fn filter_non_negated<'a>(&self, keywords: &[&'a str], text: &str) -> Vec<&'a str> {
        keywords
            .iter()
            .copied()
            .filter(|kw| {
                let (found, negated) = self.extract_with_negation(kw, text);
                found && !negated
            })
            .collect()
    }

    /// Review-of-systems paragraph: affirmed keywords first, denied after.
    /// Keywords absent from the text are skipped entirely.
    pub fn ros_documentation(&self, keywords: &[&str], text: &str) -> String {
        let mut reported = Vec::new();
        let mut denied = Vec::new();

        for &kw in keywords {
            match self.extract_with_negation(kw, text) {
                (true, false) => reported.push(kw),
                (true, true) => denied.push(kw),
                (false, _) => {}
            }
        }

        let mut out = String::new();
        if !reported.is_empty() {
            out.push_str("Patient reports ");
            out.push_str(&reported.join(", "));
            out.push('.');
        }
        if !denied.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str("Denies ");
            out.push_str(&denied.join(", "));
            out.push('.');
        }
        out
    }

    /// Check the last N words of the text preceding an occurrence.
    fn window_is_negated(&self, preceding: &str) -> bool {
        let lexicon = Lexicon::shared();
        preceding
            .split_whitespace()
            .rev()
            .take(self.window_words)
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .any(|word| lexicon.is_negation_cue(word))
    }
}

fn on_word_boundary(text: &str, offset: usize, len: usize) -> bool {
    let before_ok = offset == 0
        || !text[..offset]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric);
    let after_ok = !text[offset + len..]
        .chars()
        .next()
        .is_some_and(char::is_alphanumeric);
    before_ok && after_ok
}
