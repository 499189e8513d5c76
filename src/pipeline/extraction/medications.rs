//! Medication sub-extractor.
//!
//! Produces read-only `StructuredMedication` records: generic name (brand
//! names resolved through the alias table), dose, unit, route, frequency,
//! and indication where the surrounding words supply them.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon::terms::CONDITION_TERMS;
use crate::lexicon::Lexicon;
use crate::pipeline::negation::NegationResolver;
use crate::pipeline::segment::Segment;

use super::types::{DeniedFinding, EntityType, StructuredMedication};
use super::{bounded_back, word_bounded, ClaimedSpans};

/// A medication name hit with enough position data to build a mention.
#[derive(Debug, Clone)]
pub(crate) struct MedicationHit {
    pub med: StructuredMedication,
    pub segment_index: usize,
    pub span: Range<usize>,
}

static DOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(milligrams?|micrograms?|grams?|units?|mg|mcg|ml|g)\b")
        .expect("Invalid dose pattern")
});

static EVERY_N_HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"every\s+(\d{1,2})\s+hours").expect("Invalid interval pattern")
});

static INDICATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"for\s+(?:my\s+|his\s+|her\s+|the\s+)?([a-z][a-z ]{2,40})")
        .expect("Invalid indication pattern")
});

/// How far before a medication name a dose may appear ("500 mg of aspirin").
const DOSE_LOOKBACK: usize = 24;

pub(crate) fn scan(
    segment: &Segment,
    lower: &str,
    negation: &NegationResolver,
    lexicon: &'static Lexicon,
    claimed: &mut ClaimedSpans,
    hits: &mut Vec<MedicationHit>,
    denied: &mut Vec<DeniedFinding>,
) {
    for &(phrase, generic) in lexicon.medication_phrases() {
        for (offset, matched) in lower.match_indices(phrase) {
            let range = offset..offset + matched.len();
            if !word_bounded(lower, offset, matched.len()) || claimed.is_claimed(&range) {
                continue;
            }
            claimed.claim(range.clone());

            if negation.occurrence_is_negated(lower, offset) {
                denied.push(DeniedFinding {
                    name: generic.to_string(),
                    entity_type: EntityType::Medication,
                    segment_index: segment.sequence_index,
                });
                continue;
            }

            let remainder = &lower[range.end..];
            let (dose, unit) = dose_and_unit(lower, &range, lexicon);

            hits.push(MedicationHit {
                med: StructuredMedication {
                    name: generic.to_string(),
                    dose,
                    unit,
                    route: route_in(remainder, lexicon),
                    frequency: frequency_in(remainder, lexicon),
                    indication: indication_in(remainder),
                    source_span: segment.text.clone(),
                },
                segment_index: segment.sequence_index,
                span: range,
            });
        }
    }
}

/// Dose and canonical unit, searching after the name first, then the
/// short window before it. A capture that fails numeric parse is omitted.
fn dose_and_unit(
    lower: &str,
    name_range: &Range<usize>,
    lexicon: &'static Lexicon,
) -> (Option<String>, Option<String>) {
    let after = &lower[name_range.end..];
    let before_start = bounded_back(lower, name_range.start.saturating_sub(DOSE_LOOKBACK));
    let before = &lower[before_start..name_range.start];

    let caps = DOSE_RE.captures(after).or_else(|| DOSE_RE.captures(before));
    let Some(caps) = caps else {
        return (None, None);
    };
    if caps[1].parse::<f64>().is_err() {
        return (None, None);
    }

    let unit = lexicon
        .units()
        .iter()
        .find(|(spelling, _)| *spelling == &caps[2])
        .map(|(_, canonical)| canonical.to_string());

    (Some(caps[1].to_string()), unit)
}

fn route_in(remainder: &str, lexicon: &'static Lexicon) -> Option<String> {
    for &(phrase, canonical) in lexicon.routes() {
        if let Some(offset) = remainder.find(phrase) {
            if word_bounded(remainder, offset, phrase.len()) {
                return Some(canonical.to_string());
            }
        }
    }
    None
}

fn frequency_in(remainder: &str, lexicon: &'static Lexicon) -> Option<String> {
    for &(phrase, canonical) in lexicon.frequencies() {
        if let Some(offset) = remainder.find(phrase) {
            if word_bounded(remainder, offset, phrase.len()) {
                return Some(canonical.to_string());
            }
        }
    }
    EVERY_N_HOURS_RE
        .captures(remainder)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .map(|hours| format!("Q{hours}H"))
}

/// Indication: a condition or symptom named in a "for ..." clause.
fn indication_in(remainder: &str) -> Option<String> {
    let caps = INDICATION_RE.captures(remainder)?;
    let clause = &caps[1];

    let mut best: Option<(usize, &str)> = None;
    for &condition in CONDITION_TERMS {
        if let Some(offset) = clause.find(condition) {
            if word_bounded(clause, offset, condition.len())
                && best.map_or(true, |(b, _)| offset < b)
            {
                best = Some((offset, condition));
            }
        }
    }
    for term in Lexicon::shared().symptom_terms() {
        if let Some(offset) = clause.find(term.phrase) {
            if word_bounded(clause, offset, term.phrase.len())
                && best.map_or(true, |(b, _)| offset < b)
            {
                best = Some((offset, term.canonical));
            }
        }
    }

    best.map(|(_, term)| term.to_string())
}
