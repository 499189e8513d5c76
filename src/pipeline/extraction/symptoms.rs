//! Symptom scanning and attribute capture.
//!
//! Longest phrases first with claimed-span tracking, so "chest pain"
//! suppresses the bare "pain" hit inside it. Negated candidates are
//! diverted to the denied list instead of the positive entity set.

use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon::terms::{QUALITY_DESCRIPTORS, RADIATION_CUES, SEVERITY_WORDS};
use crate::lexicon::Lexicon;
use crate::pipeline::negation::NegationResolver;
use crate::pipeline::segment::Segment;

use super::types::{AttributeKey, AttributeValue, DeniedFinding, EntityType, Mention, ReferenceKind};
use super::{bounded_back, bounded_fwd, word_bounded, ClaimedSpans, EntitySink};

/// "7/10" or "7 out of 10" severity ratings.
static SEVERITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})\s*(?:/|out\s+of)\s*10\b").expect("Invalid severity pattern")
});

/// Characters of context considered when tying a severity word to a
/// mention ("severe abdominal pain").
const SEVERITY_LOOKBACK: usize = 20;

/// How far past a radiation cue the target body part may appear.
const RADIATION_LOOKAHEAD: usize = 40;

pub(crate) fn scan(
    segment: &Segment,
    lower: &str,
    negation: &NegationResolver,
    lexicon: &'static Lexicon,
    claimed: &mut ClaimedSpans,
    sink: &mut EntitySink,
    denied: &mut Vec<DeniedFinding>,
) {
    let mut touched: Vec<usize> = Vec::new();

    for term in lexicon.symptom_terms() {
        for (offset, matched) in lower.match_indices(term.phrase) {
            let range = offset..offset + matched.len();
            if !word_bounded(lower, offset, matched.len()) || claimed.is_claimed(&range) {
                continue;
            }
            claimed.claim(range.clone());

            if negation.occurrence_is_negated(lower, offset) {
                let already = denied
                    .iter()
                    .any(|d| d.name == term.canonical && d.segment_index == segment.sequence_index);
                if !already {
                    denied.push(DeniedFinding {
                        name: term.canonical.to_string(),
                        entity_type: EntityType::Symptom,
                        segment_index: segment.sequence_index,
                    });
                }
                continue;
            }

            let index = sink.symptom_mut(term.canonical, term.implied_location);
            sink.entities[index].mentions.push(Mention {
                segment_index: segment.sequence_index,
                span: range.clone(),
                reference_kind: ReferenceKind::Direct,
            });

            apply_severity_word(sink, index, lower, offset);
            if !touched.contains(&index) {
                touched.push(index);
            }
        }
    }

    enrich_pain_entity(lower, lexicon, sink, &touched);
}

/// A severity word directly before the mention ("severe chest pain")
/// becomes the severity attribute unless a numeric rating already did.
fn apply_severity_word(sink: &mut EntitySink, index: usize, lower: &str, offset: usize) {
    let entity = &mut sink.entities[index];
    if entity.attribute(AttributeKey::Severity).is_some() {
        return;
    }
    let start = bounded_back(lower, offset.saturating_sub(SEVERITY_LOOKBACK));
    let window = &lower[start..offset];
    for &word in SEVERITY_WORDS {
        if let Some(pos) = window.find(word) {
            if word_bounded(window, pos, word.len()) {
                entity.set_attribute(AttributeKey::Severity, AttributeValue::Text(word.into()));
                return;
            }
        }
    }
}

/// Segment-level attributes (numeric severity, quality, radiation,
/// location fallback) attach to the first pain-like entity mentioned in
/// this segment; these descriptors are pain vocabulary.
fn enrich_pain_entity(
    lower: &str,
    lexicon: &'static Lexicon,
    sink: &mut EntitySink,
    touched: &[usize],
) {
    let Some(&index) = touched.iter().find(|&&i| {
        let name = sink.entities[i].name.as_str();
        name == "pain" || name == "headache"
    }) else {
        return;
    };

    let radiation = radiation_targets(lower, lexicon);
    let radiation_zones: Vec<std::ops::Range<usize>> = radiation_zones(lower);

    let entity = &mut sink.entities[index];

    if let Some(caps) = SEVERITY_RE.captures(lower) {
        // Malformed numeric capture is omitted, never a sentinel.
        if let Ok(rating) = caps[1].parse::<i64>() {
            if rating <= 10 {
                entity.set_attribute(AttributeKey::Severity, AttributeValue::Integer(rating));
            }
        }
    }

    if entity.attribute(AttributeKey::Quality).is_none() {
        for &descriptor in QUALITY_DESCRIPTORS {
            if let Some(pos) = lower.find(descriptor) {
                if word_bounded(lower, pos, descriptor.len()) {
                    entity.set_attribute(AttributeKey::Quality, AttributeValue::Text(descriptor.into()));
                    break;
                }
            }
        }
    }

    for target in radiation {
        entity.push_list_attribute(AttributeKey::Radiation, target);
    }

    if entity.attribute(AttributeKey::Location).is_none() {
        if let Some(region) = first_location(lower, lexicon, &radiation_zones) {
            entity.set_attribute(AttributeKey::Location, AttributeValue::Text(region.into()));
        }
    }
}

/// Body parts named after a radiation cue ("radiates to my left arm").
pub(crate) fn radiation_targets(lower: &str, lexicon: &'static Lexicon) -> Vec<String> {
    let mut targets = Vec::new();
    for zone in radiation_zones(lower) {
        let window_end = bounded_fwd(lower, zone.end + RADIATION_LOOKAHEAD);
        let window = &lower[zone.end..window_end];
        if let Some((_, region)) = earliest_anatomy(window, lexicon) {
            let region = region.to_string();
            if !targets.contains(&region) {
                targets.push(region);
            }
        }
    }
    targets
}

/// Byte ranges of radiation cue phrases in the segment.
fn radiation_zones(lower: &str) -> Vec<std::ops::Range<usize>> {
    let mut zones = Vec::new();
    for &cue in RADIATION_CUES {
        for (offset, matched) in lower.match_indices(cue) {
            zones.push(offset..offset + matched.len());
        }
    }
    zones
}

/// First anatomical region mentioned outside any radiation target zone.
fn first_location(
    lower: &str,
    lexicon: &'static Lexicon,
    radiation_zones: &[std::ops::Range<usize>],
) -> Option<&'static str> {
    let mut best: Option<(usize, &'static str)> = None;
    for &(phrase, region) in lexicon.anatomy() {
        for (offset, matched) in lower.match_indices(phrase) {
            if !word_bounded(lower, offset, matched.len()) {
                continue;
            }
            // Skip regions that are radiation targets, not the pain site.
            let follows_cue = radiation_zones
                .iter()
                .any(|zone| offset >= zone.end && offset - zone.end < RADIATION_LOOKAHEAD);
            if follows_cue {
                continue;
            }
            if best.map_or(true, |(b, _)| offset < b) {
                best = Some((offset, region));
            }
        }
    }
    best.map(|(_, region)| region)
}

/// Earliest anatomy phrase in a window, longest phrase preferred on ties.
fn earliest_anatomy(window: &str, lexicon: &'static Lexicon) -> Option<(usize, &'static str)> {
    let mut best: Option<(usize, &'static str)> = None;
    for &(phrase, region) in lexicon.anatomy() {
        if let Some(offset) = window.find(phrase) {
            if word_bounded(window, offset, phrase.len()) && best.map_or(true, |(b, _)| offset < b) {
                best = Some((offset, region));
            }
        }
    }
    best
}
