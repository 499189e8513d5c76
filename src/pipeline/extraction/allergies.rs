//! Allergy extraction: "allergic to X" cues, reaction capture, and
//! no-known-allergies detection.

use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon::terms::ALLERGY_REACTIONS;
use crate::pipeline::negation::NegationResolver;
use crate::pipeline::segment::Segment;

use super::types::{
    AttributeKey, AttributeValue, DeniedFinding, EntityType, Mention, ReferenceKind,
};
use super::{word_bounded, EntitySink};

static ALLERGY_CUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"allerg(?:ic|y|ies)\s+to\s+([a-z][a-z, ]{1,60})").expect("Invalid allergy pattern")
});

static NKDA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"no\s+known\s+(?:drug\s+)?allergies|denies\s+(?:any\s+)?allergies|no\s+allergies")
        .expect("Invalid NKDA pattern")
});

/// Reactions severe enough to label the allergy severe on their own.
static SEVERE_REACTIONS: &[&str] = &["anaphylaxis", "throat closing", "trouble breathing"];

pub(crate) fn scan(
    segment: &Segment,
    lower: &str,
    negation: &NegationResolver,
    sink: &mut EntitySink,
    denied: &mut Vec<DeniedFinding>,
) {
    if NKDA_RE.is_match(lower) {
        denied.push(DeniedFinding {
            name: "drug allergies".to_string(),
            entity_type: EntityType::Allergy,
            segment_index: segment.sequence_index,
        });
        return;
    }

    let reaction = reaction_in(lower);

    for caps in ALLERGY_CUE_RE.captures_iter(lower) {
        let Some(cue) = caps.get(0) else {
            continue;
        };
        if negation.occurrence_is_negated(lower, cue.start()) {
            // "not allergic to penicillin"
            for allergen in allergens_in(&caps[1]) {
                denied.push(DeniedFinding {
                    name: allergen,
                    entity_type: EntityType::Allergy,
                    segment_index: segment.sequence_index,
                });
            }
            continue;
        }

        let Some(clause) = caps.get(1) else {
            continue;
        };
        for allergen in allergens_in(clause.as_str()) {
            let index = sink.entity_mut(EntityType::Allergy, &allergen);
            let entity = &mut sink.entities[index];

            if let Some(reaction) = &reaction {
                entity.set_attribute(AttributeKey::Reaction, AttributeValue::Text(reaction.clone()));
                if SEVERE_REACTIONS.contains(&reaction.as_str()) {
                    entity.set_attribute(AttributeKey::Severity, AttributeValue::Text("severe".into()));
                }
            }

            entity.mentions.push(Mention {
                segment_index: segment.sequence_index,
                span: clause.start()..clause.end(),
                reference_kind: ReferenceKind::Direct,
            });
        }
    }
}

/// Words that end an allergen phrase; the clause capture is greedy and
/// frequently runs into the next clause ("sulfa gives me a rash").
static ALLERGEN_STOPS: &[&str] = &[
    "i", "he", "she", "they", "we", "you", "it", "that", "which", "but", "and", "gives", "give",
    "causes", "cause", "makes", "made", "get", "gets", "my", "anything", "something",
];

/// Split an allergen clause into individual allergens.
/// "penicillin and sulfa drugs" → ["penicillin", "sulfa drugs"].
fn allergens_in(clause: &str) -> Vec<String> {
    clause
        .split(',')
        .flat_map(|part| part.split(" and "))
        .filter_map(|part| {
            let words: Vec<&str> = part
                .split_whitespace()
                .take_while(|word| !ALLERGEN_STOPS.contains(word))
                .take(2)
                .collect();
            if words.is_empty() {
                None
            } else {
                Some(words.join(" "))
            }
        })
        .collect()
}

fn reaction_in(lower: &str) -> Option<String> {
    let mut best: Option<(usize, &str)> = None;
    for &reaction in ALLERGY_REACTIONS {
        if let Some(offset) = lower.find(reaction) {
            if word_bounded(lower, offset, reaction.len())
                && best.map_or(true, |(b, _)| offset < b)
            {
                best = Some((offset, reaction));
            }
        }
    }
    best.map(|(_, reaction)| reaction.to_string())
}
