//! Entity extraction stage: scans segments against the lexicon catalogs
//! and produces the typed entity graph, denied findings, and structured
//! medications.
//!
//! Scan order per segment is symptoms, vitals, medications, allergies,
//! then history. Claimed character ranges are shared across scans so an
//! overlapping shorter match never double-counts.

pub mod allergies;
pub mod medications;
pub mod normalize;
pub mod symptoms;
pub mod types;
pub mod vitals;

use std::collections::HashMap;
use std::ops::Range;

use crate::config::EngineConfig;
use crate::lexicon::terms::{CONDITION_TERMS, FAMILY_CUES, HISTORY_CUES, SOCIAL_TERMS};
use crate::lexicon::Lexicon;
use crate::pipeline::negation::NegationResolver;
use crate::pipeline::segment::Segment;

use medications::MedicationHit;
use types::{
    AttributeKey, AttributeValue, Entity, EntityType, ExtractionOutput, Mention, ReferenceKind,
    RelationshipKind, StructuredMedication,
};

/// Character ranges already consumed by a longer match in this segment.
pub(crate) struct ClaimedSpans {
    spans: Vec<Range<usize>>,
}

impl ClaimedSpans {
    fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// True when `range` sits fully inside an already-claimed span.
    pub(crate) fn is_claimed(&self, range: &Range<usize>) -> bool {
        self.spans
            .iter()
            .any(|claimed| range.start >= claimed.start && range.end <= claimed.end)
    }

    pub(crate) fn claim(&mut self, range: Range<usize>) {
        self.spans.push(range);
    }
}

/// Merge-aware accumulator: entities are reused within one extraction
/// pass, keyed by type + canonical name (symptoms additionally by
/// location, so "chest pain" and "abdominal pain" stay distinct).
pub(crate) struct EntitySink {
    pub(crate) entities: Vec<Entity>,
    confidence_prior: f32,
}

impl EntitySink {
    fn new(confidence_prior: f32) -> Self {
        Self {
            entities: Vec::new(),
            confidence_prior,
        }
    }

    /// Index of the entity for this type + name, creating it if absent.
    pub(crate) fn entity_mut(&mut self, entity_type: EntityType, name: &str) -> usize {
        if let Some(index) = self
            .entities
            .iter()
            .position(|e| e.entity_type == entity_type && e.name == name)
        {
            return index;
        }
        self.entities
            .push(Entity::new(entity_type, name, self.confidence_prior));
        self.entities.len() - 1
    }

    /// Symptom merge with location compatibility: a located match reuses
    /// an entity with the same location or adopts a location-free one;
    /// conflicting locations split into separate entities.
    pub(crate) fn symptom_mut(&mut self, canonical: &str, location: Option<&str>) -> usize {
        let candidates: Vec<usize> = self
            .entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.entity_type == EntityType::Symptom && e.name == canonical)
            .map(|(i, _)| i)
            .collect();

        match location {
            None => {
                // A bare re-mention belongs to whichever candidate was
                // mentioned most recently, not whichever was created last.
                let most_recent = candidates
                    .iter()
                    .copied()
                    .max_by_key(|&i| self.entities[i].last_mention_index());
                if let Some(index) = most_recent {
                    return index;
                }
            }
            Some(loc) => {
                for &index in candidates.iter().rev() {
                    match self.entities[index]
                        .attribute(AttributeKey::Location)
                        .and_then(|v| v.as_text())
                    {
                        Some(existing) if existing == loc => return index,
                        Some(_) => continue,
                        None => {
                            self.entities[index].set_attribute(
                                AttributeKey::Location,
                                AttributeValue::Text(loc.into()),
                            );
                            return index;
                        }
                    }
                }
            }
        }

        let mut entity = Entity::new(EntityType::Symptom, canonical, self.confidence_prior);
        if let Some(loc) = location {
            entity.set_attribute(AttributeKey::Location, AttributeValue::Text(loc.into()));
        }
        self.entities.push(entity);
        self.entities.len() - 1
    }
}

/// The extraction stage. Stateless between calls; one instance can serve
/// many transcripts.
pub struct EntityExtractor {
    lexicon: &'static Lexicon,
    negation: NegationResolver,
    confidence_prior: f32,
}

impl EntityExtractor {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            lexicon: Lexicon::shared(),
            negation: NegationResolver::new(config.negation_window_words),
            confidence_prior: config.confidence_prior,
        }
    }

    /// Scan every segment and build the entity graph. Never fails; a
    /// transcript with no recognizable content yields empty output.
    pub fn extract(&self, segments: &[Segment]) -> ExtractionOutput {
        let mut sink = EntitySink::new(self.confidence_prior);
        let mut output = ExtractionOutput::default();
        let mut hits: Vec<MedicationHit> = Vec::new();

        for segment in segments {
            let lower = segment.text.to_lowercase();
            let mut claimed = ClaimedSpans::new();

            symptoms::scan(
                segment,
                &lower,
                &self.negation,
                self.lexicon,
                &mut claimed,
                &mut sink,
                &mut output.denied,
            );
            vitals::scan(segment, &lower, &mut claimed, &mut sink);
            medications::scan(
                segment,
                &lower,
                &self.negation,
                self.lexicon,
                &mut claimed,
                &mut hits,
                &mut output.denied,
            );
            allergies::scan(segment, &lower, &self.negation, &mut sink, &mut output.denied);
            self.scan_history(segment, &lower, &mut claimed, &mut sink);
        }

        output.medications = project_medications(&hits, &mut sink);
        link_treatments(&mut sink.entities);
        output.entities = sink.entities;

        tracing::debug!(
            entities = output.entities.len(),
            denied = output.denied.len(),
            medications = output.medications.len(),
            "Extraction pass complete"
        );

        output
    }

    /// Medical, family, and social history cues. Family cues run first
    /// and claim their condition span, since "family history of" contains
    /// the bare "history of" cue.
    fn scan_history(
        &self,
        segment: &Segment,
        lower: &str,
        claimed: &mut ClaimedSpans,
        sink: &mut EntitySink,
    ) {
        for &cue in FAMILY_CUES {
            self.history_cue(segment, lower, cue, EntityType::FamilyHistory, claimed, sink);
        }
        for &cue in HISTORY_CUES {
            self.history_cue(segment, lower, cue, EntityType::MedicalHistory, claimed, sink);
        }

        for &(phrase, canonical) in SOCIAL_TERMS {
            for (offset, matched) in lower.match_indices(phrase) {
                if !word_bounded(lower, offset, matched.len())
                    || self.negation.occurrence_is_negated(lower, offset)
                {
                    continue;
                }
                let index = sink.entity_mut(EntityType::SocialHistory, canonical);
                let mention = Mention {
                    segment_index: segment.sequence_index,
                    span: offset..offset + matched.len(),
                    reference_kind: ReferenceKind::Direct,
                };
                if !sink.entities[index].mentions.contains(&mention) {
                    sink.entities[index].mentions.push(mention);
                }
            }
        }
    }

    fn history_cue(
        &self,
        segment: &Segment,
        lower: &str,
        cue: &str,
        entity_type: EntityType,
        claimed: &mut ClaimedSpans,
        sink: &mut EntitySink,
    ) {
        for (offset, matched) in lower.match_indices(cue) {
            let rest_start = offset + matched.len();
            let rest = &lower[rest_start..];
            let Some((pos, condition, len)) = first_condition(rest) else {
                continue;
            };
            let range = rest_start + pos..rest_start + pos + len;
            if claimed.is_claimed(&range) {
                continue;
            }
            claimed.claim(range.clone());

            let index = sink.entity_mut(entity_type, condition);
            sink.entities[index].mentions.push(Mention {
                segment_index: segment.sequence_index,
                span: range,
                reference_kind: ReferenceKind::Direct,
            });
        }
    }
}

/// Earliest condition term in the text, longest preferred on offset ties.
fn first_condition(text: &str) -> Option<(usize, &'static str, usize)> {
    let mut best: Option<(usize, &'static str)> = None;
    for &condition in CONDITION_TERMS {
        if let Some(offset) = text.find(condition) {
            if !word_bounded(text, offset, condition.len()) {
                continue;
            }
            let better = match best {
                None => true,
                Some((b, existing)) => {
                    offset < b || (offset == b && condition.len() > existing.len())
                }
            };
            if better {
                best = Some((offset, condition));
            }
        }
    }
    best.map(|(offset, condition)| (offset, condition, condition.len()))
}

/// Merge medication hits by generic name into the structured list and
/// project each into a `Medication` entity for document assembly.
fn project_medications(hits: &[MedicationHit], sink: &mut EntitySink) -> Vec<StructuredMedication> {
    let mut merged: Vec<StructuredMedication> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for hit in hits {
        let entry = match by_name.get(&hit.med.name) {
            Some(&index) => &mut merged[index],
            None => {
                by_name.insert(hit.med.name.clone(), merged.len());
                merged.push(hit.med.clone());
                let last = merged.len() - 1;
                &mut merged[last]
            }
        };
        // Later hits fill fields an earlier bare mention lacked.
        fill_missing(&mut entry.dose, &hit.med.dose);
        fill_missing(&mut entry.unit, &hit.med.unit);
        fill_missing(&mut entry.route, &hit.med.route);
        fill_missing(&mut entry.frequency, &hit.med.frequency);
        fill_missing(&mut entry.indication, &hit.med.indication);

        let index = sink.entity_mut(EntityType::Medication, &hit.med.name);
        sink.entities[index].mentions.push(Mention {
            segment_index: hit.segment_index,
            span: hit.span.clone(),
            reference_kind: ReferenceKind::Direct,
        });
    }

    // Copy merged fields onto the projected entities.
    for med in &merged {
        let index = sink.entity_mut(EntityType::Medication, &med.name);
        let entity = &mut sink.entities[index];
        let text_fields = [
            (AttributeKey::Dose, &med.dose),
            (AttributeKey::Unit, &med.unit),
            (AttributeKey::Route, &med.route),
            (AttributeKey::Frequency, &med.frequency),
            (AttributeKey::Indication, &med.indication),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                entity.set_attribute(key, AttributeValue::Text(value.clone()));
            }
        }
    }

    merged
}

fn fill_missing(slot: &mut Option<String>, value: &Option<String>) {
    if slot.is_none() {
        slot.clone_from(value);
    }
}

/// Medication entities whose indication names an extracted symptom get a
/// `Treats` edge to it.
fn link_treatments(entities: &mut [Entity]) {
    let targets: Vec<(String, uuid::Uuid)> = entities
        .iter()
        .filter(|e| e.entity_type == EntityType::Symptom)
        .map(|e| (e.name.clone(), e.id))
        .collect();

    for entity in entities.iter_mut() {
        if entity.entity_type != EntityType::Medication {
            continue;
        }
        let Some(indication) = entity
            .attribute(AttributeKey::Indication)
            .and_then(|v| v.as_text())
            .map(str::to_string)
        else {
            continue;
        };
        for (name, id) in &targets {
            if *name == indication {
                entity.add_relationship(*id, RelationshipKind::Treats);
            }
        }
    }
}

/// Word-boundary check: neither neighbor of the matched range may be
/// alphanumeric.
pub(crate) fn word_bounded(text: &str, offset: usize, len: usize) -> bool {
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

/// Walk an index back to the nearest char boundary.
pub(crate) fn bounded_back(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Walk an index forward to the nearest char boundary, capped at the end.
pub(crate) fn bounded_fwd(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::segment::segment;
    use std::time::Duration;

    fn extract(text: &str) -> ExtractionOutput {
        let segments = segment(text, Duration::from_secs(5));
        EntityExtractor::new(&EngineConfig::default()).extract(&segments)
    }

    #[test]
    fn empty_transcript_yields_empty_output() {
        let output = extract("");
        assert!(output.entities.is_empty());
        assert!(output.denied.is_empty());
        assert!(output.medications.is_empty());
    }

    #[test]
    fn non_medical_text_yields_nothing() {
        let output = extract("we talked about the traffic and the game last night");
        assert!(output.entities.is_empty());
        assert!(output.medications.is_empty());
    }

    #[test]
    fn claimed_spans_block_contained_ranges_only() {
        let mut claimed = ClaimedSpans::new();
        claimed.claim(5..15);
        assert!(claimed.is_claimed(&(6..10)));
        assert!(claimed.is_claimed(&(5..15)));
        assert!(!claimed.is_claimed(&(4..10)));
        assert!(!claimed.is_claimed(&(10..20)));
    }

    #[test]
    fn bare_symptom_merges_into_most_recently_mentioned_entity() {
        let output = extract(
            "chest pain started this morning\nabdominal pain too\nchest pain is worse\nthe pain is unbearable",
        );
        let chest = output
            .entities
            .iter()
            .find(|e| {
                e.name == "pain"
                    && e.attribute(AttributeKey::Location).and_then(|v| v.as_text())
                        == Some("chest")
            })
            .unwrap();
        assert!(chest.mentions.iter().any(|m| m.segment_index == 3));
    }

    #[test]
    fn medical_history_extracted() {
        let output = extract("I have a history of hypertension and diabetes");
        let history: Vec<_> = output
            .entities
            .iter()
            .filter(|e| e.entity_type == EntityType::MedicalHistory)
            .collect();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, "hypertension");
    }

    #[test]
    fn family_history_not_double_counted_as_personal() {
        let output = extract("there is a family history of heart disease");
        assert!(output
            .entities
            .iter()
            .any(|e| e.entity_type == EntityType::FamilyHistory && e.name == "heart disease"));
        assert!(!output
            .entities
            .iter()
            .any(|e| e.entity_type == EntityType::MedicalHistory));
    }

    #[test]
    fn social_history_from_habit_words() {
        let output = extract("he is a smoker and drinks heavily on weekends");
        let social: Vec<_> = output
            .entities
            .iter()
            .filter(|e| e.entity_type == EntityType::SocialHistory)
            .collect();
        let names: Vec<&str> = social.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"smoking"));
        assert!(names.contains(&"alcohol use"));
    }

    #[test]
    fn medication_indication_links_treats_edge() {
        let output = extract("my back pain is bad\nI take ibuprofen for the pain");
        let pain = output
            .entities
            .iter()
            .find(|e| e.entity_type == EntityType::Symptom && e.name == "pain")
            .unwrap();
        let med = output
            .entities
            .iter()
            .find(|e| e.entity_type == EntityType::Medication && e.name == "ibuprofen")
            .unwrap();
        assert!(med
            .relationships
            .iter()
            .any(|r| r.target == pain.id && r.kind == RelationshipKind::Treats));
    }

    #[test]
    fn confidence_prior_applies_to_all_entities() {
        let output = extract("chest pain and nausea, takes aspirin");
        assert!(!output.entities.is_empty());
        for entity in &output.entities {
            assert!((entity.confidence - 0.9).abs() < f32::EPSILON);
            assert!((0.0..=1.0).contains(&entity.confidence));
        }
    }
}
