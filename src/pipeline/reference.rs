//! Pronoun and anaphora resolution.
//!
//! A single forward pass over the segments: "it" links to the most
//! recently mentioned symptom from an earlier segment, and definite or
//! possessive re-mentions ("the chest pain", "my headache") attach to the
//! entity already carrying that canonical name. References with no
//! antecedent are dropped, never promoted to entities of their own.

use std::ops::Range;

use crate::lexicon::Lexicon;
use crate::pipeline::extraction::symptoms::radiation_targets;
use crate::pipeline::extraction::types::{
    AttributeKey, Entity, EntityType, Mention, ReferenceKind,
};
use crate::pipeline::extraction::word_bounded;
use crate::pipeline::segment::Segment;

pub struct ReferenceResolver {
    lexicon: &'static Lexicon,
}

impl Default for ReferenceResolver {
    fn default() -> Self {
        Self {
            lexicon: Lexicon::shared(),
        }
    }
}

impl ReferenceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach pronoun, definite, and possessive mentions to their
    /// antecedent entities. Mutates mentions and radiation attributes
    /// only; never creates or removes entities.
    pub fn resolve(&self, entities: &mut [Entity], segments: &[Segment]) {
        for segment in segments {
            let lower = segment.text.to_lowercase();
            self.resolve_pronoun(entities, segment, &lower);
            self.resolve_articles(entities, segment, &lower);
        }
    }

    /// "it" refers to the symptom whose latest mention is closest before
    /// this segment. Descriptors in the pronoun's segment then enrich the
    /// antecedent, so "it radiates to my left arm" lands on the pain.
    fn resolve_pronoun(&self, entities: &mut [Entity], segment: &Segment, lower: &str) {
        let Some(span) = first_pronoun(lower) else {
            return;
        };

        let antecedent = entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.entity_type == EntityType::Symptom)
            .filter_map(|(i, e)| {
                e.last_mention_index()
                    .filter(|&last| last < segment.sequence_index)
                    .map(|last| (i, last))
            })
            .max_by_key(|&(_, last)| last)
            .map(|(i, _)| i);
        let Some(index) = antecedent else {
            tracing::debug!(
                segment = segment.sequence_index,
                "Pronoun without antecedent dropped"
            );
            return;
        };

        let entity = &mut entities[index];
        let mention = Mention {
            segment_index: segment.sequence_index,
            span,
            reference_kind: ReferenceKind::Pronoun,
        };
        if !entity.mentions.contains(&mention) {
            entity.mentions.push(mention);
        }

        for target in radiation_targets(lower, self.lexicon) {
            entity.push_list_attribute(AttributeKey::Radiation, target);
        }
    }

    /// "the <symptom>" / "my <symptom>" re-mentions. A direct mention the
    /// extractor already recorded in this segment is upgraded in place;
    /// otherwise a new mention is appended to the prior entity.
    fn resolve_articles(&self, entities: &mut [Entity], segment: &Segment, lower: &str) {
        for term in self.lexicon.symptom_terms() {
            for (article, kind) in [
                ("the ", ReferenceKind::Definite),
                ("my ", ReferenceKind::Possessive),
            ] {
                let needle = format!("{article}{}", term.phrase);
                for (offset, matched) in lower.match_indices(&needle) {
                    if !word_bounded(lower, offset, matched.len()) {
                        continue;
                    }
                    let phrase_range = offset + article.len()..offset + matched.len();
                    self.attach_reference(
                        entities,
                        term.canonical,
                        segment.sequence_index,
                        phrase_range,
                        kind,
                    );
                }
            }
        }
    }

    fn attach_reference(
        &self,
        entities: &mut [Entity],
        canonical: &str,
        segment_index: usize,
        span: Range<usize>,
        kind: ReferenceKind,
    ) {
        // Same-segment direct mention: the extractor saw the phrase too,
        // so re-label it instead of duplicating.
        for entity in entities.iter_mut() {
            if entity.entity_type != EntityType::Symptom || entity.name != canonical {
                continue;
            }
            if let Some(mention) = entity.mentions.iter_mut().find(|m| {
                m.segment_index == segment_index && overlaps(&m.span, &span)
            }) {
                if mention.reference_kind == ReferenceKind::Direct {
                    mention.reference_kind = kind;
                }
                return;
            }
        }

        // Otherwise an anaphoric mention of the most recently mentioned
        // entity with this name.
        let antecedent = entities
            .iter_mut()
            .filter(|e| e.entity_type == EntityType::Symptom && e.name == canonical)
            .filter_map(|e| {
                e.last_mention_index()
                    .filter(|&last| last < segment_index)
                    .map(|last| (last, e))
            })
            .max_by_key(|&(last, _)| last)
            .map(|(_, e)| e);
        if let Some(entity) = antecedent {
            let mention = Mention {
                segment_index,
                span,
                reference_kind: kind,
            };
            if !entity.mentions.contains(&mention) {
                entity.mentions.push(mention);
            }
        }
    }
}

fn first_pronoun(lower: &str) -> Option<Range<usize>> {
    lower
        .match_indices("it")
        .find(|(offset, matched)| word_bounded(lower, *offset, matched.len()))
        .map(|(offset, matched)| offset..offset + matched.len())
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::pipeline::extraction::EntityExtractor;
    use crate::pipeline::segment::segment;
    use std::time::Duration;

    fn resolve(text: &str) -> Vec<Entity> {
        let segments = segment(text, Duration::from_secs(5));
        let mut output = EntityExtractor::new(&EngineConfig::default()).extract(&segments);
        ReferenceResolver::new().resolve(&mut output.entities, &segments);
        output.entities
    }

    #[test]
    fn pronoun_links_to_previous_symptom() {
        let entities = resolve("I have chest pain\nit started an hour ago");
        let pain = entities.iter().find(|e| e.name == "pain").unwrap();
        assert!(pain
            .mentions
            .iter()
            .any(|m| m.segment_index == 1 && m.reference_kind == ReferenceKind::Pronoun));
    }

    #[test]
    fn pronoun_segment_descriptors_enrich_antecedent() {
        let entities = resolve("I have chest pain\nit radiates to my left arm");
        let pain = entities.iter().find(|e| e.name == "pain").unwrap();
        assert_eq!(
            pain.attribute(AttributeKey::Radiation).unwrap().as_list().unwrap(),
            &["left arm".to_string()]
        );
    }

    #[test]
    fn pronoun_without_antecedent_is_dropped() {
        let entities = resolve("it started last week");
        assert!(entities.iter().all(|e| e.entity_type != EntityType::Symptom));
    }

    #[test]
    fn pronoun_prefers_most_recent_symptom() {
        let entities = resolve("I had a headache yesterday\nnow I have nausea\nit is getting worse");
        let nausea = entities.iter().find(|e| e.name == "nausea").unwrap();
        let headache = entities.iter().find(|e| e.name == "headache").unwrap();
        assert!(nausea
            .mentions
            .iter()
            .any(|m| m.reference_kind == ReferenceKind::Pronoun));
        assert!(headache
            .mentions
            .iter()
            .all(|m| m.reference_kind == ReferenceKind::Direct));
    }

    #[test]
    fn definite_article_upgrades_same_segment_mention() {
        let entities = resolve("I have chest pain\nthe chest pain is worse when I walk");
        let pain = entities.iter().find(|e| e.name == "pain").unwrap();
        let upgraded: Vec<_> = pain
            .mentions
            .iter()
            .filter(|m| m.reference_kind == ReferenceKind::Definite)
            .collect();
        assert_eq!(upgraded.len(), 1);
        assert_eq!(upgraded[0].segment_index, 1);
        // Still one merged entity, not a duplicate.
        assert_eq!(
            entities.iter().filter(|e| e.name == "pain").count(),
            1
        );
    }

    #[test]
    fn possessive_reference_labeled() {
        let entities = resolve("headache since this morning\nmy headache will not go away");
        let headache = entities.iter().find(|e| e.name == "headache").unwrap();
        assert!(headache
            .mentions
            .iter()
            .any(|m| m.reference_kind == ReferenceKind::Possessive));
    }

    #[test]
    fn definite_reference_prefers_most_recently_mentioned_entity() {
        // Chest pain mentioned at segments 0 and 2, abdominal pain at 1.
        // "the pain" at segment 3 belongs to the chest entity.
        let entities = resolve(
            "I have chest pain\nabdominal pain started too\nthe chest pain is back\nthe pain is unbearable",
        );
        let location = |e: &Entity| {
            e.attribute(AttributeKey::Location)
                .and_then(|v| v.as_text())
                .map(str::to_string)
        };
        let chest = entities
            .iter()
            .find(|e| e.name == "pain" && location(e).as_deref() == Some("chest"))
            .unwrap();
        let abdomen = entities
            .iter()
            .find(|e| e.name == "pain" && location(e).as_deref() == Some("abdomen"))
            .unwrap();
        assert!(chest
            .mentions
            .iter()
            .any(|m| m.segment_index == 3 && m.reference_kind == ReferenceKind::Definite));
        assert!(abdomen.mentions.iter().all(|m| m.segment_index != 3));
    }

    #[test]
    fn reference_never_creates_entities() {
        let before = resolve("the dizziness is back");
        // "the dizziness" has a direct mention in the same segment, so one
        // entity; a bare article reference to nothing must not add more.
        assert_eq!(
            before
                .iter()
                .filter(|e| e.entity_type == EntityType::Symptom)
                .count(),
            1
        );
    }
}
