//! Temporal anchor resolution.
//!
//! Time expressions in a segment become anchors on every entity mentioned
//! in that segment. Resolvable expressions are normalized against a fixed
//! reference instant; phrases that are temporal but not computable stay
//! `Descriptive` with the original wording preserved.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::lexicon::Lexicon;
use crate::pipeline::extraction::types::{
    Entity, EventKind, TemporalAnchor, TemporalExpression,
};
use crate::pipeline::segment::Segment;

static AGO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+|an?|one|two|three)\s*(minute|hour|day|week|month|year)s?\s+ago")
        .expect("Invalid ago pattern")
});

static FOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"for\s+(?:the\s+)?(?:past\s+|last\s+)?(\d+|an?|one|two|three)\s*(minute|hour|day|week|month|year)s?")
        .expect("Invalid duration pattern")
});

static EVERY_N_HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"every\s+(\d{1,2})\s+hours").expect("Invalid interval pattern")
});

static WORSENING_CUES: &[&str] = &["getting worse", "gotten worse", "worsening", "much worse"];
static IMPROVING_CUES: &[&str] = &["getting better", "improving", "improved", "almost gone"];

/// Temporal but not computable; kept verbatim for the note.
static DESCRIPTIVE_CUES: &[&str] = &[
    "a while ago",
    "a few days ago",
    "a couple of days ago",
    "recently",
    "earlier today",
    "on and off",
];

/// Resolves time expressions against a fixed `now`. Constructed once per
/// pipeline run so every anchor in one transcript shares the reference
/// instant.
pub struct TemporalResolver {
    now: DateTime<Utc>,
}

impl Default for TemporalResolver {
    fn default() -> Self {
        Self { now: Utc::now() }
    }
}

impl TemporalResolver {
    pub fn with_now(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Attach temporal anchors to every entity mentioned in a segment that
    /// carries a time expression. Anchors are deduplicated per entity.
    pub fn resolve(&self, entities: &mut [Entity], segments: &[Segment]) {
        for entity in entities.iter_mut() {
            let mentioned: BTreeSet<usize> =
                entity.mentions.iter().map(|m| m.segment_index).collect();
            for index in mentioned {
                let Some(segment) = segments.get(index) else {
                    continue;
                };
                let lower = segment.text.to_lowercase();
                for anchor in self.anchors_in(&lower) {
                    if !entity.temporal_anchors.contains(&anchor) {
                        entity.temporal_anchors.push(anchor);
                    }
                }
            }
        }
    }

    fn anchors_in(&self, lower: &str) -> Vec<TemporalAnchor> {
        let mut anchors = Vec::new();
        let mut onset_resolved = false;

        if let Some(caps) = AGO_RE.captures(lower) {
            if let Some(seconds) = count(&caps[1]).map(|n| n * unit_seconds(&caps[2])) {
                anchors.push(TemporalAnchor {
                    expression: TemporalExpression::Relative {
                        offset_seconds: -seconds,
                        anchor: self.now,
                    },
                    event_kind: EventKind::Onset,
                });
                onset_resolved = true;
            }
        }

        if let Some(caps) = FOR_RE.captures(lower) {
            if let Some(seconds) = count(&caps[1]).map(|n| n * unit_seconds(&caps[2])) {
                anchors.push(TemporalAnchor {
                    expression: TemporalExpression::Duration { seconds },
                    event_kind: EventKind::Onset,
                });
                onset_resolved = true;
            }
        }

        for (phrase, days_back) in [
            ("yesterday", 1),
            ("last night", 1),
            ("this morning", 0),
            ("today", 0),
        ] {
            if lower.contains(phrase) {
                anchors.push(TemporalAnchor {
                    expression: TemporalExpression::Absolute {
                        date: (self.now - chrono::Duration::days(days_back)).date_naive(),
                    },
                    event_kind: EventKind::Onset,
                });
                onset_resolved = true;
                break;
            }
        }

        if !onset_resolved {
            if let Some(&cue) = DESCRIPTIVE_CUES.iter().find(|cue| lower.contains(*cue)) {
                anchors.push(TemporalAnchor {
                    expression: TemporalExpression::Descriptive { text: cue.to_string() },
                    event_kind: EventKind::Onset,
                });
            }
        }

        if let Some(&cue) = WORSENING_CUES.iter().find(|cue| lower.contains(*cue)) {
            anchors.push(TemporalAnchor {
                expression: TemporalExpression::Descriptive { text: cue.to_string() },
                event_kind: EventKind::Worsening,
            });
        } else if let Some(&cue) = IMPROVING_CUES.iter().find(|cue| lower.contains(*cue)) {
            anchors.push(TemporalAnchor {
                expression: TemporalExpression::Descriptive { text: cue.to_string() },
                event_kind: EventKind::Improvement,
            });
        }

        anchors
    }
}

/// Resolve a standalone relative time phrase to an instant.
pub fn resolve_time_expression(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let lower = text.to_lowercase();
    if let Some(caps) = AGO_RE.captures(&lower) {
        let seconds = count(&caps[1])? * unit_seconds(&caps[2]);
        return Some(now - chrono::Duration::seconds(seconds));
    }
    if lower.contains("yesterday") || lower.contains("last night") {
        return Some(now - chrono::Duration::days(1));
    }
    if lower.contains("today") || lower.contains("this morning") {
        return Some(now);
    }
    None
}

/// Duration of a "for N units" phrase.
pub fn extract_duration(text: &str) -> Option<chrono::Duration> {
    let lower = text.to_lowercase();
    let caps = FOR_RE.captures(&lower)?;
    let seconds = count(&caps[1])? * unit_seconds(&caps[2]);
    Some(chrono::Duration::seconds(seconds))
}

/// Canonical dosing frequency named in free text, if any.
pub fn extract_frequency(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    for &(phrase, canonical) in Lexicon::shared().frequencies() {
        if lower.contains(phrase) {
            return Some(canonical.to_string());
        }
    }
    EVERY_N_HOURS_RE
        .captures(&lower)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .map(|hours| format!("Q{hours}H"))
}

fn count(word: &str) -> Option<i64> {
    match word {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        other => other.parse().ok(),
    }
}

fn unit_seconds(unit: &str) -> i64 {
    match unit {
        "minute" => 60,
        "hour" => 3_600,
        "day" => 86_400,
        "week" => 604_800,
        "month" => 2_592_000,
        _ => 31_536_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::pipeline::extraction::EntityExtractor;
    use crate::pipeline::segment::segment;
    use chrono::TimeZone;
    use std::time::Duration;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn resolve(text: &str) -> Vec<Entity> {
        let segments = segment(text, Duration::from_secs(5));
        let mut output = EntityExtractor::new(&EngineConfig::default()).extract(&segments);
        TemporalResolver::with_now(fixed_now()).resolve(&mut output.entities, &segments);
        output.entities
    }

    #[test]
    fn numeric_ago_becomes_negative_relative_offset() {
        let entities = resolve("the chest pain started 2 hours ago");
        let pain = entities.iter().find(|e| e.name == "pain").unwrap();
        assert!(pain.temporal_anchors.iter().any(|a| matches!(
            a.expression,
            TemporalExpression::Relative { offset_seconds: -7200, .. }
        ) && a.event_kind == EventKind::Onset));
    }

    #[test]
    fn spelled_out_hour_ago_resolves() {
        let entities = resolve("headache started an hour ago");
        let headache = entities.iter().find(|e| e.name == "headache").unwrap();
        assert!(headache.temporal_anchors.iter().any(|a| matches!(
            a.expression,
            TemporalExpression::Relative { offset_seconds: -3600, .. }
        )));
    }

    #[test]
    fn for_phrase_becomes_duration() {
        let entities = resolve("I have had abdominal pain for 12 hours");
        let pain = entities.iter().find(|e| e.name == "pain").unwrap();
        assert!(pain.temporal_anchors.iter().any(|a| matches!(
            a.expression,
            TemporalExpression::Duration { seconds: 43_200 }
        )));
    }

    #[test]
    fn yesterday_becomes_absolute_date() {
        let entities = resolve("the fever started yesterday");
        let fever = entities.iter().find(|e| e.name == "fever").unwrap();
        let expected = (fixed_now() - chrono::Duration::days(1)).date_naive();
        assert!(fever
            .temporal_anchors
            .iter()
            .any(|a| a.expression == TemporalExpression::Absolute { date: expected }));
    }

    #[test]
    fn worsening_cue_becomes_worsening_event() {
        let entities = resolve("the nausea is getting worse");
        let nausea = entities.iter().find(|e| e.name == "nausea").unwrap();
        assert!(nausea
            .temporal_anchors
            .iter()
            .any(|a| a.event_kind == EventKind::Worsening));
    }

    #[test]
    fn unresolvable_phrase_stays_descriptive() {
        let entities = resolve("the dizziness started a while ago");
        let dizziness = entities.iter().find(|e| e.name == "dizziness").unwrap();
        assert!(dizziness.temporal_anchors.iter().any(|a| {
            a.expression
                == TemporalExpression::Descriptive {
                    text: "a while ago".to_string(),
                }
        }));
    }

    #[test]
    fn anchors_are_not_duplicated_per_entity() {
        // Two mentions in the same segment must not double the anchor.
        let entities = resolve("chest pain and more chest pain 2 hours ago");
        let pain = entities.iter().find(|e| e.name == "pain").unwrap();
        assert_eq!(pain.temporal_anchors.len(), 1);
    }

    #[test]
    fn segment_without_time_words_adds_no_anchors() {
        let entities = resolve("I have a cough");
        let cough = entities.iter().find(|e| e.name == "cough").unwrap();
        assert!(cough.temporal_anchors.is_empty());
    }

    #[test]
    fn resolve_time_expression_subtracts_offset() {
        let now = fixed_now();
        assert_eq!(
            resolve_time_expression("3 days ago", now),
            Some(now - chrono::Duration::days(3))
        );
        assert_eq!(resolve_time_expression("yesterday evening", now), Some(now - chrono::Duration::days(1)));
        assert_eq!(resolve_time_expression("sometime", now), None);
    }

    #[test]
    fn extract_duration_parses_for_phrases() {
        assert_eq!(
            extract_duration("coughing for the past 3 days"),
            Some(chrono::Duration::days(3))
        );
        assert_eq!(extract_duration("no duration here"), None);
    }

    #[test]
    fn extract_frequency_canonicalizes() {
        assert_eq!(extract_frequency("twice a day").as_deref(), Some("BID"));
        assert_eq!(extract_frequency("every 8 hours").as_deref(), Some("Q8H"));
        assert_eq!(extract_frequency("whenever").as_deref(), None);
    }
}
