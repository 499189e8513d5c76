//! Vital-sign extraction: spoken or dictated measurements become
//! `Finding` entities with a value and unit.

use std::sync::LazyLock;

use regex::Regex;

use crate::pipeline::segment::Segment;

use super::types::{AttributeKey, AttributeValue, EntityType, Mention, ReferenceKind};
use super::{ClaimedSpans, EntitySink};

struct VitalPattern {
    regex: Regex,
    name: &'static str,
}

fn vital(pattern: &str, name: &'static str) -> VitalPattern {
    VitalPattern {
        regex: Regex::new(pattern).expect("Invalid vital-sign pattern"),
        name,
    }
}

/// Blood pressure is matched separately — it needs two captures.
static BLOOD_PRESSURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:blood\s+pressure|bp)(?:\s+(?:is|was|of|at))?\s*:?\s*(\d{2,3})\s*(?:/|over)\s*(\d{2,3})")
        .expect("Invalid blood pressure pattern")
});

static SINGLE_VALUE_VITALS: LazyLock<Vec<VitalPattern>> = LazyLock::new(|| {
    vec![
        vital(
            r"(?:heart\s+rate|pulse|hr)(?:\s+(?:is|was|of|at))?\s*:?\s*(\d{2,3})\b",
            "heart rate",
        ),
        vital(
            r"(?:temp(?:erature)?|fever\s+of)(?:\s+(?:is|was|of|at))?\s*:?\s*(\d{2,3}(?:\.\d)?)\b",
            "temperature",
        ),
        vital(
            r"(?:o2\s+sat(?:uration)?|oxygen\s+saturation|sats?)(?:\s+(?:is|was|of|at))?\s*:?\s*(\d{2,3})\s*%?",
            "oxygen saturation",
        ),
        vital(
            r"(?:respiratory\s+rate|breathing\s+rate)(?:\s+(?:is|was|of|at))?\s*:?\s*(\d{1,2})\b",
            "respiratory rate",
        ),
    ]
});

pub(crate) fn scan(
    segment: &Segment,
    lower: &str,
    claimed: &mut ClaimedSpans,
    sink: &mut EntitySink,
) {
    if let Some(caps) = BLOOD_PRESSURE_RE.captures(lower) {
        let range = caps
            .get(0)
            .map(|m| m.start()..m.end())
            .unwrap_or_default();
        // Both numbers must parse or the finding is dropped entirely.
        let parsed = caps[1].parse::<u16>().ok().zip(caps[2].parse::<u16>().ok());
        if !claimed.is_claimed(&range) {
            if let Some((systolic, diastolic)) = parsed {
                claimed.claim(range.clone());
                let index = sink.entity_mut(EntityType::Finding, "blood pressure");
                let entity = &mut sink.entities[index];
                entity.set_attribute(
                    AttributeKey::Value,
                    AttributeValue::Text(format!("{systolic}/{diastolic}")),
                );
                entity.set_attribute(AttributeKey::Unit, AttributeValue::Text("mmHg".into()));
                entity.mentions.push(Mention {
                    segment_index: segment.sequence_index,
                    span: range,
                    reference_kind: ReferenceKind::Direct,
                });
            }
        }
    }

    for pattern in SINGLE_VALUE_VITALS.iter() {
        let Some(caps) = pattern.regex.captures(lower) else {
            continue;
        };
        let range = caps
            .get(0)
            .map(|m| m.start()..m.end())
            .unwrap_or_default();
        if claimed.is_claimed(&range) {
            continue;
        }
        // Malformed numeric capture: omit the finding, no sentinel.
        let Ok(value) = caps[1].parse::<f64>() else {
            continue;
        };
        claimed.claim(range.clone());

        let index = sink.entity_mut(EntityType::Finding, pattern.name);
        let entity = &mut sink.entities[index];
        entity.set_attribute(AttributeKey::Value, AttributeValue::Text(caps[1].to_string()));
        if let Some(unit) = unit_for(pattern.name, value) {
            entity.set_attribute(AttributeKey::Unit, AttributeValue::Text(unit.into()));
        }
        entity.mentions.push(Mention {
            segment_index: segment.sequence_index,
            span: range,
            reference_kind: ReferenceKind::Direct,
        });
    }
}

fn unit_for(name: &str, value: f64) -> Option<&'static str> {
    match name {
        "heart rate" => Some("bpm"),
        // Spoken temperatures are unit-less; infer the scale.
        "temperature" => Some(if value >= 45.0 { "F" } else { "C" }),
        "oxygen saturation" => Some("%"),
        "respiratory rate" => Some("breaths/min"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::EntityExtractor;
    use crate::pipeline::segment::segment;
    use crate::EngineConfig;
    use std::time::Duration;

    fn findings(text: &str) -> Vec<crate::pipeline::extraction::types::Entity> {
        let segments = segment(text, Duration::from_secs(5));
        EntityExtractor::new(&EngineConfig::default())
            .extract(&segments)
            .entities
            .into_iter()
            .filter(|e| e.entity_type == EntityType::Finding)
            .collect()
    }

    #[test]
    fn blood_pressure_over_phrasing() {
        let found = findings("your blood pressure is 150 over 90 today");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "blood pressure");
        assert_eq!(
            found[0].attribute(AttributeKey::Value).unwrap().as_text(),
            Some("150/90")
        );
        assert_eq!(
            found[0].attribute(AttributeKey::Unit).unwrap().as_text(),
            Some("mmHg")
        );
    }

    #[test]
    fn blood_pressure_slash_phrasing() {
        let found = findings("BP 120/80");
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].attribute(AttributeKey::Value).unwrap().as_text(),
            Some("120/80")
        );
    }

    #[test]
    fn heart_rate_and_saturation() {
        let found = findings("heart rate is 112, oxygen saturation 91%");
        assert!(found.iter().any(|e| e.name == "heart rate"
            && e.attribute(AttributeKey::Value).unwrap().as_text() == Some("112")));
        assert!(found.iter().any(|e| e.name == "oxygen saturation"
            && e.attribute(AttributeKey::Unit).unwrap().as_text() == Some("%")));
    }

    #[test]
    fn temperature_scale_inferred() {
        let fahrenheit = findings("temperature of 101.5");
        assert_eq!(
            fahrenheit[0].attribute(AttributeKey::Unit).unwrap().as_text(),
            Some("F")
        );
        let celsius = findings("temperature 38.5");
        assert_eq!(
            celsius[0].attribute(AttributeKey::Unit).unwrap().as_text(),
            Some("C")
        );
    }

    #[test]
    fn no_vitals_no_findings() {
        assert!(findings("I feel okay today, just tired").is_empty());
    }
}
