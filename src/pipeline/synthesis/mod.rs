//! Clinical note synthesis from the resolved entity graph.
//!
//! Assembly is clause-based: a clause only appears when its backing
//! attribute exists, so a sparse transcript produces a short honest note
//! instead of one padded with empty phrases.

pub mod emr;
pub mod types;

use crate::pipeline::extraction::types::{
    AttributeKey, AttributeValue, DeniedFinding, Entity, EntityType, EventKind,
    StructuredMedication, TemporalExpression,
};

pub use types::{ClinicalNote, QualityMetrics};

const NO_MEDICATIONS: &str = "None documented";
const NO_ALLERGIES: &str = "NKDA";
const NO_EXAM: &str = "No exam findings documented";
const NO_COMPLAINT: &str = "Not documented";

pub fn synthesize(
    entities: &[Entity],
    medications: &[StructuredMedication],
    denied: &[DeniedFinding],
) -> ClinicalNote {
    let primary = primary_symptom(entities);

    ClinicalNote {
        chief_complaint: chief_complaint(primary),
        hpi: hpi(entities, primary, denied),
        medications: medication_section(medications),
        allergies: allergy_section(entities, denied),
        physical_exam: exam_section(entities),
        quality_metrics: QualityMetrics {
            completeness: completeness(entities, medications, denied),
            confidence: mean_confidence(entities),
            specificity: specificity(primary),
        },
    }
}

/// Highest-confidence symptom. Ties go to the earliest first mention,
/// then to the one with more captured attributes; remaining ties keep
/// extraction order.
fn primary_symptom(entities: &[Entity]) -> Option<&Entity> {
    let mut best: Option<&Entity> = None;
    for entity in entities
        .iter()
        .filter(|e| e.entity_type == EntityType::Symptom)
    {
        let Some(current) = best else {
            best = Some(entity);
            continue;
        };
        let replace = entity.confidence > current.confidence
            || (entity.confidence == current.confidence
                && (first_mention(entity) < first_mention(current)
                    || (first_mention(entity) == first_mention(current)
                        && entity.attributes.len() > current.attributes.len())));
        if replace {
            best = Some(entity);
        }
    }
    best
}

fn first_mention(entity: &Entity) -> usize {
    entity
        .mentions
        .iter()
        .map(|m| m.segment_index)
        .min()
        .unwrap_or(usize::MAX)
}

fn chief_complaint(primary: Option<&Entity>) -> String {
    let Some(entity) = primary else {
        return NO_COMPLAINT.to_string();
    };
    match entity
        .attribute(AttributeKey::Location)
        .and_then(|v| v.as_text())
    {
        // "chest" + "pain" reads as "chest pain"; "head" + "headache"
        // must not double up.
        Some(location) if !entity.name.contains(location) => {
            format!("{location} {}", entity.name)
        }
        _ => entity.name.clone(),
    }
}

fn hpi(entities: &[Entity], primary: Option<&Entity>, denied: &[DeniedFinding]) -> String {
    let Some(entity) = primary else {
        return denied_sentence(denied).unwrap_or_else(|| NO_COMPLAINT.to_string());
    };

    let mut clauses = vec![format!("Patient reports {}", chief_complaint(Some(entity)))];

    if let Some(onset) = onset_clause(entity) {
        clauses.push(onset);
    }
    if let Some(quality) = entity
        .attribute(AttributeKey::Quality)
        .and_then(|v| v.as_text())
    {
        clauses.push(format!("{quality} in character"));
    }
    match entity.attribute(AttributeKey::Severity) {
        Some(AttributeValue::Integer(rating)) => clauses.push(format!("rated {rating}/10")),
        Some(AttributeValue::Text(word)) => clauses.push(format!("described as {word}")),
        _ => {}
    }
    if let Some(targets) = entity
        .attribute(AttributeKey::Radiation)
        .and_then(|v| v.as_list())
    {
        if !targets.is_empty() {
            clauses.push(format!("radiating to {}", join_and(targets)));
        }
    }
    if let Some(course) = course_clause(entity) {
        clauses.push(course);
    }
    let associated: Vec<String> = entities
        .iter()
        .filter(|e| e.entity_type == EntityType::Symptom && e.id != entity.id)
        .map(|e| e.name.clone())
        .collect();
    if !associated.is_empty() {
        clauses.push(format!("associated with {}", join_and(&associated)));
    }

    let mut out = clauses.join(", ");
    out.push('.');
    if let Some(denied) = denied_sentence(denied) {
        out.push(' ');
        out.push_str(&denied);
    }
    out
}

fn onset_clause(entity: &Entity) -> Option<String> {
    entity
        .temporal_anchors
        .iter()
        .find(|a| a.event_kind == EventKind::Onset)
        .map(|anchor| match &anchor.expression {
            TemporalExpression::Relative { offset_seconds, .. } => {
                format!("beginning {} ago", humanize_seconds(offset_seconds.unsigned_abs()))
            }
            TemporalExpression::Duration { seconds } => {
                format!("ongoing for {}", humanize_seconds(seconds.unsigned_abs()))
            }
            TemporalExpression::Absolute { date } => format!("beginning {date}"),
            TemporalExpression::Descriptive { text } => format!("beginning {text}"),
        })
}

fn course_clause(entity: &Entity) -> Option<String> {
    entity
        .temporal_anchors
        .iter()
        .find_map(|a| match a.event_kind {
            EventKind::Worsening => Some("worsening".to_string()),
            EventKind::Improvement => Some("improving".to_string()),
            _ => None,
        })
}

fn denied_sentence(denied: &[DeniedFinding]) -> Option<String> {
    let names: Vec<&str> = denied
        .iter()
        .filter(|d| d.entity_type == EntityType::Symptom)
        .map(|d| d.name.as_str())
        .collect();
    if names.is_empty() {
        return None;
    }
    Some(format!("Denies {}.", names.join(", ")))
}

fn medication_section(medications: &[StructuredMedication]) -> String {
    if medications.is_empty() {
        return NO_MEDICATIONS.to_string();
    }
    medications
        .iter()
        .map(|med| {
            let mut line = format!("- {}", med.name);
            if let Some(dose) = &med.dose {
                line.push(' ');
                line.push_str(dose);
                if let Some(unit) = &med.unit {
                    line.push(' ');
                    line.push_str(unit);
                }
            }
            if let Some(route) = &med.route {
                line.push(' ');
                line.push_str(route);
            }
            if let Some(frequency) = &med.frequency {
                line.push(' ');
                line.push_str(frequency);
            }
            if let Some(indication) = &med.indication {
                line.push_str(&format!(" (for {indication})"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn allergy_section(entities: &[Entity], denied: &[DeniedFinding]) -> String {
    let allergies: Vec<&Entity> = entities
        .iter()
        .filter(|e| e.entity_type == EntityType::Allergy)
        .collect();
    if allergies.is_empty() {
        // NKDA whether stated outright or nothing was said; a denied
        // allergen list also collapses to it.
        let _ = denied;
        return NO_ALLERGIES.to_string();
    }
    allergies
        .iter()
        .map(|entity| {
            let mut line = format!("- {}", entity.name);
            if let Some(reaction) = entity
                .attribute(AttributeKey::Reaction)
                .and_then(|v| v.as_text())
            {
                line.push_str(&format!(" (reaction: {reaction})"));
            }
            if let Some(severity) = entity
                .attribute(AttributeKey::Severity)
                .and_then(|v| v.as_text())
            {
                line.push_str(&format!(" - {severity}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn exam_section(entities: &[Entity]) -> String {
    let findings: Vec<String> = entities
        .iter()
        .filter(|e| e.entity_type == EntityType::Finding)
        .map(|entity| {
            let value = entity
                .attribute(AttributeKey::Value)
                .and_then(|v| v.as_text())
                .unwrap_or("documented");
            match entity
                .attribute(AttributeKey::Unit)
                .and_then(|v| v.as_text())
            {
                Some(unit) => format!("{}: {value} {unit}", entity.name),
                None => format!("{}: {value}", entity.name),
            }
        })
        .collect();
    if findings.is_empty() {
        NO_EXAM.to_string()
    } else {
        findings.join("\n")
    }
}

fn completeness(
    entities: &[Entity],
    medications: &[StructuredMedication],
    denied: &[DeniedFinding],
) -> f32 {
    let has = |t: EntityType| entities.iter().any(|e| e.entity_type == t);
    let allergy_documented =
        has(EntityType::Allergy) || denied.iter().any(|d| d.entity_type == EntityType::Allergy);

    let mut score: f32 = 0.0;
    if has(EntityType::Symptom) {
        score += 0.2;
    }
    if !medications.is_empty() {
        score += 0.15;
    }
    if allergy_documented {
        score += 0.15;
    }
    if has(EntityType::Finding) {
        score += 0.2;
    }
    if has(EntityType::MedicalHistory) || has(EntityType::FamilyHistory) {
        score += 0.15;
    }
    if has(EntityType::SocialHistory) {
        score += 0.15;
    }
    score.min(1.0)
}

fn mean_confidence(entities: &[Entity]) -> f32 {
    if entities.is_empty() {
        return 0.0;
    }
    entities.iter().map(|e| e.confidence).sum::<f32>() / entities.len() as f32
}

/// OLDCARTS coverage: onset, location, duration, character, aggravating
/// course, radiation, timing, severity. Eight checks, equal weight.
fn specificity(primary: Option<&Entity>) -> f32 {
    let Some(entity) = primary else {
        return 0.0;
    };
    let has_attr = |key: AttributeKey| entity.attribute(key).is_some();
    let has_onset = entity
        .temporal_anchors
        .iter()
        .any(|a| a.event_kind == EventKind::Onset);
    let has_duration = entity
        .temporal_anchors
        .iter()
        .any(|a| matches!(a.expression, TemporalExpression::Duration { .. }));
    let has_course = entity.temporal_anchors.iter().any(|a| {
        matches!(a.event_kind, EventKind::Worsening | EventKind::Improvement)
    });
    let has_timing = !entity.temporal_anchors.is_empty();

    let checks = [
        has_onset,
        has_attr(AttributeKey::Location),
        has_duration,
        has_attr(AttributeKey::Quality),
        has_course,
        has_attr(AttributeKey::Radiation),
        has_timing,
        has_attr(AttributeKey::Severity),
    ];
    checks.iter().filter(|&&c| c).count() as f32 / checks.len() as f32
}

fn humanize_seconds(seconds: u64) -> String {
    let (value, unit) = if seconds >= 86_400 && seconds % 86_400 == 0 {
        (seconds / 86_400, "day")
    } else if seconds >= 3_600 {
        (seconds / 3_600, "hour")
    } else {
        (seconds.max(60) / 60, "minute")
    };
    if value == 1 {
        format!("1 {unit}")
    } else {
        format!("{value} {unit}s")
    }
}

fn join_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [a, b] => format!("{a} and {b}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::pipeline::extraction::EntityExtractor;
    use crate::pipeline::reference::ReferenceResolver;
    use crate::pipeline::segment::segment;
    use crate::pipeline::temporal::TemporalResolver;
    use std::time::Duration;

    fn note(text: &str) -> ClinicalNote {
        let segments = segment(text, Duration::from_secs(5));
        let mut output = EntityExtractor::new(&EngineConfig::default()).extract(&segments);
        ReferenceResolver::new().resolve(&mut output.entities, &segments);
        TemporalResolver::default().resolve(&mut output.entities, &segments);
        synthesize(&output.entities, &output.medications, &output.denied)
    }

    #[test]
    fn chief_complaint_combines_location_and_name() {
        let produced = note("I have sharp chest pain rated 8 out of 10");
        assert_eq!(produced.chief_complaint, "chest pain");
        assert!(produced.hpi.contains("sharp in character"));
        assert!(produced.hpi.contains("rated 8/10"));
    }

    #[test]
    fn headache_location_is_not_doubled() {
        let produced = note("I have a severe headache");
        assert_eq!(produced.chief_complaint, "headache");
    }

    #[test]
    fn hpi_includes_radiation_and_duration() {
        let produced = note("severe abdominal pain for 12 hours, it moved to my right lower side");
        assert!(produced.hpi.contains("ongoing for 12 hours"));
        assert!(produced.hpi.contains("radiating to right lower quadrant"));
    }

    #[test]
    fn hpi_orders_onset_before_character_and_radiation() {
        let produced = note("sharp chest pain for 2 hours radiating to my left arm");
        let onset = produced.hpi.find("ongoing for 2 hours").unwrap();
        let character = produced.hpi.find("sharp in character").unwrap();
        let radiation = produced.hpi.find("radiating to").unwrap();
        assert!(onset < character);
        assert!(character < radiation);
    }

    #[test]
    fn associated_symptoms_listed_in_hpi() {
        let produced = note("I have chest pain and I feel nauseous and dizzy");
        assert!(produced.hpi.contains("associated with nausea and dizziness"));
    }

    #[test]
    fn denied_findings_appear_in_hpi() {
        let produced = note("I have a cough. No fever though");
        assert!(produced.hpi.contains("Denies fever."));
    }

    #[test]
    fn medication_lines_include_sig() {
        let produced = note("chest pain today\nI take metformin 500 mg by mouth twice a day for diabetes");
        assert!(produced.medications.contains("- metformin 500 mg oral BID (for diabetes)"));
    }

    #[test]
    fn empty_sections_use_fallback_strings() {
        let produced = note("we chatted about the weather for a while");
        assert_eq!(produced.chief_complaint, "Not documented");
        assert_eq!(produced.medications, "None documented");
        assert_eq!(produced.allergies, "NKDA");
        assert_eq!(produced.physical_exam, "No exam findings documented");
        assert_eq!(produced.quality_metrics.completeness, 0.0);
        assert_eq!(produced.quality_metrics.confidence, 0.0);
        assert_eq!(produced.quality_metrics.specificity, 0.0);
    }

    #[test]
    fn allergy_section_lists_reaction_and_severity() {
        let produced = note("I'm allergic to penicillin, I get hives");
        assert!(produced.allergies.contains("- penicillin (reaction: hives)"));
    }

    #[test]
    fn exam_section_reports_vitals() {
        let produced = note("your blood pressure is 150 over 90");
        assert!(produced.physical_exam.contains("blood pressure: 150/90 mmHg"));
    }

    #[test]
    fn completeness_grows_with_documented_sections() {
        let sparse = note("I have chest pain");
        let rich = note(
            "I have chest pain\nI take aspirin daily\nallergic to penicillin\nblood pressure 120/80\nhistory of hypertension\nI am a smoker",
        );
        assert!(rich.quality_metrics.completeness > sparse.quality_metrics.completeness);
        assert!(rich.quality_metrics.completeness > 0.99);
    }

    #[test]
    fn metrics_stay_in_unit_range() {
        let produced = note("chest pain radiating to my left arm for 2 hours, sharp, 7/10, getting worse");
        let metrics = produced.quality_metrics;
        for value in [metrics.completeness, metrics.confidence, metrics.specificity] {
            assert!((0.0..=1.0).contains(&value));
        }
        assert!(metrics.specificity >= 0.75);
    }
}
