//! The comprehension pipeline: normalization, segmentation, extraction,
//! reference and temporal resolution, red-flag screening, and note
//! synthesis, in that order.
//!
//! Every stage is pure and synchronous. The same transcript always
//! produces the same note and the same flags.

pub mod extraction;
pub mod negation;
pub mod red_flags;
pub mod reference;
pub mod segment;
pub mod synthesis;
pub mod temporal;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

use extraction::normalize::correct_medical_terms;
use extraction::types::{DeniedFinding, Entity, StructuredMedication};
use extraction::EntityExtractor;
use red_flags::types::RedFlag;
use red_flags::RedFlagScorer;
use reference::ReferenceResolver;
use segment::Segment;
use synthesis::ClinicalNote;
use temporal::TemporalResolver;

/// Everything one run produces. Intermediate artifacts are kept so
/// callers can render a timeline or audit a flag without re-running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub segments: Vec<Segment>,
    pub entities: Vec<Entity>,
    pub denied: Vec<DeniedFinding>,
    pub medications: Vec<StructuredMedication>,
    pub red_flags: Vec<RedFlag>,
    pub note: ClinicalNote,
}

#[derive(Default)]
pub struct Pipeline {
    config: EngineConfig,
}

impl Pipeline {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Process raw transcript text end to end.
    pub fn process(&self, raw_text: &str) -> PipelineOutput {
        let normalized = correct_medical_terms(raw_text);
        let segments = segment::segment(&normalized, self.config.segment_spacing);
        tracing::info!(segments = segments.len(), "Transcript segmented");
        self.process_segments(segments)
    }

    /// Process pre-segmented input, e.g. from a transcriber that supplies
    /// real speaker labels and timestamps.
    pub fn process_segments(&self, segments: Vec<Segment>) -> PipelineOutput {
        let mut output = EntityExtractor::new(&self.config).extract(&segments);
        ReferenceResolver::new().resolve(&mut output.entities, &segments);
        TemporalResolver::default().resolve(&mut output.entities, &segments);

        let joined = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let red_flags = RedFlagScorer::new(&self.config).score(&joined);

        let note = synthesis::synthesize(&output.entities, &output.medications, &output.denied);

        tracing::info!(
            entities = output.entities.len(),
            red_flags = red_flags.len(),
            completeness = note.quality_metrics.completeness,
            "Pipeline run complete"
        );

        PipelineOutput {
            segments,
            entities: output.entities,
            denied: output.denied,
            medications: output.medications,
            red_flags,
            note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::types::{AttributeKey, EntityType, TemporalExpression};
    use crate::pipeline::red_flags::types::RedFlagCategory;
    use crate::pipeline::segment::Speaker;

    fn run(text: &str) -> PipelineOutput {
        Pipeline::default().process(text)
    }

    const ABDOMINAL_VISIT: &str = "\
Doctor: What brings you in today?
Patient: I've had severe abdominal pain for 12 hours. It moved to my right lower side.
Patient: I feel nauseous too but I haven't vomited.";

    const CARDIAC_VISIT: &str = "\
Patient: I have crushing chest pain radiating to my left arm and I'm sweating a lot.
Doctor: Are you short of breath?
Patient: A little. I'm a smoker and diabetic.";

    #[test]
    fn abdominal_visit_builds_structured_note() {
        let output = run(ABDOMINAL_VISIT);

        let pain = output
            .entities
            .iter()
            .find(|e| e.entity_type == EntityType::Symptom && e.name == "pain")
            .unwrap();
        assert_eq!(
            pain.attribute(AttributeKey::Location).unwrap().as_text(),
            Some("abdomen")
        );
        assert_eq!(
            pain.attribute(AttributeKey::Radiation).unwrap().as_list().unwrap(),
            &["right lower quadrant".to_string()]
        );
        assert!(pain.temporal_anchors.iter().any(|a| matches!(
            a.expression,
            TemporalExpression::Duration { seconds: 43_200 }
        )));

        // Denied, not asserted: "haven't vomited".
        assert!(output.denied.iter().any(|d| d.name == "vomiting"));
        assert!(output.entities.iter().all(|e| e.name != "vomiting"));

        // Pain without peritoneal signs stays below every threshold.
        assert!(output.red_flags.is_empty());

        assert_eq!(output.note.chief_complaint, "abdomen pain");
        assert!(output.note.hpi.contains("ongoing for 12 hours"));
        assert!(output.note.hpi.contains("Denies vomiting."));
    }

    #[test]
    fn cardiac_visit_raises_stemi_flag() {
        let output = run(CARDIAC_VISIT);
        assert!(output
            .red_flags
            .iter()
            .any(|f| f.category == RedFlagCategory::Stemi));
        assert_eq!(output.note.chief_complaint, "chest pain");
    }

    #[test]
    fn speaker_prefixes_are_honored() {
        let output = run(ABDOMINAL_VISIT);
        assert_eq!(output.segments[0].speaker, Speaker::Doctor);
        assert_eq!(output.segments[1].speaker, Speaker::Patient);
    }

    #[test]
    fn pronoun_resolves_across_segments() {
        let output = run("Patient: I have chest pain.\nPatient: It radiates to my left arm.");
        let pain = output.entities.iter().find(|e| e.name == "pain").unwrap();
        assert_eq!(
            pain.attribute(AttributeKey::Radiation).unwrap().as_list().unwrap(),
            &["left arm".to_string()]
        );
        assert!(pain.mentions.iter().any(|m| m.segment_index == 1));
    }

    #[test]
    fn long_non_clinical_transcript_yields_empty_note() {
        let sentence = "the quarterly planning meeting ran long and we mostly \
                        talked about the weather and the traffic on the drive over ";
        let transcript = sentence.repeat(40);

        let output = run(&transcript);
        assert!(output.entities.is_empty());
        assert!(output.red_flags.is_empty());
        assert_eq!(output.note.chief_complaint, "Not documented");
        assert_eq!(output.note.medications, "None documented");
        assert_eq!(output.note.allergies, "NKDA");
        assert_eq!(output.note.physical_exam, "No exam findings documented");
        assert_eq!(output.note.quality_metrics.completeness, 0.0);
    }

    #[test]
    fn garbled_terms_are_normalized_before_extraction() {
        let output = run("Patient: I take metfonnin for my diabetes.");
        assert!(output.medications.iter().any(|m| m.name == "metformin"));
    }

    #[test]
    fn pipeline_is_deterministic() {
        let first = run(CARDIAC_VISIT);
        let second = run(CARDIAC_VISIT);
        assert_eq!(first.note, second.note);
        assert_eq!(first.red_flags, second.red_flags);
        assert_eq!(first.denied, second.denied);
        assert_eq!(first.medications, second.medications);
    }

    #[test]
    fn output_serializes_to_json() {
        let output = run(CARDIAC_VISIT);
        let json = serde_json::to_string(&output).unwrap();
        let back: PipelineOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.note, output.note);
        assert_eq!(back.segments.len(), output.segments.len());
    }
}
