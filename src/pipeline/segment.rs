//! Transcript segmentation: line split, speaker tagging, fallback timing.
//!
//! Real timing and speaker labels, when the upstream transcriber supplies
//! them, arrive through `Pipeline::process_segments`; everything here is
//! the best-effort fallback for plain text.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Who said a segment, as far as the heuristic can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Doctor,
    Patient,
    Nurse,
    Family,
    Unknown,
}

/// One ordered line of the transcript. Immutable once created;
/// `sequence_index` is the timeline base unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub speaker: Speaker,
    pub sequence_index: usize,
    pub timestamp: Duration,
}

/// Cue phrases for the keyword speaker classifier.
static DOCTOR_CUES: &[&str] = &[
    "let me", "i recommend", "we'll", "we will", "i'm going to order",
    "on exam", "i'd like to", "your blood pressure",
];

static PATIENT_CUES: &[&str] = &[
    "i have", "i've had", "i feel", "i've been", "my pain", "it hurts",
    "i can't", "i'm having", "i took", "i get",
];

static NURSE_CUES: &[&str] = &["vitals are", "i'll get the", "the doctor will"];

static FAMILY_CUES: &[&str] = &["my husband", "my wife", "my mother", "my father", "he said", "she said"];

/// Split raw transcript text into ordered segments with best-effort
/// speaker labels and synthetic monotonic timestamps. Pure function.
pub fn segment(raw_text: &str, spacing: Duration) -> Vec<Segment> {
    let mut segments = Vec::new();

    for line in raw_text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (speaker, text) = split_speaker_prefix(line);
        let speaker = speaker.unwrap_or_else(|| classify_speaker(text));
        let sequence_index = segments.len();

        segments.push(Segment {
            text: text.to_string(),
            speaker,
            sequence_index,
            timestamp: spacing * sequence_index as u32,
        });
    }

    segments
}

/// Honor explicit "Doctor: ..." / "Patient: ..." prefixes before falling
/// back to the keyword classifier.
fn split_speaker_prefix(line: &str) -> (Option<Speaker>, &str) {
    let Some((prefix, rest)) = line.split_once(':') else {
        return (None, line);
    };
    let speaker = match prefix.trim().to_lowercase().as_str() {
        "doctor" | "dr" | "physician" | "provider" => Speaker::Doctor,
        "patient" | "pt" => Speaker::Patient,
        "nurse" | "rn" => Speaker::Nurse,
        "family" | "spouse" | "caregiver" => Speaker::Family,
        _ => return (None, line),
    };
    (Some(speaker), rest.trim())
}

fn classify_speaker(text: &str) -> Speaker {
    let lower = text.to_lowercase();
    let score = |cues: &[&str]| cues.iter().filter(|cue| lower.contains(*cue)).count();

    let candidates = [
        (Speaker::Doctor, score(DOCTOR_CUES)),
        (Speaker::Patient, score(PATIENT_CUES)),
        (Speaker::Nurse, score(NURSE_CUES)),
        (Speaker::Family, score(FAMILY_CUES)),
    ];

    candidates
        .iter()
        .filter(|(_, n)| *n > 0)
        .max_by_key(|(_, n)| *n)
        .map(|(speaker, _)| *speaker)
        .unwrap_or(Speaker::Unknown)
}
