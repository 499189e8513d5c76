//! Clinical note output types.

use serde::{Deserialize, Serialize};

/// Scores describing how much of the note is actually backed by the
/// transcript. All values sit in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Fraction of note sections with documented content.
    pub completeness: f32,
    /// Mean extraction confidence across all entities.
    pub confidence: f32,
    /// OLDCARTS coverage of the primary symptom.
    pub specificity: f32,
}

/// The synthesized note. Sections with nothing documented carry an
/// explicit fallback string, never an empty one — a blank section in a
/// chart reads as an omission, not an absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalNote {
    pub chief_complaint: String,
    pub hpi: String,
    pub medications: String,
    pub allergies: String,
    pub physical_exam: String,
    pub quality_metrics: QualityMetrics,
}
