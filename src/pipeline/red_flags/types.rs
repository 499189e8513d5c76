//! Red-flag output types.

use serde::{Deserialize, Serialize};

/// Time-critical clinical presentations the scorer screens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedFlagCategory {
    Stemi,
    Stroke,
    SubarachnoidHemorrhage,
    AorticDissection,
    PulmonaryEmbolism,
    Sepsis,
    RupturedAaa,
    Meningitis,
    BowelPerforation,
    DiabeticKetoacidosis,
    Anaphylaxis,
    StatusAsthmaticus,
    GiBleed,
    EctopicPregnancy,
    TensionPneumothorax,
}

impl RedFlagCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stemi => "Acute coronary syndrome / STEMI",
            Self::Stroke => "Acute stroke",
            Self::SubarachnoidHemorrhage => "Subarachnoid hemorrhage",
            Self::AorticDissection => "Aortic dissection",
            Self::PulmonaryEmbolism => "Pulmonary embolism",
            Self::Sepsis => "Sepsis",
            Self::RupturedAaa => "Ruptured abdominal aortic aneurysm",
            Self::Meningitis => "Bacterial meningitis",
            Self::BowelPerforation => "Bowel perforation / peritonitis",
            Self::DiabeticKetoacidosis => "Diabetic ketoacidosis",
            Self::Anaphylaxis => "Anaphylaxis",
            Self::StatusAsthmaticus => "Status asthmaticus",
            Self::GiBleed => "Gastrointestinal bleed",
            Self::EctopicPregnancy => "Ectopic pregnancy",
            Self::TensionPneumothorax => "Tension pneumothorax",
        }
    }
}

/// How fast the presentation needs eyes on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Urgent,
    Warning,
}

/// One raised alert. `findings` names the evidence patterns that fired;
/// `confidence` is the capped evidence weight sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    pub category: RedFlagCategory,
    pub severity: Severity,
    pub findings: Vec<String>,
    pub confidence: f32,
    pub recommendation: String,
}
