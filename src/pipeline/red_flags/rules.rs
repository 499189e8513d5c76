//! The red-flag rule table.
//!
//! Each rule gates on one required finding pattern; supporting patterns
//! add weight. A rule raises only when the weight sum reaches its
//! threshold, so a lone required finding ("abdominal pain") is screened
//! in but not alerted on. Keywords are matched lowercase against the
//! full transcript with negation applied per keyword.

use super::types::{RedFlagCategory, Severity};

/// One evidence pattern: any keyword match fires it once for `weight`.
pub struct FindingPattern {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
    pub weight: f32,
}

pub struct RedFlagRule {
    pub category: RedFlagCategory,
    pub severity: Severity,
    pub required: FindingPattern,
    pub supporting: &'static [FindingPattern],
    /// Default alert threshold; deployments may override per category.
    pub threshold: f32,
    pub recommendation: &'static str,
}

const fn pattern(
    label: &'static str,
    keywords: &'static [&'static str],
    weight: f32,
) -> FindingPattern {
    FindingPattern {
        label,
        keywords,
        weight,
    }
}

pub static RULES: &[RedFlagRule] = &[
    RedFlagRule {
        category: RedFlagCategory::Stemi,
        severity: Severity::Critical,
        required: pattern(
            "Chest pain/pressure",
            &["chest pain", "chest pressure", "chest tightness", "crushing chest"],
            0.3,
        ),
        supporting: &[
            pattern(
                "Pain radiation to arm/jaw",
                &[
                    "radiating to my left arm",
                    "radiating to left arm",
                    "radiates to my arm",
                    "left arm",
                    "jaw",
                ],
                0.25,
            ),
            pattern("Diaphoresis", &["diaphoretic", "diaphoresis", "sweating", "drenched in sweat"], 0.15),
            pattern(
                "Shortness of breath",
                &["shortness of breath", "short of breath", "trouble breathing"],
                0.1,
            ),
            pattern("Nausea", &["nausea", "nauseous"], 0.1),
            pattern(
                "Cardiac risk factors",
                &["smoker", "diabetic", "diabetes", "hypertension", "high blood pressure", "high cholesterol"],
                0.15,
            ),
        ],
        threshold: 0.55,
        recommendation: "Immediate ECG, troponin, and emergency cardiology evaluation",
    },
    RedFlagRule {
        category: RedFlagCategory::Stroke,
        severity: Severity::Critical,
        required: pattern(
            "Focal neurologic deficit",
            &[
                "face drooping",
                "facial droop",
                "slurred speech",
                "can't move my arm",
                "weakness on one side",
                "one side of my body",
                "arm weakness",
                "numbness on one side",
            ],
            0.35,
        ),
        supporting: &[
            pattern("Sudden onset", &["suddenly", "all of a sudden", "came on fast"], 0.15),
            pattern("Confusion", &["confused", "confusion"], 0.1),
            pattern("Vision change", &["blurred vision", "blurry vision", "lost vision"], 0.1),
            pattern("Severe headache", &["worst headache", "severe headache"], 0.1),
        ],
        threshold: 0.55,
        recommendation: "Activate stroke protocol; immediate non-contrast head CT",
    },
    RedFlagRule {
        category: RedFlagCategory::SubarachnoidHemorrhage,
        severity: Severity::Critical,
        required: pattern(
            "Thunderclap headache",
            &["thunderclap", "worst headache of my life", "worst headache"],
            0.35,
        ),
        supporting: &[
            pattern("Sudden onset", &["sudden", "all of a sudden"], 0.15),
            pattern("Neck stiffness", &["stiff neck", "neck stiffness"], 0.15),
            pattern("Vomiting", &["vomiting", "threw up"], 0.1),
            pattern("Light sensitivity", &["photophobia", "light hurts"], 0.1),
        ],
        threshold: 0.6,
        recommendation: "Emergent non-contrast head CT; lumbar puncture if negative",
    },
    RedFlagRule {
        category: RedFlagCategory::AorticDissection,
        severity: Severity::Critical,
        required: pattern("Tearing chest or back pain", &["tearing", "ripping"], 0.35),
        supporting: &[
            pattern(
                "Radiation to back",
                &["radiating to my back", "goes to my back", "between the shoulder blades", "shoulder blades"],
                0.2,
            ),
            pattern("Sudden maximal onset", &["sudden", "all of a sudden"], 0.15),
            pattern("Hypertension history", &["hypertension", "high blood pressure"], 0.1),
        ],
        threshold: 0.6,
        recommendation: "Emergent CT angiography; aggressive blood pressure control",
    },
    RedFlagRule {
        category: RedFlagCategory::PulmonaryEmbolism,
        severity: Severity::Critical,
        required: pattern(
            "Pleuritic or sudden dyspnea",
            &["hurts to breathe", "pain when i breathe", "sudden shortness of breath", "short of breath"],
            0.3,
        ),
        supporting: &[
            pattern("Chest pain", &["chest pain"], 0.15),
            pattern(
                "Leg swelling",
                &["leg swelling", "swollen leg", "calf pain", "calf swelling"],
                0.2,
            ),
            pattern(
                "Recent immobilization",
                &["long flight", "surgery", "bed rest", "bedridden"],
                0.15,
            ),
            pattern("Hemoptysis", &["coughing up blood", "blood in my sputum"], 0.2),
        ],
        threshold: 0.55,
        recommendation: "CT pulmonary angiogram; risk-stratify and consider anticoagulation",
    },
    RedFlagRule {
        category: RedFlagCategory::Sepsis,
        severity: Severity::Critical,
        required: pattern("Fever", &["fever", "chills", "high temperature"], 0.25),
        supporting: &[
            pattern("Confusion", &["confused", "confusion"], 0.2),
            pattern("Rapid heart rate", &["heart racing", "racing heart", "heart is pounding"], 0.15),
            pattern("Hypotension", &["low blood pressure", "blood pressure dropping"], 0.2),
            pattern("Infection source", &["infection", "uti", "pneumonia", "wound"], 0.2),
        ],
        threshold: 0.55,
        recommendation: "Sepsis workup: blood cultures, lactate, early broad-spectrum antibiotics",
    },
    RedFlagRule {
        category: RedFlagCategory::RupturedAaa,
        severity: Severity::Critical,
        required: pattern(
            "Severe abdominal or back pain",
            &["severe abdominal pain", "severe back pain"],
            0.3,
        ),
        supporting: &[
            pattern("Pulsatile sensation", &["pulsating", "pulsatile", "throbbing in my belly"], 0.25),
            pattern("Syncope", &["fainted", "passed out"], 0.2),
            pattern("Known aneurysm", &["aneurysm"], 0.25),
        ],
        threshold: 0.6,
        recommendation: "Emergent surgical consult and bedside aortic ultrasound",
    },
    RedFlagRule {
        category: RedFlagCategory::Meningitis,
        severity: Severity::Critical,
        required: pattern("Headache", &["headache"], 0.2),
        supporting: &[
            pattern("Fever", &["fever", "chills"], 0.2),
            pattern("Neck stiffness", &["stiff neck", "neck stiffness"], 0.25),
            pattern("Photophobia", &["photophobia", "light hurts my eyes"], 0.15),
            pattern("Rash", &["rash"], 0.15),
            pattern("Confusion", &["confused", "confusion"], 0.1),
        ],
        threshold: 0.6,
        recommendation: "Lumbar puncture after head CT; do not delay empiric antibiotics",
    },
    RedFlagRule {
        category: RedFlagCategory::BowelPerforation,
        severity: Severity::Critical,
        required: pattern(
            "Severe abdominal pain",
            &["severe abdominal pain", "severe stomach pain"],
            0.3,
        ),
        supporting: &[
            pattern("Rigid abdomen", &["rigid", "board-like"], 0.25),
            pattern("Rebound tenderness", &["rebound"], 0.2),
            pattern("Fever", &["fever"], 0.1),
            pattern("Distension", &["distended", "swollen belly"], 0.1),
            pattern("Sudden onset", &["sudden"], 0.1),
        ],
        threshold: 0.6,
        recommendation: "Upright chest X-ray for free air; emergent surgical evaluation",
    },
    RedFlagRule {
        category: RedFlagCategory::DiabeticKetoacidosis,
        severity: Severity::Urgent,
        required: pattern("Diabetes context", &["diabetic", "diabetes", "insulin"], 0.25),
        supporting: &[
            pattern(
                "Excessive thirst",
                &["very thirsty", "drinking a lot of water", "excessive thirst"],
                0.15,
            ),
            pattern(
                "Frequent urination",
                &["urinating a lot", "peeing a lot", "frequent urination"],
                0.15,
            ),
            pattern("Vomiting", &["vomiting", "throwing up"], 0.15),
            pattern("Fruity breath", &["fruity breath", "fruity smell"], 0.25),
            pattern("Confusion", &["confused", "confusion"], 0.1),
        ],
        threshold: 0.55,
        recommendation: "Point-of-care glucose and ketones; IV fluids and insulin protocol",
    },
    RedFlagRule {
        category: RedFlagCategory::Anaphylaxis,
        severity: Severity::Critical,
        required: pattern(
            "Allergic exposure",
            &["allergic", "allergy", "bee sting", "ate peanuts", "new medication"],
            0.25,
        ),
        supporting: &[
            pattern(
                "Airway compromise",
                &["throat closing", "throat tightness", "tongue swelling", "tongue is swelling"],
                0.3,
            ),
            pattern("Hives", &["hives", "rash"], 0.15),
            pattern(
                "Wheezing or dyspnea",
                &["wheezing", "trouble breathing", "short of breath"],
                0.2,
            ),
            pattern("Dizziness", &["dizzy", "lightheaded", "faint"], 0.1),
        ],
        threshold: 0.5,
        recommendation: "Intramuscular epinephrine without delay; airway monitoring",
    },
    RedFlagRule {
        category: RedFlagCategory::StatusAsthmaticus,
        severity: Severity::Critical,
        required: pattern("Asthma context", &["asthma", "inhaler"], 0.25),
        supporting: &[
            pattern(
                "Rescue inhaler failing",
                &["inhaler isn't working", "inhaler is not helping", "not helping"],
                0.25,
            ),
            pattern(
                "Cannot speak in sentences",
                &["can't finish a sentence", "can't speak", "gasping"],
                0.25,
            ),
            pattern("Wheezing", &["wheezing"], 0.15),
            pattern("Cyanosis", &["blue lips", "turning blue"], 0.25),
        ],
        threshold: 0.55,
        recommendation: "Continuous nebulizers and systemic steroids; escalate early",
    },
    RedFlagRule {
        category: RedFlagCategory::GiBleed,
        severity: Severity::Urgent,
        required: pattern(
            "Bleeding sign",
            &["vomiting blood", "blood in my stool", "black stool", "black tarry", "coffee ground"],
            0.35,
        ),
        supporting: &[
            pattern("Lightheadedness", &["dizzy", "lightheaded", "faint"], 0.15),
            pattern("Anticoagulant use", &["warfarin", "blood thinner", "apixaban"], 0.2),
            pattern("Abdominal pain", &["abdominal pain", "stomach pain"], 0.1),
        ],
        threshold: 0.55,
        recommendation: "Type and screen, serial hemoglobin, urgent GI consult",
    },
    RedFlagRule {
        category: RedFlagCategory::EctopicPregnancy,
        severity: Severity::Critical,
        required: pattern(
            "Pregnancy context",
            &["pregnant", "missed period", "positive pregnancy test"],
            0.25,
        ),
        supporting: &[
            pattern(
                "Pelvic or lateralized pain",
                &["pelvic pain", "abdominal pain", "one-sided pain", "pain on one side"],
                0.25,
            ),
            pattern("Vaginal bleeding", &["vaginal bleeding", "spotting"], 0.2),
            pattern("Shoulder pain", &["shoulder pain"], 0.15),
            pattern("Dizziness", &["dizzy", "lightheaded", "fainted"], 0.15),
        ],
        threshold: 0.6,
        recommendation: "Quantitative hCG and transvaginal ultrasound",
    },
    RedFlagRule {
        category: RedFlagCategory::TensionPneumothorax,
        severity: Severity::Critical,
        required: pattern(
            "Sudden unilateral chest pain",
            &["sudden chest pain", "one side of my chest", "sharp chest pain"],
            0.3,
        ),
        supporting: &[
            pattern(
                "Severe dyspnea",
                &["can't breathe", "severe shortness of breath", "gasping"],
                0.3,
            ),
            pattern("Trauma context", &["accident", "fell", "injury", "stabbed"], 0.2),
            pattern("Structural lung disease", &["copd", "emphysema"], 0.1),
        ],
        threshold: 0.6,
        recommendation: "Immediate needle decompression if unstable; do not wait for imaging",
    },
];
