//! Clinical term catalogs: symptoms, anatomy, descriptors, negation cues.
//!
//! Pure data. Multi-word phrases must be matched longest-first by callers;
//! the loader in `mod.rs` enforces key uniqueness at build time.

/// A symptom phrase as patients actually say it, mapped to the canonical
/// symptom name used for entity merging. Phrases like "chest pain" carry
/// an implied anatomical location.
#[derive(Debug)]
pub struct SymptomTerm {
    pub phrase: &'static str,
    pub canonical: &'static str,
    pub implied_location: Option<&'static str>,
}

const fn term(
    phrase: &'static str,
    canonical: &'static str,
    implied_location: Option<&'static str>,
) -> SymptomTerm {
    SymptomTerm {
        phrase,
        canonical,
        implied_location,
    }
}

pub static SYMPTOM_TERMS: &[SymptomTerm] = &[
    term("chest pain", "pain", Some("chest")),
    term("chest pressure", "pain", Some("chest")),
    term("chest tightness", "pain", Some("chest")),
    term("abdominal pain", "pain", Some("abdomen")),
    term("stomach pain", "pain", Some("abdomen")),
    term("belly pain", "pain", Some("abdomen")),
    term("stomach ache", "pain", Some("abdomen")),
    term("back pain", "pain", Some("back")),
    term("neck pain", "pain", Some("neck")),
    term("leg pain", "pain", Some("leg")),
    term("arm pain", "pain", Some("arm")),
    term("joint pain", "pain", Some("joint")),
    term("pelvic pain", "pain", Some("pelvis")),
    term("headache", "headache", Some("head")),
    term("migraine", "headache", Some("head")),
    term("pain", "pain", None),
    term("shortness of breath", "shortness of breath", None),
    term("short of breath", "shortness of breath", None),
    term("difficulty breathing", "shortness of breath", None),
    term("trouble breathing", "shortness of breath", None),
    term("nausea", "nausea", None),
    term("nauseous", "nausea", None),
    term("vomiting", "vomiting", None),
    term("vomited", "vomiting", None),
    term("throwing up", "vomiting", None),
    term("diarrhea", "diarrhea", None),
    term("constipation", "constipation", None),
    term("dizziness", "dizziness", None),
    term("dizzy", "dizziness", None),
    term("lightheaded", "dizziness", None),
    term("fever", "fever", None),
    term("chills", "chills", None),
    term("fatigue", "fatigue", None),
    term("cough", "cough", None),
    term("coughing", "cough", None),
    term("wheezing", "wheezing", None),
    term("palpitations", "palpitations", None),
    term("diaphoretic", "diaphoresis", None),
    term("diaphoresis", "diaphoresis", None),
    term("sweating", "diaphoresis", None),
    term("numbness", "numbness", None),
    term("tingling", "tingling", None),
    term("weakness", "weakness", None),
    term("confusion", "confusion", None),
    term("rash", "rash", None),
    term("itching", "itching", None),
    term("hives", "hives", None),
    term("swelling", "swelling", None),
    term("sore throat", "sore throat", Some("throat")),
    term("stiff neck", "neck stiffness", Some("neck")),
    term("neck stiffness", "neck stiffness", Some("neck")),
    term("blurred vision", "blurred vision", None),
    term("blurry vision", "blurred vision", None),
    term("fainted", "syncope", None),
    term("fainting", "syncope", None),
    term("passed out", "syncope", None),
    term("seizure", "seizure", None),
    term("bleeding", "bleeding", None),
];

/// Anatomical phrases mapped to the canonical region name stored in the
/// `location` attribute.
pub static ANATOMICAL_TERMS: &[(&str, &str)] = &[
    ("right lower quadrant", "right lower quadrant"),
    ("left lower quadrant", "left lower quadrant"),
    ("right lower side", "right lower quadrant"),
    ("left lower side", "left lower quadrant"),
    ("lower back", "lower back"),
    ("upper back", "upper back"),
    ("left arm", "left arm"),
    ("right arm", "right arm"),
    ("left leg", "left leg"),
    ("right leg", "right leg"),
    ("shoulder blades", "back"),
    ("chest", "chest"),
    ("abdomen", "abdomen"),
    ("stomach", "abdomen"),
    ("belly", "abdomen"),
    ("head", "head"),
    ("neck", "neck"),
    ("back", "back"),
    ("jaw", "jaw"),
    ("shoulder", "shoulder"),
    ("arm", "arm"),
    ("leg", "leg"),
    ("knee", "knee"),
    ("throat", "throat"),
    ("flank", "flank"),
    ("groin", "groin"),
    ("pelvis", "pelvis"),
    ("calf", "calf"),
];

/// Pain character descriptors for the `quality` attribute.
pub static QUALITY_DESCRIPTORS: &[&str] = &[
    "sharp", "dull", "burning", "stabbing", "crushing", "throbbing",
    "cramping", "aching", "squeezing", "tearing", "ripping", "pounding",
];

/// Severity words. Numeric "n/10" ratings take precedence over these.
pub static SEVERITY_WORDS: &[&str] = &["mild", "moderate", "severe", "excruciating", "worst"];

/// Cue phrases that introduce a radiation target ("radiates to my arm").
pub static RADIATION_CUES: &[&str] = &[
    "radiates to", "radiating to", "radiated to", "goes to", "goes down",
    "moves to", "moved to", "spreading to", "spread to", "shoots down",
];

/// Negation cue words checked inside the preceding-words window.
/// Single tokens; windows are compared word-by-word after punctuation strip.
pub static NEGATION_CUES: &[&str] = &[
    "no", "not", "denies", "denied", "without", "negative", "absent",
    "never", "none", "can't", "cannot", "doesn't", "don't", "didn't",
    "isn't", "wasn't", "hasn't", "haven't", "hadn't", "stopped",
];

/// Allergy reaction vocabulary.
pub static ALLERGY_REACTIONS: &[&str] = &[
    "anaphylaxis", "hives", "rash", "swelling", "itching",
    "trouble breathing", "throat closing", "nausea",
];

/// Chronic-condition vocabulary for history extraction and medication
/// indications.
pub static CONDITION_TERMS: &[&str] = &[
    "hypertension", "high blood pressure", "diabetes", "high cholesterol",
    "asthma", "copd", "heart disease", "coronary artery disease",
    "atrial fibrillation", "heart failure", "stroke", "cancer",
    "kidney disease", "liver disease", "thyroid disease", "depression",
    "anxiety", "arthritis", "gerd", "acid reflux", "infection",
    "blood pressure", "cholesterol", "blood clots",
];

/// Social-history phrases mapped to a canonical habit name.
pub static SOCIAL_TERMS: &[(&str, &str)] = &[
    ("smoker", "smoking"),
    ("smokes", "smoking"),
    ("smoking", "smoking"),
    ("pack a day", "smoking"),
    ("drinks alcohol", "alcohol use"),
    ("heavy drinker", "alcohol use"),
    ("drinks heavily", "alcohol use"),
    ("drug use", "drug use"),
    ("intravenous drug", "drug use"),
];

/// Phrases that introduce a family-history condition.
pub static FAMILY_CUES: &[&str] = &[
    "family history of", "mother has", "mother had", "father has",
    "father had", "brother has", "brother had", "sister has", "sister had",
];

/// Phrases that introduce a personal medical-history condition.
pub static HISTORY_CUES: &[&str] = &["history of", "diagnosed with", "known case of"];
