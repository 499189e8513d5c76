//! Medication vocabulary: generic names, brand aliases, routes, frequencies.
//!
//! Generic names are sorted for binary search and must stay lowercase.

/// Generic medication names recognized by the extractor.
/// Sorted for binary search; a test enforces ordering.
pub static MEDICATION_NAMES: &[&str] = &[
    "acetaminophen", "albuterol", "amlodipine", "amoxicillin", "apixaban",
    "aspirin", "atorvastatin", "azithromycin", "carvedilol", "cephalexin",
    "ciprofloxacin", "clopidogrel", "diltiazem", "doxycycline", "epinephrine",
    "furosemide", "gabapentin", "hydrochlorothiazide", "ibuprofen", "insulin",
    "levothyroxine", "lisinopril", "losartan", "metformin", "metoprolol",
    "morphine", "naproxen", "nitroglycerin", "omeprazole", "ondansetron",
    "oxycodone", "pantoprazole", "penicillin", "prednisone", "rivaroxaban",
    "sertraline", "simvastatin", "tramadol", "warfarin",
];

/// Brand name → generic name aliases. Brand keys must be unique.
pub static BRAND_ALIASES: &[(&str, &str)] = &[
    ("advil", "ibuprofen"),
    ("aleve", "naproxen"),
    ("coumadin", "warfarin"),
    ("eliquis", "apixaban"),
    ("glucophage", "metformin"),
    ("lasix", "furosemide"),
    ("lipitor", "atorvastatin"),
    ("lopressor", "metoprolol"),
    ("motrin", "ibuprofen"),
    ("neurontin", "gabapentin"),
    ("plavix", "clopidogrel"),
    ("prilosec", "omeprazole"),
    ("protonix", "pantoprazole"),
    ("synthroid", "levothyroxine"),
    ("tylenol", "acetaminophen"),
    ("ventolin", "albuterol"),
    ("xarelto", "rivaroxaban"),
    ("zestril", "lisinopril"),
    ("zofran", "ondansetron"),
    ("zoloft", "sertraline"),
];

/// Route phrases mapped to canonical route tokens.
pub static ROUTE_TERMS: &[(&str, &str)] = &[
    ("by mouth", "oral"),
    ("orally", "oral"),
    ("oral", "oral"),
    ("intravenous", "IV"),
    ("intravenously", "IV"),
    ("through the vein", "IV"),
    ("intramuscular", "IM"),
    ("subcutaneous", "subcutaneous"),
    ("under the skin", "subcutaneous"),
    ("under the tongue", "sublingual"),
    ("sublingual", "sublingual"),
    ("inhaled", "inhaled"),
    ("inhaler", "inhaled"),
    ("nebulizer", "inhaled"),
    ("topical", "topical"),
    ("patch", "topical"),
];

/// Frequency phrases mapped to canonical frequency tokens.
/// "every N hours" is handled by regex, not this table.
pub static FREQUENCY_TERMS: &[(&str, &str)] = &[
    ("once a day", "daily"),
    ("once daily", "daily"),
    ("every day", "daily"),
    ("daily", "daily"),
    ("twice a day", "BID"),
    ("twice daily", "BID"),
    ("two times a day", "BID"),
    ("three times a day", "TID"),
    ("three times daily", "TID"),
    ("four times a day", "QID"),
    ("four times daily", "QID"),
    ("as needed", "PRN"),
    ("when needed", "PRN"),
    ("every night", "QHS"),
    ("at bedtime", "QHS"),
    ("at night", "QHS"),
    ("nightly", "QHS"),
    ("every morning", "QAM"),
    ("in the morning", "QAM"),
    ("once a week", "weekly"),
    ("weekly", "weekly"),
];

/// Dose unit spellings mapped to canonical unit tokens.
pub static UNIT_TERMS: &[(&str, &str)] = &[
    ("milligrams", "mg"),
    ("milligram", "mg"),
    ("micrograms", "mcg"),
    ("microgram", "mcg"),
    ("grams", "g"),
    ("gram", "g"),
    ("milliliters", "ml"),
    ("milliliter", "ml"),
    ("units", "units"),
    ("unit", "units"),
    ("mg", "mg"),
    ("mcg", "mcg"),
    ("ml", "ml"),
    ("g", "g"),
];
