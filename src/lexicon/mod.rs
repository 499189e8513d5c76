//! Static lexicon catalogs and the validated loader.
//!
//! Catalogs are plain `&'static` tables in `terms` and `medications`.
//! `Lexicon::build` turns them into lookup structures and rejects duplicate
//! keys outright — silent last-write-wins shadowing between entries is a
//! correctness bug, not a merge strategy. The shared instance is read-only
//! after construction and safe to use from concurrent pipeline instances.

pub mod medications;
pub mod terms;

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use thiserror::Error;

use terms::SymptomTerm;

#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("Duplicate key {term:?} in catalog {catalog}")]
    DuplicateTerm {
        catalog: &'static str,
        term: String,
    },
    #[error("Catalog {catalog} is not sorted at entry {term:?}")]
    UnsortedCatalog {
        catalog: &'static str,
        term: String,
    },
}

static SHARED: LazyLock<Lexicon> =
    LazyLock::new(|| Lexicon::build().expect("Invalid lexicon catalog"));

/// Validated, lookup-ready view over the static catalogs.
pub struct Lexicon {
    symptom_terms: Vec<&'static SymptomTerm>,
    anatomy: Vec<(&'static str, &'static str)>,
    frequencies: Vec<(&'static str, &'static str)>,
    routes: Vec<(&'static str, &'static str)>,
    units: Vec<(&'static str, &'static str)>,
    medication_phrases: Vec<(&'static str, &'static str)>,
    negation_cues: HashSet<&'static str>,
    canonical_symptoms: HashSet<&'static str>,
}

impl Lexicon {
    /// Build lookup structures from the static tables, rejecting duplicate
    /// keys and unsorted binary-search tables.
    pub fn build() -> Result<Self, LexiconError> {
        for window in medications::MEDICATION_NAMES.windows(2) {
            if window[0] >= window[1] {
                return Err(LexiconError::UnsortedCatalog {
                    catalog: "MEDICATION_NAMES",
                    term: window[1].to_string(),
                });
            }
        }

        let mut symptom_terms: Vec<&'static SymptomTerm> = Vec::new();
        {
            let mut seen: HashMap<&str, ()> = HashMap::new();
            for t in terms::SYMPTOM_TERMS {
                if seen.insert(t.phrase, ()).is_some() {
                    return Err(LexiconError::DuplicateTerm {
                        catalog: "SYMPTOM_TERMS",
                        term: t.phrase.to_string(),
                    });
                }
                symptom_terms.push(t);
            }
        }
        symptom_terms.sort_by_key(|t| std::cmp::Reverse(t.phrase.len()));

        let anatomy = unique_pairs("ANATOMICAL_TERMS", terms::ANATOMICAL_TERMS)?;
        let frequencies = unique_pairs("FREQUENCY_TERMS", medications::FREQUENCY_TERMS)?;
        let routes = unique_pairs("ROUTE_TERMS", medications::ROUTE_TERMS)?;
        let units = unique_pairs("UNIT_TERMS", medications::UNIT_TERMS)?;

        let mut medication_phrases: Vec<(&'static str, &'static str)> = Vec::new();
        {
            let mut seen: HashSet<&str> = HashSet::new();
            for name in medications::MEDICATION_NAMES {
                seen.insert(name);
                medication_phrases.push((name, name));
            }
            for (brand, generic) in medications::BRAND_ALIASES {
                if !seen.insert(brand) {
                    return Err(LexiconError::DuplicateTerm {
                        catalog: "BRAND_ALIASES",
                        term: brand.to_string(),
                    });
                }
                medication_phrases.push((brand, generic));
            }
        }
        medication_phrases.sort_by_key(|(phrase, _)| std::cmp::Reverse(phrase.len()));

        let negation_cues: HashSet<&'static str> = terms::NEGATION_CUES.iter().copied().collect();
        if negation_cues.len() != terms::NEGATION_CUES.len() {
            return Err(LexiconError::DuplicateTerm {
                catalog: "NEGATION_CUES",
                term: "(duplicate cue)".to_string(),
            });
        }

        let canonical_symptoms = symptom_terms.iter().map(|t| t.canonical).collect();

        Ok(Self {
            symptom_terms,
            anatomy,
            frequencies,
            routes,
            units,
            medication_phrases,
            negation_cues,
            canonical_symptoms,
        })
    }

    /// Process-wide shared instance.
    pub fn shared() -> &'static Lexicon {
        &SHARED
    }

    /// Symptom phrases, longest first so "chest pain" beats "pain".
    pub fn symptom_terms(&self) -> &[&'static SymptomTerm] {
        &self.symptom_terms
    }

    /// Anatomical phrases, longest first.
    pub fn anatomy(&self) -> &[(&'static str, &'static str)] {
        &self.anatomy
    }

    /// Frequency phrases, longest first.
    pub fn frequencies(&self) -> &[(&'static str, &'static str)] {
        &self.frequencies
    }

    /// Route phrases, longest first.
    pub fn routes(&self) -> &[(&'static str, &'static str)] {
        &self.routes
    }

    /// Unit spellings, longest first.
    pub fn units(&self) -> &[(&'static str, &'static str)] {
        &self.units
    }

    /// Medication phrases (generics + brands) mapped to generic names,
    /// longest first.
    pub fn medication_phrases(&self) -> &[(&'static str, &'static str)] {
        &self.medication_phrases
    }

    pub fn is_negation_cue(&self, word: &str) -> bool {
        self.negation_cues.contains(word)
    }

    pub fn is_canonical_symptom(&self, name: &str) -> bool {
        self.canonical_symptoms.contains(name)
    }
}

fn unique_pairs(
    catalog: &'static str,
    pairs: &'static [(&'static str, &'static str)],
) -> Result<Vec<(&'static str, &'static str)>, LexiconError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(pairs.len());
    for &(key, value) in pairs {
        if !seen.insert(key) {
            return Err(LexiconError::DuplicateTerm {
                catalog,
                term: key.to_string(),
            });
        }
        out.push((key, value));
    }
    out.sort_by_key(|(key, _)| std::cmp::Reverse(key.len()));
    Ok(out)
}
