//! Key-value projections for EMR import.
//!
//! Flat string maps rather than the note's prose: downstream record
//! systems take field dictionaries, and absent fields are omitted
//! entirely instead of carrying empty placeholders.

use std::collections::BTreeMap;

use crate::pipeline::extraction::types::{AttributeKey, Entity, EntityType, StructuredMedication};

pub fn medications_for_emr(medications: &[StructuredMedication]) -> Vec<BTreeMap<String, String>> {
    medications
        .iter()
        .map(|med| {
            let mut record = BTreeMap::new();
            record.insert("name".to_string(), med.name.clone());
            let optional = [
                ("dose", &med.dose),
                ("unit", &med.unit),
                ("route", &med.route),
                ("frequency", &med.frequency),
                ("indication", &med.indication),
            ];
            for (key, value) in optional {
                if let Some(value) = value {
                    record.insert(key.to_string(), value.clone());
                }
            }
            record
        })
        .collect()
}

pub fn allergies_for_emr(entities: &[Entity]) -> Vec<BTreeMap<String, String>> {
    entities
        .iter()
        .filter(|e| e.entity_type == EntityType::Allergy)
        .map(|entity| {
            let mut record = BTreeMap::new();
            record.insert("allergen".to_string(), entity.name.clone());
            for (key, attr) in [
                ("reaction", AttributeKey::Reaction),
                ("severity", AttributeKey::Severity),
            ] {
                if let Some(value) = entity.attribute(attr).and_then(|v| v.as_text()) {
                    record.insert(key.to_string(), value.to_string());
                }
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::types::AttributeValue;

    fn med(name: &str, dose: Option<&str>) -> StructuredMedication {
        StructuredMedication {
            name: name.to_string(),
            dose: dose.map(str::to_string),
            unit: dose.map(|_| "mg".to_string()),
            route: None,
            frequency: None,
            indication: None,
            source_span: String::new(),
        }
    }

    #[test]
    fn absent_fields_are_omitted_not_empty() {
        let records = medications_for_emr(&[med("warfarin", None)]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("name").map(String::as_str), Some("warfarin"));
        assert!(!records[0].contains_key("dose"));
        assert!(!records[0].contains_key("route"));
    }

    #[test]
    fn populated_fields_carry_through() {
        let records = medications_for_emr(&[med("aspirin", Some("81"))]);
        assert_eq!(records[0].get("dose").map(String::as_str), Some("81"));
        assert_eq!(records[0].get("unit").map(String::as_str), Some("mg"));
    }

    #[test]
    fn allergy_records_skip_missing_reaction() {
        let mut with_reaction = Entity::new(EntityType::Allergy, "penicillin", 0.9);
        with_reaction.set_attribute(AttributeKey::Reaction, AttributeValue::Text("hives".into()));
        let bare = Entity::new(EntityType::Allergy, "latex", 0.9);
        let unrelated = Entity::new(EntityType::Symptom, "pain", 0.9);

        let records = allergies_for_emr(&[with_reaction, bare, unrelated]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("reaction").map(String::as_str), Some("hives"));
        assert!(!records[1].contains_key("reaction"));
    }
}
