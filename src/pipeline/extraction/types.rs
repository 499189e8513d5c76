//! Entity graph data model: entities, mentions, attributes, relationships,
//! temporal anchors, and the structured medication projection.

use std::collections::BTreeMap;
use std::ops::Range;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Clinical entity discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Symptom,
    Medication,
    Allergy,
    Finding,
    MedicalHistory,
    SocialHistory,
    FamilyHistory,
    Treatment,
    Diagnostic,
}

/// How a mention refers to its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Direct,
    Pronoun,
    Definite,
    Possessive,
}

/// One textual occurrence of an entity. `segment_index` must reference a
/// segment of the same pipeline run; `span` is a half-open byte range into
/// that segment's lowercased text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub segment_index: usize,
    pub span: Range<usize>,
    pub reference_kind: ReferenceKind,
}

/// Known attribute keys. A closed set instead of free-form strings keeps
/// the attribute map type-safe without losing the map shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKey {
    Location,
    Quality,
    Severity,
    Radiation,
    Value,
    Unit,
    Dose,
    Route,
    Frequency,
    Indication,
    Reaction,
}

/// Tagged attribute value. Only attributes the extractor explicitly
/// populated exist in the map — no null placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    List(Vec<String>),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Directed relationship edge. Cycles are tolerated; traversal must use
/// `related_entity_ids`, which tracks visited nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub target: Uuid,
    pub kind: RelationshipKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Causes,
    Alleviates,
    Worsens,
    TemporallyRelated,
    SpatiallyRelated,
    Treats,
}

/// A resolved (or deliberately unresolved) time expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalExpression {
    Absolute { date: NaiveDate },
    Relative {
        offset_seconds: i64,
        anchor: DateTime<Utc>,
    },
    Duration { seconds: i64 },
    /// Recognized as temporal but not structurally resolvable; the raw
    /// phrasing is preserved for the document synthesizer.
    Descriptive { text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Onset,
    Peak,
    Resolution,
    Worsening,
    Improvement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalAnchor {
    pub expression: TemporalExpression,
    pub event_kind: EventKind,
}

/// A typed clinical fact tracked across mentions within one transcript.
/// Created by extraction; mutated only by the reference resolver
/// (appending mentions) and temporal resolver (appending anchors).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: Uuid,
    pub entity_type: EntityType,
    /// Canonical name, the merge key within one extraction pass.
    pub name: String,
    pub attributes: BTreeMap<AttributeKey, AttributeValue>,
    pub mentions: Vec<Mention>,
    pub relationships: Vec<Relationship>,
    pub temporal_anchors: Vec<TemporalAnchor>,
    /// Always within [0, 1].
    pub confidence: f32,
}

impl Entity {
    pub fn new(entity_type: EntityType, name: impl Into<String>, confidence: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_type,
            name: name.into(),
            attributes: BTreeMap::new(),
            mentions: Vec::new(),
            relationships: Vec::new(),
            temporal_anchors: Vec::new(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn attribute(&self, key: AttributeKey) -> Option<&AttributeValue> {
        self.attributes.get(&key)
    }

    pub fn set_attribute(&mut self, key: AttributeKey, value: AttributeValue) {
        self.attributes.insert(key, value);
    }

    /// Append to a list attribute, creating it if absent, skipping values
    /// already present.
    pub fn push_list_attribute(&mut self, key: AttributeKey, value: String) {
        match self.attributes.get_mut(&key) {
            Some(AttributeValue::List(items)) => {
                if !items.contains(&value) {
                    items.push(value);
                }
            }
            Some(_) => {}
            None => {
                self.attributes.insert(key, AttributeValue::List(vec![value]));
            }
        }
    }

    /// Relationship set semantics: duplicate edges are dropped.
    pub fn add_relationship(&mut self, target: Uuid, kind: RelationshipKind) {
        let edge = Relationship { target, kind };
        if !self.relationships.contains(&edge) {
            self.relationships.push(edge);
        }
    }

    /// Highest segment index among this entity's mentions.
    pub fn last_mention_index(&self) -> Option<usize> {
        self.mentions.iter().map(|m| m.segment_index).max()
    }
}

/// A finding the patient explicitly denied. Kept out of the positive
/// entity graph but surfaced for review-of-systems output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeniedFinding {
    pub name: String,
    pub entity_type: EntityType,
    pub segment_index: usize,
}

/// Read-only output of the medication sub-extractor. Projected into
/// `Medication` entities for document assembly but not merged into the
/// general entity graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredMedication {
    pub name: String,
    pub dose: Option<String>,
    pub unit: Option<String>,
    pub route: Option<String>,
    pub frequency: Option<String>,
    pub indication: Option<String>,
    /// The segment text the medication was read from.
    pub source_span: String,
}

/// Everything the extraction stage produces for one transcript.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub entities: Vec<Entity>,
    pub denied: Vec<DeniedFinding>,
    pub medications: Vec<StructuredMedication>,
}

/// Breadth-first traversal over relationship edges starting from one
/// entity. Tolerates cycles via a visited set; never loops.
pub fn related_entity_ids(entities: &[Entity], start: Uuid) -> Vec<Uuid> {
    let mut visited = vec![start];
    let mut queue = vec![start];
    let mut out = Vec::new();

    while let Some(current) = queue.pop() {
        let Some(entity) = entities.iter().find(|e| e.id == current) else {
            continue;
        };
        for edge in &entity.relationships {
            if !visited.contains(&edge.target) {
                visited.push(edge.target);
                queue.push(edge.target);
                out.push(edge.target);
            }
        }
    }

    out
}
