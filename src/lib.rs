//! Clinscribe: a clinical conversation comprehension engine.
//!
//! Takes a free-form visit transcript and produces structured clinical
//! entities, red-flag alerts, and an assembled clinical note. Everything
//! is deterministic, synchronous, and local: no model calls, no I/O, no
//! network. The unit of work is one transcript.
//!
//! ```
//! use clinscribe::Pipeline;
//!
//! let output = Pipeline::default().process(
//!     "Patient: I've had crushing chest pain for 2 hours, radiating to my left arm, and I'm sweating.",
//! );
//! assert_eq!(output.note.chief_complaint, "chest pain");
//! assert!(!output.red_flags.is_empty());
//! ```

pub mod config;
pub mod lexicon;
pub mod pipeline;

pub use config::EngineConfig;
pub use pipeline::extraction::types::{
    AttributeKey, AttributeValue, DeniedFinding, Entity, EntityType, EventKind, Mention,
    ReferenceKind, Relationship, RelationshipKind, StructuredMedication, TemporalAnchor,
    TemporalExpression,
};
pub use pipeline::red_flags::detect_red_flags;
pub use pipeline::red_flags::types::{RedFlag, RedFlagCategory, Severity};
pub use pipeline::segment::{Segment, Speaker};
pub use pipeline::synthesis::{ClinicalNote, QualityMetrics};
pub use pipeline::{Pipeline, PipelineOutput};
