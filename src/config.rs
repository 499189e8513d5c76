//! Engine constants and per-pipeline tunables.
//!
//! Red-flag thresholds are configuration data, not code: deployments can
//! recalibrate alerting per category without a rebuild.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::pipeline::red_flags::types::RedFlagCategory;

pub const ENGINE_NAME: &str = "Clinscribe";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Words preceding a keyword occurrence scanned for negation cues.
pub const DEFAULT_NEGATION_WINDOW: usize = 5;

/// Synthetic spacing between segments when no real timing is supplied
/// by the upstream transcriber.
pub const DEFAULT_SEGMENT_SPACING: Duration = Duration::from_secs(5);

/// Confidence prior assigned to every extracted entity.
pub const DEFAULT_CONFIDENCE_PRIOR: f32 = 0.9;

/// Tunables for one pipeline instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Negation window size in words.
    pub negation_window_words: usize,
    /// Fallback spacing for synthetic segment timestamps.
    pub segment_spacing: Duration,
    /// Confidence assigned to extracted entities.
    pub confidence_prior: f32,
    /// Per-category red-flag threshold overrides. Categories absent here
    /// use the defaults baked into the rule table.
    pub red_flag_thresholds: BTreeMap<RedFlagCategory, f32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            negation_window_words: DEFAULT_NEGATION_WINDOW,
            segment_spacing: DEFAULT_SEGMENT_SPACING,
            confidence_prior: DEFAULT_CONFIDENCE_PRIOR,
            red_flag_thresholds: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Effective threshold for a category: override if present, else the
    /// rule-table default.
    pub fn threshold_for(&self, category: RedFlagCategory, rule_default: f32) -> f32 {
        self.red_flag_thresholds
            .get(&category)
            .copied()
            .unwrap_or(rule_default)
    }
}
