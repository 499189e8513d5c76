//! Weighted red-flag screening over the full transcript.
//!
//! Deterministic keyword evidence, no model in the loop: the same
//! transcript always raises the same flags. Negated keywords do not
//! count as evidence, so "denies chest pain" cannot raise the cardiac
//! flag.

pub mod rules;
pub mod types;

use std::cmp::Ordering;

use crate::config::EngineConfig;
use crate::pipeline::negation::NegationResolver;

use rules::{FindingPattern, RedFlagRule, RULES};
use types::RedFlag;

pub struct RedFlagScorer {
    config: EngineConfig,
    negation: NegationResolver,
}

impl RedFlagScorer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.clone(),
            negation: NegationResolver::new(config.negation_window_words),
        }
    }

    /// Score every rule against the transcript text. Returned flags are
    /// sorted by confidence, highest first; ties keep rule-table order.
    pub fn score(&self, text: &str) -> Vec<RedFlag> {
        let lower = text.to_lowercase();
        let mut flags: Vec<RedFlag> = RULES
            .iter()
            .filter_map(|rule| self.score_rule(rule, &lower))
            .collect();

        flags.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        flags
    }

    fn score_rule(&self, rule: &RedFlagRule, lower: &str) -> Option<RedFlag> {
        if !self.pattern_fires(&rule.required, lower) {
            return None;
        }

        let mut confidence = rule.required.weight;
        let mut findings = vec![rule.required.label.to_string()];
        for pattern in rule.supporting {
            if self.pattern_fires(pattern, lower) {
                confidence += pattern.weight;
                findings.push(pattern.label.to_string());
            }
        }
        let confidence = confidence.min(1.0);

        let threshold = self.config.threshold_for(rule.category, rule.threshold);
        if confidence < threshold {
            return None;
        }

        tracing::warn!(
            category = rule.category.label(),
            confidence,
            "Red flag raised"
        );

        Some(RedFlag {
            category: rule.category,
            severity: rule.severity,
            findings,
            confidence,
            recommendation: rule.recommendation.to_string(),
        })
    }

    /// A pattern fires when any keyword appears non-negated.
    fn pattern_fires(&self, pattern: &FindingPattern, lower: &str) -> bool {
        pattern.keywords.iter().any(|kw| {
            let (found, negated) = self.negation.extract_with_negation(kw, lower);
            found && !negated
        })
    }
}

/// Convenience entry point with default configuration.
pub fn detect_red_flags(text: &str) -> Vec<RedFlag> {
    RedFlagScorer::new(&EngineConfig::default()).score(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::types::{RedFlagCategory, Severity};

    const STEMI_TEXT: &str =
        "crushing chest pain radiating to my left arm, sweating a lot, and I am a smoker and diabetic";

    #[test]
    fn cardiac_presentation_raises_critical_flag() {
        let flags = detect_red_flags(STEMI_TEXT);
        assert_eq!(flags.len(), 1);
        let flag = &flags[0];
        assert_eq!(flag.category, RedFlagCategory::Stemi);
        assert_eq!(flag.severity, Severity::Critical);
        assert!((flag.confidence - 0.85).abs() < 1e-6);
        assert!(flag.findings.contains(&"Chest pain/pressure".to_string()));
        assert!(flag.findings.contains(&"Pain radiation to arm/jaw".to_string()));
    }

    #[test]
    fn required_finding_alone_stays_below_threshold() {
        // Severe abdominal pain with no peritoneal signs: screened, not alerted.
        let flags = detect_red_flags("severe abdominal pain in the right lower side, some nausea");
        assert!(flags
            .iter()
            .all(|f| f.category != RedFlagCategory::BowelPerforation));
        assert!(flags
            .iter()
            .all(|f| f.category != RedFlagCategory::RupturedAaa));
    }

    #[test]
    fn negated_required_keyword_does_not_fire() {
        let flags = detect_red_flags(
            "denies chest pain, but sweating a lot, smoker, diabetic, left arm hurts",
        );
        assert!(flags.iter().all(|f| f.category != RedFlagCategory::Stemi));
    }

    #[test]
    fn meningitis_cluster_crosses_threshold() {
        let flags = detect_red_flags("bad headache with fever, a stiff neck, and the light hurts my eyes");
        assert!(flags.iter().any(|f| f.category == RedFlagCategory::Meningitis));
    }

    #[test]
    fn threshold_override_suppresses_flag() {
        let mut config = EngineConfig::default();
        config
            .red_flag_thresholds
            .insert(RedFlagCategory::Stemi, 0.95);
        let flags = RedFlagScorer::new(&config).score(STEMI_TEXT);
        assert!(flags.iter().all(|f| f.category != RedFlagCategory::Stemi));
    }

    #[test]
    fn threshold_override_loosens_flag() {
        let mut config = EngineConfig::default();
        config
            .red_flag_thresholds
            .insert(RedFlagCategory::BowelPerforation, 0.25);
        let flags = RedFlagScorer::new(&config).score("severe abdominal pain since noon");
        assert!(flags
            .iter()
            .any(|f| f.category == RedFlagCategory::BowelPerforation));
    }

    #[test]
    fn flags_sorted_by_confidence_descending() {
        let flags = detect_red_flags(
            "crushing chest pain radiating to my left arm, sweating, smoker, diabetic, \
             headache with fever and a stiff neck and a rash and confusion",
        );
        for window in flags.windows(2) {
            assert!(window[0].confidence >= window[1].confidence);
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let first = detect_red_flags(STEMI_TEXT);
        let second = detect_red_flags(STEMI_TEXT);
        assert_eq!(first, second);
    }

    #[test]
    fn clean_text_raises_nothing() {
        assert!(detect_red_flags("routine follow-up, feeling well, no complaints").is_empty());
    }
}
