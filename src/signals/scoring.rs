//! Weighted pattern scoring and acceptance gating

use crate::models::pattern::PatternDefinition;
use crate::models::signal::GateResult;
use crate::models::snapshot::IndicatorSnapshot;
use crate::signals::evaluator;
use tracing::debug;

/// Score a pattern against a snapshot.
///
/// Confidence is the weight-normalized average of condition scores.
/// A pattern is rejected (None) when any required condition fails or when
/// confidence falls below the pattern's threshold. Rejection is a normal
/// outcome, not an error: the pattern simply does not compete for the gate.
pub fn score_pattern(
    snapshot: &IndicatorSnapshot,
    pattern: &PatternDefinition,
) -> Option<GateResult> {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut passed = Vec::new();

    for condition in &pattern.conditions {
        let result = evaluator::evaluate(snapshot, condition);
        weighted_sum += result.score * condition.weight;
        total_weight += condition.weight;
        if result.passed {
            passed.push(condition.name.clone());
        }
    }

    let confidence = if total_weight > 0.0 {
        (weighted_sum / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    for name in &pattern.required {
        if !passed.iter().any(|p| p == name) {
            debug!(
                pattern = %pattern.name,
                required = %name,
                "pattern vetoed by required condition"
            );
            return None;
        }
    }

    if confidence < pattern.min_confidence {
        debug!(
            pattern = %pattern.name,
            confidence,
            min_confidence = pattern.min_confidence,
            "pattern below confidence threshold"
        );
        return None;
    }

    Some(GateResult::new(&pattern.name, confidence, passed))
}
