//! Condition evaluation against an indicator snapshot

use crate::models::pattern::{Condition, Operator, Reference};
use crate::models::snapshot::{IndicatorSnapshot, Timeframe};

/// Relative tolerance for `Operator::ApproxEqual`.
const APPROX_TOLERANCE: f64 = 0.02;

/// Trailing window inspected by `AllAbove`/`AllBelow`.
const WINDOW_LEN: usize = 3;

/// Score is the threshold at or above which a condition counts as passed.
/// All current operators are binary, so 1.0 doubles as the pass mark.
pub const PASS_THRESHOLD: f64 = 1.0;

/// Result of evaluating one condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionScore {
    pub score: f64,
    pub passed: bool,
}

impl ConditionScore {
    fn fail() -> Self {
        Self {
            score: 0.0,
            passed: false,
        }
    }

    fn from_score(score: f64) -> Self {
        Self {
            score,
            passed: score >= PASS_THRESHOLD,
        }
    }

    fn from_bool(passed: bool) -> Self {
        Self::from_score(if passed { 1.0 } else { 0.0 })
    }
}

/// Evaluate a single condition. Pure: same snapshot and condition always
/// yield the same score. Missing timeframes, missing or NaN indicators and
/// short bar histories all fail the condition closed rather than erroring,
/// so one unavailable input never aborts the cycle.
pub fn evaluate(snapshot: &IndicatorSnapshot, condition: &Condition) -> ConditionScore {
    match condition.operator {
        Operator::GreaterThan
        | Operator::LessThan
        | Operator::GreaterEqual
        | Operator::LessEqual
        | Operator::Equal
        | Operator::NotEqual
        | Operator::ApproxEqual => evaluate_scalar(snapshot, condition),
        Operator::AllAbove | Operator::AllBelow => evaluate_window(snapshot, condition),
        Operator::Engulfing => evaluate_engulfing(snapshot, condition),
    }
}

fn evaluate_scalar(snapshot: &IndicatorSnapshot, condition: &Condition) -> ConditionScore {
    let value = match resolve_indicator(snapshot, condition.timeframe, &condition.indicator) {
        Some(v) => v,
        None => return ConditionScore::fail(),
    };
    let reference = match resolve_reference(snapshot, condition) {
        Some(r) => r,
        None => return ConditionScore::fail(),
    };

    let passed = match condition.operator {
        Operator::GreaterThan => value > reference,
        Operator::LessThan => value < reference,
        Operator::GreaterEqual => value >= reference,
        Operator::LessEqual => value <= reference,
        Operator::Equal => value == reference,
        Operator::NotEqual => value != reference,
        Operator::ApproxEqual => approx_equal(value, reference),
        _ => unreachable!("non-scalar operator routed to evaluate_scalar"),
    };
    ConditionScore::from_bool(passed)
}

fn evaluate_window(snapshot: &IndicatorSnapshot, condition: &Condition) -> ConditionScore {
    let data = match snapshot.timeframe(condition.timeframe) {
        Some(d) => d,
        None => return ConditionScore::fail(),
    };
    let closes = match data.recent_closes(WINDOW_LEN) {
        Some(c) => c,
        None => return ConditionScore::fail(),
    };
    let reference = match resolve_reference(snapshot, condition) {
        Some(r) => r,
        None => return ConditionScore::fail(),
    };

    let passed = match condition.operator {
        Operator::AllAbove => closes.iter().all(|c| *c > reference),
        Operator::AllBelow => closes.iter().all(|c| *c < reference),
        _ => unreachable!("non-window operator routed to evaluate_window"),
    };
    ConditionScore::from_bool(passed)
}

/// Engulfing check: the current bar's body must fully contain the previous
/// bar's body, closing in the direction implied by the reference sign
/// (>= 0 bullish, < 0 bearish).
fn evaluate_engulfing(snapshot: &IndicatorSnapshot, condition: &Condition) -> ConditionScore {
    let data = match snapshot.timeframe(condition.timeframe) {
        Some(d) => d,
        None => return ConditionScore::fail(),
    };
    let (current, previous) = match (data.current_bar(), data.previous_bar()) {
        (Some(c), Some(p)) => (c, p),
        _ => return ConditionScore::fail(),
    };
    let reference = match resolve_reference(snapshot, condition) {
        Some(r) => r,
        None => return ConditionScore::fail(),
    };

    let prev_top = previous.open.max(previous.close);
    let prev_bottom = previous.open.min(previous.close);
    let passed = if reference >= 0.0 {
        current.is_bullish() && current.open <= prev_bottom && current.close >= prev_top
    } else {
        current.is_bearish() && current.open >= prev_top && current.close <= prev_bottom
    };
    ConditionScore::from_bool(passed)
}

fn resolve_indicator(
    snapshot: &IndicatorSnapshot,
    timeframe: Timeframe,
    name: &str,
) -> Option<f64> {
    let data = snapshot.timeframe(timeframe)?;
    // OHLC of the current bar is addressable like any indicator.
    match name {
        "open" => data.current_bar().map(|b| b.open),
        "high" => data.current_bar().map(|b| b.high),
        "low" => data.current_bar().map(|b| b.low),
        "close" => data.current_bar().map(|b| b.close),
        _ => data.indicator(name),
    }
}

fn resolve_reference(snapshot: &IndicatorSnapshot, condition: &Condition) -> Option<f64> {
    match &condition.reference {
        Reference::Value(v) => {
            if v.is_finite() {
                Some(*v)
            } else {
                None
            }
        }
        Reference::Indicator { name, timeframe } => {
            let tf = timeframe.unwrap_or(condition.timeframe);
            resolve_indicator(snapshot, tf, name)
        }
    }
}

fn approx_equal(value: f64, reference: f64) -> bool {
    let scale = reference.abs().max(f64::EPSILON);
    ((value - reference).abs() / scale) <= APPROX_TOLERANCE
}
