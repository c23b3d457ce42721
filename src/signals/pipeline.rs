//! Three-gate evaluation pipeline
//!
//! Gate 1 classifies the market environment, Gate 2 picks a scenario,
//! Gate 3 hunts for a trigger. Each gate is terminal on failure; only a
//! full pass reaches signal construction.

use crate::models::pattern::{PatternDefinition, PatternSet};
use crate::models::signal::{Gate, GateResult, PipelineRun};
use crate::models::snapshot::IndicatorSnapshot;
use crate::signals::constructor;
use crate::signals::scoring;
use tracing::{debug, info};

/// Run one full evaluation cycle over an owned snapshot and a shared,
/// read-only pattern set. Pure computation: callers may run any number of
/// cycles in parallel against the same `PatternSet`.
pub fn run(snapshot: &IndicatorSnapshot, patterns: &PatternSet) -> PipelineRun {
    let environment = match select_winner(snapshot, &patterns.environment, None) {
        Some(result) => result,
        None => {
            debug!("no environment pattern accepted");
            return PipelineRun::NoSignal {
                gate: Gate::Environment,
            };
        }
    };
    debug!(
        environment = %environment.pattern,
        confidence = environment.confidence,
        "gate 1 resolved"
    );

    let scenario = match select_winner(snapshot, &patterns.scenario, Some(&environment.pattern)) {
        Some(result) => result,
        None => {
            debug!(environment = %environment.pattern, "no scenario pattern accepted");
            return PipelineRun::NoSignal {
                gate: Gate::Scenario,
            };
        }
    };
    debug!(
        scenario = %scenario.pattern,
        confidence = scenario.confidence,
        "gate 2 resolved"
    );

    let trigger = match select_winner(snapshot, &patterns.trigger, Some(&environment.pattern)) {
        Some(result) => result,
        None => {
            debug!(environment = %environment.pattern, "no trigger pattern accepted");
            return PipelineRun::NoSignal { gate: Gate::Trigger };
        }
    };
    debug!(
        trigger = %trigger.pattern,
        confidence = trigger.confidence,
        "gate 3 resolved"
    );

    match constructor::construct(snapshot, environment, scenario, trigger) {
        Some(signal) => {
            info!(
                direction = ?signal.direction,
                entry = signal.entry,
                stop_loss = signal.stop_loss,
                "signal emitted"
            );
            PipelineRun::Signal(Box::new(signal))
        }
        None => {
            debug!("signal construction failed");
            PipelineRun::NoSignal { gate: Gate::Trigger }
        }
    }
}

/// Score every candidate and keep the best accepted one. Candidates with
/// an environment restriction that excludes the winning Gate-1 label are
/// skipped before scoring. Ties go to the earlier-declared pattern: only a
/// strictly greater confidence displaces the current winner.
fn select_winner(
    snapshot: &IndicatorSnapshot,
    candidates: &[PatternDefinition],
    environment: Option<&str>,
) -> Option<GateResult> {
    let mut winner: Option<GateResult> = None;
    for candidate in candidates {
        if let Some(label) = environment {
            if !candidate.allows_environment(label) {
                debug!(
                    pattern = %candidate.name,
                    environment = %label,
                    "candidate ineligible for environment"
                );
                continue;
            }
        }
        if let Some(result) = scoring::score_pattern(snapshot, candidate) {
            let displaces = winner
                .as_ref()
                .map(|w| result.confidence > w.confidence)
                .unwrap_or(true);
            if displaces {
                winner = Some(result);
            }
        }
    }
    winner
}
