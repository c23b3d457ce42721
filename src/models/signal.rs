//! Signal and gate outcome data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Direction {
    Long,
    Short,
}

/// The three pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Gate {
    Environment,
    Scenario,
    Trigger,
}

/// Winning pattern of one gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    pub pattern: String,
    pub confidence: f64,
    /// Condition names that passed, kept for auditability.
    pub passed: Vec<String>,
}

impl GateResult {
    pub fn new(pattern: &str, confidence: f64, passed: Vec<String>) -> Self {
        Self {
            pattern: pattern.to_string(),
            confidence,
            passed,
        }
    }
}

/// A fully constructed trade signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub direction: Direction,
    pub entry: f64,
    pub stop_loss: f64,
    /// 1 to 3 targets, nearest to farthest from entry.
    pub take_profits: Vec<f64>,
    pub environment: GateResult,
    pub scenario: GateResult,
    pub trigger: GateResult,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a full pipeline run. "No signal" is an expected result,
/// not an error: it records which gate ended the cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineRun {
    Signal(Box<Signal>),
    NoSignal { gate: Gate },
}

impl PipelineRun {
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            PipelineRun::Signal(signal) => Some(signal),
            PipelineRun::NoSignal { .. } => None,
        }
    }
}
