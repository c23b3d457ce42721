//! Pattern configuration data models

use crate::models::snapshot::Timeframe;
use serde::{Deserialize, Serialize};

/// Comparison operators available to conditions.
///
/// Closed set on purpose: every operator gets an exhaustive match arm in
/// the evaluator, so adding a variant without handling it fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Operator {
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Equal,
    NotEqual,
    /// Passes when the relative difference is within 2%.
    ApproxEqual,
    /// Every close in the trailing window is above the reference.
    AllAbove,
    /// Every close in the trailing window is below the reference.
    AllBelow,
    /// Current bar's body engulfs the previous bar's body. The reference
    /// sign selects the side: >= 0 requires a bullish engulfing bar,
    /// < 0 a bearish one.
    Engulfing,
}

/// Right-hand side of a condition: a literal value or another indicator,
/// optionally read from a different timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Value(f64),
    Indicator {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timeframe: Option<Timeframe>,
    },
}

fn default_weight() -> f64 {
    1.0
}

/// A single declarative rule evaluated against one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub indicator: String,
    pub timeframe: Timeframe,
    pub operator: Operator,
    pub reference: Reference,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Condition {
    pub fn new(
        name: &str,
        indicator: &str,
        timeframe: Timeframe,
        operator: Operator,
        reference: Reference,
    ) -> Self {
        Self {
            name: name.to_string(),
            indicator: indicator.to_string(),
            timeframe,
            operator,
            reference,
            weight: default_weight(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// A candidate pattern for one gate of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDefinition {
    pub name: String,
    pub conditions: Vec<Condition>,
    /// Names of conditions whose failure vetoes the pattern outright.
    #[serde(default)]
    pub required: Vec<String>,
    pub min_confidence: f64,
    /// Environment labels this pattern may fire under. Empty = unrestricted.
    #[serde(default)]
    pub environments: Vec<String>,
}

impl PatternDefinition {
    pub fn new(name: &str, conditions: Vec<Condition>, min_confidence: f64) -> Self {
        Self {
            name: name.to_string(),
            conditions,
            required: Vec::new(),
            min_confidence,
            environments: Vec::new(),
        }
    }

    pub fn with_required(mut self, required: &[&str]) -> Self {
        self.required = required.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_environments(mut self, environments: &[&str]) -> Self {
        self.environments = environments.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn total_weight(&self) -> f64 {
        self.conditions.iter().map(|c| c.weight).sum()
    }

    /// Whether this pattern may fire under the given environment label.
    pub fn allows_environment(&self, label: &str) -> bool {
        self.environments.is_empty() || self.environments.iter().any(|e| e == label)
    }
}

/// The three ordered gate collections. Declaration order matters: it is
/// the tie-break between equal-confidence candidates at the same gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSet {
    pub environment: Vec<PatternDefinition>,
    pub scenario: Vec<PatternDefinition>,
    pub trigger: Vec<PatternDefinition>,
}
