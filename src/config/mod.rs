//! Configuration loading and startup-time validation
//!
//! Pattern sets arrive as JSON from the surrounding orchestration layer.
//! Validation runs on every load, so a hot reload either publishes a fully
//! checked new snapshot or fails loudly without touching the active one.

pub mod defaults;

use crate::models::pattern::{PatternDefinition, PatternSet};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::error;

/// Errors that keep an invalid configuration from activating.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read pattern file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse pattern file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("gate '{0}' has no patterns")]
    EmptyGate(&'static str),

    #[error("pattern '{pattern}' declares duplicate condition '{condition}'")]
    DuplicateCondition { pattern: String, condition: String },

    #[error("pattern '{pattern}' requires unknown condition '{condition}'")]
    UnknownRequired { pattern: String, condition: String },

    #[error("pattern '{pattern}' has zero total condition weight")]
    ZeroTotalWeight { pattern: String },

    #[error("pattern '{pattern}' condition '{condition}' has negative weight")]
    NegativeWeight { pattern: String, condition: String },

    #[error("pattern '{pattern}' min_confidence {value} outside [0, 1]")]
    InvalidConfidence { pattern: String, value: f64 },
}

/// Runtime environment name, used to pick the log formatter.
pub fn get_environment() -> String {
    dotenvy::dotenv().ok();
    std::env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// Load and validate a pattern set from a JSON file.
pub fn load_pattern_set(path: &Path) -> Result<PatternSet, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    pattern_set_from_json(&contents)
}

/// Parse and validate a pattern set from a JSON document.
pub fn pattern_set_from_json(json: &str) -> Result<PatternSet, ConfigError> {
    let set: PatternSet = serde_json::from_str(json)?;
    validate_pattern_set(&set)?;
    Ok(set)
}

/// Reject configurations that would silently degrade at evaluation time.
pub fn validate_pattern_set(set: &PatternSet) -> Result<(), ConfigError> {
    let gates: [(&'static str, &[PatternDefinition]); 3] = [
        ("environment", &set.environment),
        ("scenario", &set.scenario),
        ("trigger", &set.trigger),
    ];
    for (gate, patterns) in gates {
        if patterns.is_empty() {
            let err = ConfigError::EmptyGate(gate);
            error!(%err, "rejecting pattern configuration");
            return Err(err);
        }
        for pattern in patterns {
            if let Err(err) = validate_pattern(pattern) {
                error!(gate, pattern = %pattern.name, %err, "rejecting pattern configuration");
                return Err(err);
            }
        }
    }
    Ok(())
}

fn validate_pattern(pattern: &PatternDefinition) -> Result<(), ConfigError> {
    let mut names = HashSet::new();
    for condition in &pattern.conditions {
        if !names.insert(condition.name.as_str()) {
            return Err(ConfigError::DuplicateCondition {
                pattern: pattern.name.clone(),
                condition: condition.name.clone(),
            });
        }
        if condition.weight < 0.0 {
            return Err(ConfigError::NegativeWeight {
                pattern: pattern.name.clone(),
                condition: condition.name.clone(),
            });
        }
    }

    for required in &pattern.required {
        if !names.contains(required.as_str()) {
            return Err(ConfigError::UnknownRequired {
                pattern: pattern.name.clone(),
                condition: required.clone(),
            });
        }
    }

    if pattern.total_weight() <= 0.0 {
        return Err(ConfigError::ZeroTotalWeight {
            pattern: pattern.name.clone(),
        });
    }

    if !(0.0..=1.0).contains(&pattern.min_confidence) {
        return Err(ConfigError::InvalidConfidence {
            pattern: pattern.name.clone(),
            value: pattern.min_confidence,
        });
    }

    Ok(())
}
