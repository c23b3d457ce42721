//! Three-gate trading signal engine
//!
//! Cascades a multi-timeframe indicator snapshot through environment,
//! scenario and trigger classification, then derives entry, stop-loss and
//! take-profit levels from swing retracements with ATR fallbacks.

pub mod config;
pub mod logging;
pub mod models;
pub mod signals;

pub use models::{
    Bar, Condition, Direction, Gate, GateResult, IndicatorSnapshot, Operator, PatternDefinition,
    PatternSet, PipelineRun, Reference, Signal, Timeframe, TimeframeData,
};
