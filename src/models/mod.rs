//! Shared data models spanning the engine layers.

pub mod pattern;
pub mod signal;
pub mod snapshot;

pub use pattern::{Condition, Operator, PatternDefinition, PatternSet, Reference};
pub use signal::{Direction, Gate, GateResult, PipelineRun, Signal};
pub use snapshot::{Bar, IndicatorSnapshot, Timeframe, TimeframeData};
