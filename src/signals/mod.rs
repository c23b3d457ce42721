//! Signal evaluation interfaces.

pub mod constructor;
pub mod evaluator;
pub mod levels;
pub mod pipeline;
pub mod scoring;

pub use evaluator::{ConditionScore, PASS_THRESHOLD};
pub use pipeline::run;
