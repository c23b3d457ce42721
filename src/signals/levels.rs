//! Swing-based retracement/extension levels and ATR fallbacks
//!
//! Stop and target placement is an ordered list of strategies tried in
//! sequence; each returns an optional level and the first success wins.

use crate::models::signal::Direction;

/// Retracement ratios, nearest to deepest.
pub const RETRACEMENTS: [f64; 4] = [0.382, 0.5, 0.618, 0.786];

/// Extension ratios used for take-profit targets, nearest first.
pub const EXTENSIONS: [f64; 3] = [1.272, 1.414, 1.618];

/// ATR multiples for stop and target fallbacks.
pub const ATR_STOP_MULTIPLE: f64 = 1.5;
pub const ATR_TARGET_MULTIPLES: [f64; 3] = [1.5, 2.0, 3.0];

/// Maximum number of take-profit levels on a signal.
pub const MAX_TARGETS: usize = 3;

/// A recent swing, from which retracement and extension prices derive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingLevels {
    pub high: f64,
    pub low: f64,
}

impl SwingLevels {
    /// Validated constructor: a degenerate or inverted swing carries no
    /// level information.
    pub fn new(high: f64, low: f64) -> Option<Self> {
        if !high.is_finite() || !low.is_finite() || high <= low {
            return None;
        }
        Some(Self { high, low })
    }

    fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Price at a retracement ratio, measured against the move direction.
    /// Long trades retrace down from the swing high; short trades retrace
    /// up from the swing low.
    pub fn retracement(&self, ratio: f64, direction: Direction) -> f64 {
        match direction {
            Direction::Long => self.high - self.range() * ratio,
            Direction::Short => self.low + self.range() * ratio,
        }
    }

    /// Price at an extension ratio (> 1.0) beyond the swing in the trade
    /// direction.
    pub fn extension(&self, ratio: f64, direction: Direction) -> f64 {
        match direction {
            Direction::Long => self.low + self.range() * ratio,
            Direction::Short => self.high - self.range() * ratio,
        }
    }

    /// The 38.2–61.8 retracement zone for the given direction, as
    /// (lower bound, upper bound).
    pub fn retracement_zone(&self, direction: Direction) -> (f64, f64) {
        let a = self.retracement(0.382, direction);
        let b = self.retracement(0.618, direction);
        (a.min(b), a.max(b))
    }
}

/// Stop-loss placement strategies, tried in declaration order.
#[derive(Debug, Clone, Copy)]
pub enum StopStrategy {
    /// Nearest retracement level beyond entry on the adverse side.
    NextRetracement,
    /// Entry offset by a fixed ATR multiple.
    AtrMultiple(f64),
}

impl StopStrategy {
    pub fn resolve(
        &self,
        entry: f64,
        direction: Direction,
        swing: Option<SwingLevels>,
        atr: Option<f64>,
    ) -> Option<f64> {
        match self {
            StopStrategy::NextRetracement => {
                let swing = swing?;
                let candidates = RETRACEMENTS
                    .iter()
                    .map(|r| swing.retracement(*r, direction));
                match direction {
                    // Adverse side is below entry for longs: take the
                    // closest level strictly below.
                    Direction::Long => candidates
                        .filter(|p| *p < entry)
                        .max_by(|a, b| a.total_cmp(b)),
                    Direction::Short => candidates
                        .filter(|p| *p > entry)
                        .min_by(|a, b| a.total_cmp(b)),
                }
            }
            StopStrategy::AtrMultiple(multiple) => {
                let atr = positive_atr(atr)?;
                Some(match direction {
                    Direction::Long => entry - atr * multiple,
                    Direction::Short => entry + atr * multiple,
                })
            }
        }
    }
}

/// Take-profit placement strategies, tried in declaration order.
#[derive(Debug, Clone, Copy)]
pub enum TargetStrategy {
    /// Extension levels beyond entry in the trade direction.
    Extensions,
    /// Fixed ladder of ATR multiples from entry.
    AtrLadder,
}

impl TargetStrategy {
    /// Returns targets ordered nearest to farthest from entry, or None
    /// when the strategy produces no qualifying level.
    pub fn resolve(
        &self,
        entry: f64,
        direction: Direction,
        swing: Option<SwingLevels>,
        atr: Option<f64>,
    ) -> Option<Vec<f64>> {
        match self {
            TargetStrategy::Extensions => {
                let swing = swing?;
                let mut targets: Vec<f64> = EXTENSIONS
                    .iter()
                    .map(|r| swing.extension(*r, direction))
                    .filter(|p| match direction {
                        Direction::Long => *p > entry,
                        Direction::Short => *p < entry,
                    })
                    .collect();
                match direction {
                    Direction::Long => targets.sort_by(|a, b| a.total_cmp(b)),
                    Direction::Short => targets.sort_by(|a, b| b.total_cmp(a)),
                }
                targets.truncate(MAX_TARGETS);
                if targets.is_empty() {
                    None
                } else {
                    Some(targets)
                }
            }
            TargetStrategy::AtrLadder => {
                let atr = positive_atr(atr)?;
                let targets = ATR_TARGET_MULTIPLES
                    .iter()
                    .map(|m| match direction {
                        Direction::Long => entry + atr * m,
                        Direction::Short => entry - atr * m,
                    })
                    .collect();
                Some(targets)
            }
        }
    }
}

fn positive_atr(atr: Option<f64>) -> Option<f64> {
    match atr {
        Some(a) if a.is_finite() && a > 0.0 => Some(a),
        _ => None,
    }
}
