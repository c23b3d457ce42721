//! Per-cycle indicator snapshot data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supported chart timeframes, ordered coarsest to finest.
///
/// The ordering drives `IndicatorSnapshot::finest`, which picks the
/// timeframe used for entry/stop/target construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "1m")]
    M1,
}

impl Timeframe {
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::D1 => "1d",
            Timeframe::H4 => "4h",
            Timeframe::H1 => "1h",
            Timeframe::M15 => "15m",
            Timeframe::M5 => "5m",
            Timeframe::M1 => "1m",
        }
    }
}

/// OHLC of a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }

    /// Absolute body size (|close - open|).
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Indicator values and a short trailing bar window for one timeframe.
///
/// `bars` is ordered oldest to newest; the last element is the current bar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeframeData {
    #[serde(default)]
    pub indicators: HashMap<String, f64>,
    #[serde(default)]
    pub bars: Vec<Bar>,
}

impl TimeframeData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indicator(mut self, name: &str, value: f64) -> Self {
        self.indicators.insert(name.to_string(), value);
        self
    }

    pub fn with_bars(mut self, bars: Vec<Bar>) -> Self {
        self.bars = bars;
        self
    }

    /// Look up an indicator value. NaN is treated as unavailable so a
    /// half-populated snapshot fails individual conditions instead of
    /// poisoning comparisons downstream.
    pub fn indicator(&self, name: &str) -> Option<f64> {
        match self.indicators.get(name) {
            Some(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn current_bar(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn previous_bar(&self) -> Option<&Bar> {
        if self.bars.len() < 2 {
            return None;
        }
        self.bars.get(self.bars.len() - 2)
    }

    /// Last `n` closes, oldest to newest. Returns None when fewer than
    /// `n` bars are available.
    pub fn recent_closes(&self, n: usize) -> Option<Vec<f64>> {
        if self.bars.len() < n {
            return None;
        }
        Some(self.bars[self.bars.len() - n..].iter().map(|b| b.close).collect())
    }
}

/// All indicator data for one evaluation cycle.
///
/// Immutable once built; each pipeline invocation owns its snapshot, so
/// concurrent evaluations over different snapshots need no coordination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub timeframes: HashMap<Timeframe, TimeframeData>,
    /// Bar-close time of the cycle. Stamped onto the emitted signal so
    /// re-running an unchanged snapshot reproduces it exactly.
    pub as_of: DateTime<Utc>,
}

impl IndicatorSnapshot {
    pub fn new(as_of: DateTime<Utc>) -> Self {
        Self {
            timeframes: HashMap::new(),
            as_of,
        }
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe, data: TimeframeData) -> Self {
        self.timeframes.insert(timeframe, data);
        self
    }

    pub fn timeframe(&self, timeframe: Timeframe) -> Option<&TimeframeData> {
        self.timeframes.get(&timeframe)
    }

    /// The finest timeframe present in this snapshot.
    pub fn finest(&self) -> Option<Timeframe> {
        self.timeframes.keys().max().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_ordering_coarse_to_fine() {
        assert!(Timeframe::D1 < Timeframe::H4);
        assert!(Timeframe::H4 < Timeframe::H1);
        assert!(Timeframe::H1 < Timeframe::M5);
    }

    #[test]
    fn test_finest_picks_smallest_timeframe() {
        let snapshot = IndicatorSnapshot::new(Utc::now())
            .with_timeframe(Timeframe::D1, TimeframeData::new())
            .with_timeframe(Timeframe::M5, TimeframeData::new())
            .with_timeframe(Timeframe::H1, TimeframeData::new());
        assert_eq!(snapshot.finest(), Some(Timeframe::M5));
    }

    #[test]
    fn test_nan_indicator_is_unavailable() {
        let data = TimeframeData::new()
            .with_indicator("rsi", f64::NAN)
            .with_indicator("adx", 30.0);
        assert_eq!(data.indicator("rsi"), None);
        assert_eq!(data.indicator("adx"), Some(30.0));
        assert_eq!(data.indicator("missing"), None);
    }

    #[test]
    fn test_recent_closes_window() {
        let data = TimeframeData::new().with_bars(vec![
            Bar::new(1.0, 2.0, 0.5, 1.5),
            Bar::new(1.5, 2.5, 1.0, 2.0),
            Bar::new(2.0, 3.0, 1.5, 2.5),
            Bar::new(2.5, 3.5, 2.0, 3.0),
        ]);
        assert_eq!(data.recent_closes(3), Some(vec![2.0, 2.5, 3.0]));
        assert_eq!(data.recent_closes(5), None);
        assert_eq!(data.current_bar().unwrap().close, 3.0);
        assert_eq!(data.previous_bar().unwrap().close, 2.5);
    }

    #[test]
    fn test_bar_body_and_direction() {
        let bull = Bar::new(10.0, 12.0, 9.5, 11.5);
        let bear = Bar::new(11.5, 12.0, 9.5, 10.0);
        assert!(bull.is_bullish());
        assert!(bear.is_bearish());
        assert!((bull.body() - 1.5).abs() < 1e-12);
    }
}
