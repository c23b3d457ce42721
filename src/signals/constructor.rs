//! Signal construction from gate outcomes and price levels

use crate::models::signal::{Direction, GateResult, Signal};
use crate::models::snapshot::{IndicatorSnapshot, Timeframe};
use crate::signals::levels::{
    StopStrategy, SwingLevels, TargetStrategy, ATR_STOP_MULTIPLE,
};
use tracing::debug;

/// Build a signal from the three accepted gate results.
///
/// Returns None when the snapshot cannot support a well-formed record
/// (no close on the finest timeframe, no resolvable direction, or no
/// placeable stop/targets). The pipeline reports that as "no signal".
pub fn construct(
    snapshot: &IndicatorSnapshot,
    environment: GateResult,
    scenario: GateResult,
    trigger: GateResult,
) -> Option<Signal> {
    let direction = derive_direction(&environment.pattern, &trigger.pattern)?;

    let finest = snapshot.finest()?;
    let data = snapshot.timeframe(finest)?;
    let close = data.current_bar().map(|b| b.close)?;
    if !close.is_finite() {
        return None;
    }

    let swing = resolve_swing(snapshot, finest);
    let atr = data.indicator("atr");

    let entry = entry_price(close, direction, swing);

    let stop_strategies = [
        StopStrategy::NextRetracement,
        StopStrategy::AtrMultiple(ATR_STOP_MULTIPLE),
    ];
    let stop_loss = stop_strategies
        .iter()
        .find_map(|s| s.resolve(entry, direction, swing, atr))?;

    let target_strategies = [TargetStrategy::Extensions, TargetStrategy::AtrLadder];
    let take_profits = target_strategies
        .iter()
        .find_map(|s| s.resolve(entry, direction, swing, atr))?;

    debug!(
        ?direction,
        entry,
        stop_loss,
        targets = take_profits.len(),
        "constructed signal levels"
    );

    Some(Signal {
        direction,
        entry,
        stop_loss,
        take_profits,
        environment,
        scenario,
        trigger,
        timestamp: snapshot.as_of,
    })
}

/// Direction comes from the environment label; a direction-neutral
/// environment (e.g. "ranging") defers to the trigger name. Neither
/// carrying a side means no well-formed signal can be built.
fn derive_direction(environment: &str, trigger: &str) -> Option<Direction> {
    label_direction(environment).or_else(|| label_direction(trigger))
}

fn label_direction(label: &str) -> Option<Direction> {
    if label.contains("bullish") {
        Some(Direction::Long)
    } else if label.contains("bearish") {
        Some(Direction::Short)
    } else {
        None
    }
}

/// Swing high/low for level computation: explicit `swing_high`/`swing_low`
/// indicators when the upstream pipeline provides them, otherwise the
/// extremes of the trailing bar window.
fn resolve_swing(snapshot: &IndicatorSnapshot, finest: Timeframe) -> Option<SwingLevels> {
    let data = snapshot.timeframe(finest)?;
    let high = data
        .indicator("swing_high")
        .or_else(|| {
            data.bars
                .iter()
                .map(|b| b.high)
                .max_by(|a, b| a.total_cmp(b))
        })?;
    let low = data
        .indicator("swing_low")
        .or_else(|| {
            data.bars
                .iter()
                .map(|b| b.low)
                .min_by(|a, b| a.total_cmp(b))
        })?;
    SwingLevels::new(high, low)
}

/// Entry is the finest-timeframe close, snapped to the 61.8% (long) or
/// 38.2% (short) retracement when the close sits inside the retracement
/// zone. Outside the zone the raw close stands.
fn entry_price(close: f64, direction: Direction, swing: Option<SwingLevels>) -> f64 {
    let swing = match swing {
        Some(s) => s,
        None => return close,
    };
    let (zone_low, zone_high) = swing.retracement_zone(direction);
    if close < zone_low || close > zone_high {
        return close;
    }
    match direction {
        Direction::Long => swing.retracement(0.618, direction),
        Direction::Short => swing.retracement(0.382, direction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::snapshot::{Bar, TimeframeData};
    use chrono::Utc;

    fn gate(pattern: &str) -> GateResult {
        GateResult::new(pattern, 0.8, vec![])
    }

    fn snapshot(close: f64, swing_high: f64, swing_low: f64, atr: Option<f64>) -> IndicatorSnapshot {
        let mut data = TimeframeData::new()
            .with_indicator("swing_high", swing_high)
            .with_indicator("swing_low", swing_low)
            .with_bars(vec![Bar::new(close, close + 0.5, close - 0.5, close)]);
        if let Some(a) = atr {
            data = data.with_indicator("atr", a);
        }
        IndicatorSnapshot::new(Utc::now()).with_timeframe(Timeframe::M5, data)
    }

    #[test]
    fn test_long_signal_geometry() {
        // Close 108 is above the 38.2% retracement (106.18): raw entry.
        let snap = snapshot(108.0, 110.0, 100.0, Some(1.0));
        let signal = construct(
            &snap,
            gate("trending-bullish"),
            gate("pullback"),
            gate("bullish-engulfing"),
        )
        .unwrap();
        assert_eq!(signal.direction, Direction::Long);
        assert_eq!(signal.entry, 108.0);
        assert!(signal.stop_loss < signal.entry);
        assert!(signal.take_profits.iter().all(|tp| *tp > signal.entry));
        let mut sorted = signal.take_profits.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(signal.take_profits, sorted);
    }

    #[test]
    fn test_entry_snaps_to_retracement_inside_zone() {
        // Close 105 lies inside the 103.82-106.18 zone; long entry snaps
        // to the 61.8% level.
        let snap = snapshot(105.0, 110.0, 100.0, Some(1.0));
        let signal = construct(
            &snap,
            gate("trending-bullish"),
            gate("pullback"),
            gate("bullish-engulfing"),
        )
        .unwrap();
        assert!((signal.entry - 103.82).abs() < 1e-9);
    }

    #[test]
    fn test_short_signal_geometry() {
        let snap = snapshot(101.0, 110.0, 100.0, Some(1.0));
        let signal = construct(
            &snap,
            gate("trending-bearish"),
            gate("breakdown"),
            gate("bearish-engulfing"),
        )
        .unwrap();
        assert_eq!(signal.direction, Direction::Short);
        assert!(signal.stop_loss > signal.entry);
        assert!(signal.take_profits.iter().all(|tp| *tp < signal.entry));
        for pair in signal.take_profits.windows(2) {
            assert!(pair[0] > pair[1], "targets must walk away from entry");
        }
    }

    #[test]
    fn test_ranging_environment_defers_to_trigger() {
        let snap = snapshot(108.0, 110.0, 100.0, Some(1.0));
        let signal = construct(
            &snap,
            gate("ranging"),
            gate("mean-reversion"),
            gate("bullish-engulfing"),
        )
        .unwrap();
        assert_eq!(signal.direction, Direction::Long);
    }

    #[test]
    fn test_no_direction_fails_construction() {
        let snap = snapshot(108.0, 110.0, 100.0, Some(1.0));
        assert!(construct(&snap, gate("ranging"), gate("mean-reversion"), gate("doji")).is_none());
    }

    #[test]
    fn test_missing_close_fails_construction() {
        let snap = IndicatorSnapshot::new(Utc::now())
            .with_timeframe(Timeframe::M5, TimeframeData::new().with_indicator("atr", 1.0));
        assert!(construct(
            &snap,
            gate("trending-bullish"),
            gate("pullback"),
            gate("bullish-engulfing"),
        )
        .is_none());
    }

    #[test]
    fn test_atr_fallback_targets_when_no_extension_qualifies() {
        // Entry far beyond every extension: targets fall back to the ATR
        // ladder at 1.5/2.0/3.0 multiples.
        let snap = snapshot(120.0, 110.0, 100.0, Some(2.0));
        let signal = construct(
            &snap,
            gate("trending-bullish"),
            gate("breakout"),
            gate("bullish-engulfing"),
        )
        .unwrap();
        assert_eq!(signal.take_profits, vec![123.0, 124.0, 126.0]);
        // The nearest retracement below entry still places the stop.
        assert!((signal.stop_loss - 106.18).abs() < 1e-9);
    }

    #[test]
    fn test_atr_fallback_stop_when_entry_below_all_retracements() {
        let snap = snapshot(95.0, 110.0, 100.0, Some(2.0));
        let signal = construct(
            &snap,
            gate("trending-bullish"),
            gate("pullback"),
            gate("bullish-engulfing"),
        )
        .unwrap();
        // Every retracement of the swing sits above the 95.0 entry.
        assert!((signal.stop_loss - 92.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_stop_available_fails_construction() {
        // No swing indicators, single bar (degenerate swing), no ATR.
        let data = TimeframeData::new().with_bars(vec![Bar::new(100.0, 100.0, 100.0, 100.0)]);
        let snap = IndicatorSnapshot::new(Utc::now()).with_timeframe(Timeframe::M5, data);
        assert!(construct(
            &snap,
            gate("trending-bullish"),
            gate("pullback"),
            gate("bullish-engulfing"),
        )
        .is_none());
    }

    #[test]
    fn test_stop_on_opposite_side_of_all_targets() {
        let snap = snapshot(105.0, 110.0, 100.0, Some(1.5));
        let signal = construct(
            &snap,
            gate("trending-bullish"),
            gate("pullback"),
            gate("bullish-engulfing"),
        )
        .unwrap();
        assert!(signal.stop_loss < signal.entry);
        assert!(signal
            .take_profits
            .iter()
            .all(|tp| *tp > signal.entry && *tp > signal.stop_loss));
    }

    #[test]
    fn test_timestamp_comes_from_snapshot() {
        let snap = snapshot(108.0, 110.0, 100.0, Some(1.0));
        let signal = construct(
            &snap,
            gate("trending-bullish"),
            gate("pullback"),
            gate("bullish-engulfing"),
        )
        .unwrap();
        assert_eq!(signal.timestamp, snap.as_of);
    }
}
