//! End-to-end pipeline scenarios against the built-in pattern set.

use chrono::{TimeZone, Utc};
use trigate::config::{defaults, validate_pattern_set};
use trigate::models::snapshot::{Bar, IndicatorSnapshot, Timeframe, TimeframeData};
use trigate::models::{Direction, Gate, PipelineRun};
use trigate::signals::pipeline;

/// Daily uptrend, hourly pullback, 5-minute bullish engulfing bar.
fn bullish_snapshot() -> IndicatorSnapshot {
    let as_of = Utc.with_ymd_and_hms(2026, 3, 2, 14, 35, 0).unwrap();
    IndicatorSnapshot::new(as_of)
        .with_timeframe(
            Timeframe::D1,
            TimeframeData::new()
                .with_indicator("ema200", 42000.0)
                .with_indicator("ema50", 44000.0)
                .with_indicator("adx", 31.0)
                .with_bars(vec![
                    Bar::new(44100.0, 44600.0, 43900.0, 44500.0),
                    Bar::new(44500.0, 45100.0, 44300.0, 45000.0),
                    Bar::new(45000.0, 45600.0, 44800.0, 45400.0),
                ]),
        )
        .with_timeframe(
            Timeframe::H4,
            TimeframeData::new().with_indicator("ema200", 43800.0),
        )
        .with_timeframe(
            Timeframe::H1,
            TimeframeData::new().with_indicator("rsi", 48.0).with_bars(vec![
                Bar::new(45300.0, 45500.0, 45100.0, 45200.0),
                Bar::new(45200.0, 45400.0, 45000.0, 45150.0),
            ]),
        )
        .with_timeframe(
            Timeframe::M5,
            TimeframeData::new()
                .with_indicator("atr", 90.0)
                .with_indicator("swing_high", 45600.0)
                .with_indicator("swing_low", 44800.0)
                .with_bars(vec![
                    Bar::new(45180.0, 45200.0, 45100.0, 45120.0),
                    Bar::new(45110.0, 45260.0, 45100.0, 45230.0),
                ]),
        )
}

#[test]
fn default_pattern_set_validates() {
    assert!(validate_pattern_set(&defaults::default_pattern_set()).is_ok());
}

#[test]
fn bullish_snapshot_selects_trending_bullish_environment() {
    let run = pipeline::run(&bullish_snapshot(), &defaults::default_pattern_set());
    let signal = run.signal().expect("expected a long signal");
    assert_eq!(signal.environment.pattern, "trending-bullish");
    assert!(signal.environment.confidence >= 0.6);
    assert_eq!(signal.direction, Direction::Long);
}

#[test]
fn emitted_levels_respect_trade_geometry() {
    let run = pipeline::run(&bullish_snapshot(), &defaults::default_pattern_set());
    let signal = run.signal().unwrap();
    assert!(!signal.take_profits.is_empty() && signal.take_profits.len() <= 3);
    assert!(signal.stop_loss < signal.entry);
    let mut previous = signal.entry;
    for tp in &signal.take_profits {
        assert!(*tp > previous, "targets must walk away from entry in order");
        previous = *tp;
    }
}

#[test]
fn required_bullish_candle_vetoes_trigger_on_down_bar() {
    let mut snapshot = bullish_snapshot();
    // Replace the 5m bars: the current bar closes below its open, so the
    // required "bullish-candle" condition fails no matter what else scores.
    let data = snapshot.timeframes.get_mut(&Timeframe::M5).unwrap();
    data.bars = vec![
        Bar::new(45180.0, 45200.0, 45100.0, 45120.0),
        Bar::new(45130.0, 45260.0, 45000.0, 45050.0),
    ];
    let run = pipeline::run(&snapshot, &defaults::default_pattern_set());
    assert_eq!(run, PipelineRun::NoSignal { gate: Gate::Trigger });
}

#[test]
fn bearish_environment_never_selects_bullish_only_trigger() {
    let as_of = Utc.with_ymd_and_hms(2026, 3, 2, 14, 35, 0).unwrap();
    // Daily downtrend, but a picture-perfect bullish engulfing on 5m.
    let snapshot = IndicatorSnapshot::new(as_of)
        .with_timeframe(
            Timeframe::D1,
            TimeframeData::new()
                .with_indicator("ema200", 48000.0)
                .with_indicator("ema50", 46000.0)
                .with_indicator("adx", 31.0)
                .with_bars(vec![
                    Bar::new(45900.0, 46000.0, 45300.0, 45400.0),
                    Bar::new(45400.0, 45500.0, 44900.0, 45000.0),
                    Bar::new(45000.0, 45100.0, 44300.0, 44400.0),
                ]),
        )
        .with_timeframe(
            Timeframe::H4,
            TimeframeData::new().with_indicator("ema200", 43800.0),
        )
        .with_timeframe(
            Timeframe::H1,
            TimeframeData::new().with_indicator("rsi", 48.0).with_bars(vec![
                Bar::new(44500.0, 44600.0, 44300.0, 44400.0),
                Bar::new(44400.0, 44500.0, 44200.0, 44350.0),
            ]),
        )
        .with_timeframe(
            Timeframe::M5,
            TimeframeData::new()
                .with_indicator("atr", 90.0)
                .with_indicator("swing_high", 45000.0)
                .with_indicator("swing_low", 44200.0)
                .with_bars(vec![
                    Bar::new(44380.0, 44400.0, 44300.0, 44320.0),
                    Bar::new(44310.0, 44460.0, 44300.0, 44430.0),
                ]),
        );

    let run = pipeline::run(&snapshot, &defaults::default_pattern_set());
    // The bullish-engulfing trigger is restricted to bullish/ranging
    // environments; under trending-bearish nothing fires.
    assert_eq!(run, PipelineRun::NoSignal { gate: Gate::Trigger });
}

#[test]
fn rerun_on_unchanged_inputs_is_identical() {
    let snapshot = bullish_snapshot();
    let patterns = defaults::default_pattern_set();
    let first = pipeline::run(&snapshot, &patterns);
    for _ in 0..3 {
        assert_eq!(pipeline::run(&snapshot, &patterns), first);
    }
}

#[test]
fn signal_serializes_for_downstream_consumers() {
    let run = pipeline::run(&bullish_snapshot(), &defaults::default_pattern_set());
    let json = serde_json::to_string(&run).unwrap();
    let reloaded: PipelineRun = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded, run);
}
