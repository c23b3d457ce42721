use chrono::Utc;
use trigate::config::{self, defaults};
use trigate::logging::init_logging;
use trigate::models::snapshot::{Bar, IndicatorSnapshot, Timeframe, TimeframeData};
use trigate::models::PipelineRun;
use trigate::signals::pipeline;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let patterns = match std::env::var("PATTERNS_FILE") {
        Ok(path) => config::load_pattern_set(std::path::Path::new(&path))?,
        Err(_) => defaults::default_pattern_set(),
    };

    let snapshot = sample_snapshot();
    match pipeline::run(&snapshot, &patterns) {
        PipelineRun::Signal(signal) => print_signal(&signal),
        PipelineRun::NoSignal { gate } => println!("No signal (stopped at {:?} gate)", gate),
    }

    Ok(())
}

/// Hand-built bullish snapshot: daily uptrend, hourly pullback, 5-minute
/// bullish engulfing bar.
fn sample_snapshot() -> IndicatorSnapshot {
    IndicatorSnapshot::new(Utc::now())
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
            TimeframeData::new()
                .with_indicator("rsi", 48.0)
                .with_bars(vec![
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

fn print_signal(signal: &trigate::models::Signal) {
    println!("Signal:");
    println!("  Direction: {:?}", signal.direction);
    println!(
        "  Environment: {} ({:.0}%)",
        signal.environment.pattern,
        signal.environment.confidence * 100.0
    );
    println!(
        "  Scenario: {} ({:.0}%)",
        signal.scenario.pattern,
        signal.scenario.confidence * 100.0
    );
    println!(
        "  Trigger: {} ({:.0}%)",
        signal.trigger.pattern,
        signal.trigger.confidence * 100.0
    );
    println!("  Entry: {:.2}", signal.entry);
    println!("  Stop loss: {:.2}", signal.stop_loss);
    for (i, tp) in signal.take_profits.iter().enumerate() {
        println!("  Take profit {}: {:.2}", i + 1, tp);
    }
}
