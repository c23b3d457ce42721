//! Built-in pattern set used by the demo binary and as a test fixture
//!
//! Mirrors a conventional multi-timeframe setup: daily environment,
//! hourly scenario, 5-minute trigger.

use crate::models::pattern::{Condition, Operator, PatternDefinition, PatternSet, Reference};
use crate::models::snapshot::Timeframe;

fn indicator(name: &str) -> Reference {
    Reference::Indicator {
        name: name.to_string(),
        timeframe: None,
    }
}

/// Default three-gate configuration.
pub fn default_pattern_set() -> PatternSet {
    PatternSet {
        environment: vec![
            PatternDefinition::new(
                "trending-bullish",
                vec![
                    Condition::new(
                        "close-above-ema200",
                        "close",
                        Timeframe::D1,
                        Operator::GreaterThan,
                        indicator("ema200"),
                    )
                    .with_weight(2.0),
                    Condition::new(
                        "rising-closes",
                        "close",
                        Timeframe::D1,
                        Operator::AllAbove,
                        indicator("ema50"),
                    ),
                    Condition::new(
                        "adx-trending",
                        "adx",
                        Timeframe::D1,
                        Operator::GreaterThan,
                        Reference::Value(25.0),
                    ),
                ],
                0.6,
            ),
            PatternDefinition::new(
                "trending-bearish",
                vec![
                    Condition::new(
                        "close-below-ema200",
                        "close",
                        Timeframe::D1,
                        Operator::LessThan,
                        indicator("ema200"),
                    )
                    .with_weight(2.0),
                    Condition::new(
                        "falling-closes",
                        "close",
                        Timeframe::D1,
                        Operator::AllBelow,
                        indicator("ema50"),
                    ),
                    Condition::new(
                        "adx-trending",
                        "adx",
                        Timeframe::D1,
                        Operator::GreaterThan,
                        Reference::Value(25.0),
                    ),
                ],
                0.6,
            ),
            PatternDefinition::new(
                "ranging",
                vec![
                    Condition::new(
                        "adx-flat",
                        "adx",
                        Timeframe::D1,
                        Operator::LessThan,
                        Reference::Value(20.0),
                    ),
                    Condition::new(
                        "close-near-ema200",
                        "close",
                        Timeframe::D1,
                        Operator::ApproxEqual,
                        indicator("ema200"),
                    ),
                ],
                0.5,
            ),
        ],
        scenario: vec![
            PatternDefinition::new(
                "pullback",
                vec![
                    Condition::new(
                        "rsi-reset",
                        "rsi",
                        Timeframe::H1,
                        Operator::LessThan,
                        Reference::Value(55.0),
                    ),
                    Condition::new(
                        "above-higher-tf-support",
                        "close",
                        Timeframe::H1,
                        Operator::GreaterThan,
                        Reference::Indicator {
                            name: "ema200".to_string(),
                            timeframe: Some(Timeframe::H4),
                        },
                    ),
                ],
                0.5,
            ),
            PatternDefinition::new(
                "breakout",
                vec![
                    Condition::new(
                        "closes-above-range-high",
                        "close",
                        Timeframe::H1,
                        Operator::AllAbove,
                        indicator("range_high"),
                    ),
                    Condition::new(
                        "volume-expansion",
                        "volume_ratio",
                        Timeframe::H1,
                        Operator::GreaterThan,
                        Reference::Value(1.2),
                    ),
                ],
                0.5,
            ),
        ],
        trigger: vec![
            PatternDefinition::new(
                "bullish-engulfing",
                vec![
                    Condition::new(
                        "engulfing-up",
                        "close",
                        Timeframe::M5,
                        Operator::Engulfing,
                        Reference::Value(1.0),
                    )
                    .with_weight(2.0),
                    Condition::new(
                        "bullish-candle",
                        "close",
                        Timeframe::M5,
                        Operator::GreaterThan,
                        indicator("open"),
                    ),
                ],
                0.6,
            )
            .with_required(&["bullish-candle"])
            .with_environments(&["trending-bullish", "ranging"]),
            PatternDefinition::new(
                "bearish-engulfing",
                vec![
                    Condition::new(
                        "engulfing-down",
                        "close",
                        Timeframe::M5,
                        Operator::Engulfing,
                        Reference::Value(-1.0),
                    )
                    .with_weight(2.0),
                    Condition::new(
                        "bearish-candle",
                        "close",
                        Timeframe::M5,
                        Operator::LessThan,
                        indicator("open"),
                    ),
                ],
                0.6,
            )
            .with_required(&["bearish-candle"])
            .with_environments(&["trending-bearish", "ranging"]),
        ],
    }
}
