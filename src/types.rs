//! Core types used throughout the stress simulator
//!
//! Defines the input contract supplied by the dashboard layer and the
//! output records it renders.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sell ratio as supplied by the caller.
///
/// Dashboards send this field loosely typed: a decimal fraction (`0.2`),
/// a percentage-like number (`20`), or a string with an optional trailing
/// percent sign (`"20%"`). Parsing into a clamped decimal fraction happens
/// in [`crate::model::params::parse_sell_ratio`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SellRatio {
    Number(f64),
    Text(String),
}

/// Caller-supplied stress scenario, immutable for the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressInput {
    /// Total USD value of tokens being unlocked
    pub unlock_value_usd: f64,
    /// Fraction of the unlock actually sold (defaults to 20%)
    #[serde(default)]
    pub sell_ratio: Option<SellRatio>,
    /// Number of simulated sell days (defaults to 7)
    #[serde(default)]
    pub sell_days: Option<u32>,
    /// Price-drop-percentage label (e.g. "5" = 5% drop) → cumulative USD
    /// depth available up to that drop level
    pub orderbook_depth: HashMap<String, f64>,
    /// 24h traded USD volume, normalizer for the volatility feedback
    pub volume_24h: f64,
    /// Net buy/sell pressure in the book, roughly in [-1, 1]
    pub order_imbalance: f64,
    /// Aggressive buy volume over the last 24h (USD)
    #[serde(default)]
    pub taker_buy_volume_24h: f64,
    /// Aggressive sell volume over the last 24h (USD)
    #[serde(default)]
    pub taker_sell_volume_24h: f64,
    /// Trailing 7-day volatility as a decimal (e.g. 0.05)
    pub sigma_7d: f64,
}

/// One point on the order-book depth curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    /// Price drop as a fraction (0.05 = 5%)
    pub drop_pct: f64,
    /// Cumulative USD depth available up to this drop level
    pub depth_usd: f64,
}

/// Normalized run parameters, echoed back in the result
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StressParams {
    /// Total USD unlock value
    pub unlock_total: f64,
    /// Normalized sell ratio in [0, 1]
    pub sell_ratio: f64,
    /// Number of simulated days
    pub sell_days: u32,
    /// USD actually sold over the whole horizon
    pub effective_sell: f64,
    /// USD sold per simulated day
    pub daily_sell: f64,
}

/// Output record for one simulated day
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DailyImpact {
    /// 1-based day index
    pub day: u32,
    /// USD sold this day
    pub daily_sell: f64,
    /// Raw interpolated drop percent from the depth curve, before the
    /// spread offset is removed (kept for display/debugging)
    pub depth_drop: f64,
    /// Percent impact actually applied after all modifiers and the
    /// single-day cap
    pub impact_today: f64,
    /// Running sum of `impact_today` up to and including this day
    pub cumulative_impact: f64,
}

/// Final simulation output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressResult {
    pub params: StressParams,
    /// Per-day impact records, ordered by day ascending
    pub daily: Vec<DailyImpact>,
    /// Last day's cumulative impact, or 0 for a zero-day run
    pub final_cumulative_impact_percent: f64,
}

impl StressResult {
    /// Project a current market price through the simulation.
    ///
    /// Returns one `(day, price)` per simulated day, applying that day's
    /// cumulative impact percentage to `current_price`. This is the same
    /// arithmetic the dashboard uses to draw the day-indexed price curve.
    pub fn projected_prices(&self, current_price: f64) -> Vec<(u32, f64)> {
        self.daily
            .iter()
            .map(|d| (d.day, current_price * (1.0 - d.cumulative_impact / 100.0)))
            .collect()
    }
}
