//! Parameter normalization
//!
//! Turns the loosely-typed caller input into a bounded parameter set:
//! sell-ratio parsing (number, percentage-like number, or "20%"-style
//! text), horizon defaulting, and the derived per-day sell amount.

use crate::config::ModelConfig;
use crate::types::{SellRatio, StressInput, StressParams};

/// Parse a caller-supplied sell ratio into a decimal fraction in [0, 1].
///
/// Total contract: text strips a trailing `%` and parses as a number;
/// any value greater than 1 is treated as a percentage and divided by
/// 100 (so `20` means 20% while `1.0` and `0.2` are already decimals);
/// the result is clamped to [0, 1]. `None` and unparseable text fall
/// back to `default_ratio`.
pub fn parse_sell_ratio(raw: Option<&SellRatio>, default_ratio: f64) -> f64 {
    let value = match raw {
        None => default_ratio,
        Some(SellRatio::Number(n)) => *n,
        Some(SellRatio::Text(s)) => {
            let clean = s.trim().trim_end_matches('%').trim();
            match clean.parse::<f64>() {
                Ok(parsed) => parsed,
                Err(_) => default_ratio,
            }
        }
    };

    if !value.is_finite() {
        return default_ratio.clamp(0.0, 1.0);
    }
    let fraction = if value > 1.0 { value / 100.0 } else { value };
    fraction.clamp(0.0, 1.0)
}

/// Normalize the caller input into run parameters.
///
/// A zero-day horizon yields a zero daily sell rather than a division
/// fault; the run loop then produces an empty daily sequence.
pub fn normalize(input: &StressInput, config: &ModelConfig) -> StressParams {
    let sell_ratio = parse_sell_ratio(input.sell_ratio.as_ref(), config.default_sell_ratio);
    let sell_days = input.sell_days.unwrap_or(config.default_sell_days);

    let effective_sell = input.unlock_value_usd * sell_ratio;
    let daily_sell = if sell_days > 0 {
        effective_sell / sell_days as f64
    } else {
        0.0
    };

    StressParams {
        unlock_total: input.unlock_value_usd,
        sell_ratio,
        sell_days,
        effective_sell,
        daily_sell,
    }
}

/// Share of aggressive flow on the sell side, 0.5 (neutral) when there
/// was no taker flow at all.
pub fn sell_flow_ratio(taker_buy: f64, taker_sell: f64) -> f64 {
    let total = taker_buy + taker_sell;
    if total > 0.0 {
        taker_sell / total
    } else {
        0.5
    }
}
