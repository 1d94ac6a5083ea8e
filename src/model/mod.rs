//! Stress Model Engine
//!
//! Estimates how far a token's price falls when a scheduled unlock is
//! sold into the open market over a multi-day window. Pure synchronous
//! computation:
//! - parameter normalization (sell ratio, horizon, depth buckets)
//! - piecewise-linear depth-impact interpolation
//! - a day-by-day loop with liquidity refill and volatility feedback
//!
//! Each run owns its own copy of the depth curve and volatility state,
//! so concurrent runs need no coordination.

pub mod depth;
pub mod params;

use thiserror::Error;
use tracing::debug;

use crate::config::ModelConfig;
use crate::types::{DailyImpact, StressInput, StressResult};
use depth::DepthCurve;

/// Boundary validation fault for genuinely malformed input.
///
/// Degenerate-but-usable inputs (missing ratio, zero days, empty depth
/// map, zero volume) are normalized into safe defaults instead and never
/// produce an error.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Simulation state threaded through the day loop.
///
/// Day `d + 1` sees the refilled curve and updated sigma from day `d`;
/// there is no look-ahead and no backtracking.
#[derive(Debug, Clone)]
pub struct DayState {
    pub curve: DepthCurve,
    pub sigma: f64,
}

/// Per-run inputs that stay constant across the day loop
struct RunContext {
    daily_sell: f64,
    volume_24h: f64,
    order_imbalance: f64,
    flow_pressure_modifier: f64,
}

/// Multi-day unlock stress model
#[derive(Debug, Clone)]
pub struct StressModel {
    config: ModelConfig,
}

impl StressModel {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Run the full simulation for one scenario.
    pub fn run(&self, input: &StressInput) -> Result<StressResult, ModelError> {
        validate(input)?;

        let params = params::normalize(input, &self.config);

        let taker_buy = input.taker_buy_volume_24h.max(0.0);
        let taker_sell = input.taker_sell_volume_24h.max(0.0);
        let flow_ratio = params::sell_flow_ratio(taker_buy, taker_sell);
        let ctx = RunContext {
            daily_sell: params.daily_sell,
            volume_24h: input.volume_24h,
            order_imbalance: input.order_imbalance,
            flow_pressure_modifier: 1.0 + (flow_ratio - 0.5) * self.config.flow_pressure_weight,
        };

        let mut state = DayState {
            curve: DepthCurve::from_buckets(&input.orderbook_depth),
            sigma: input.sigma_7d.max(0.0),
        };

        let mut daily = Vec::with_capacity(params.sell_days as usize);
        let mut cumulative = 0.0;

        for day in 1..=params.sell_days {
            let (record, next_state) = self.advance_day(day, &ctx, state, cumulative);
            cumulative = record.cumulative_impact;
            daily.push(record);
            state = next_state;
        }

        Ok(StressResult {
            params,
            daily,
            final_cumulative_impact_percent: cumulative,
        })
    }

    /// Advance the simulation by one day.
    ///
    /// Pure step: consumes the day's state and returns the day's record
    /// together with the state the next day will see.
    fn advance_day(
        &self,
        day: u32,
        ctx: &RunContext,
        state: DayState,
        cumulative: f64,
    ) -> (DailyImpact, DayState) {
        let cfg = &self.config;

        let raw_depth_drop = state.curve.impact_pct(ctx.daily_sell, cfg);
        // The spread is a one-time cost; charging it every day would
        // overstate the cumulative impact
        let net_depth_drop = (raw_depth_drop - state.curve.spread_offset() * 100.0).max(0.0);

        let mut impact_today = net_depth_drop
            * cfg.impact_scaling
            * (1.0 + state.sigma)
            * (1.0 - ctx.order_imbalance * cfg.imbalance_weight)
            * ctx.flow_pressure_modifier;

        if impact_today > cfg.daily_cap_pct {
            impact_today = cfg.daily_cap_pct;
        }

        let record = DailyImpact {
            day,
            daily_sell: ctx.daily_sell,
            depth_drop: raw_depth_drop,
            impact_today,
            cumulative_impact: cumulative + impact_today,
        };

        debug!(
            day,
            raw_depth_drop,
            impact_today,
            cumulative_impact = record.cumulative_impact,
            sigma = state.sigma,
            "simulated day"
        );

        // Sizeable sell flow relative to daily turnover raises next-day
        // volatility; zero reported volume means no feedback that day
        let mut sigma = state.sigma;
        if ctx.volume_24h > 0.0 {
            sigma *= 1.0 + cfg.sigma_feedback * (ctx.daily_sell / ctx.volume_24h);
        }
        sigma = sigma.min(cfg.sigma_ceiling);

        let next = DayState {
            curve: state.curve.refilled(cfg),
            sigma,
        };

        (record, next)
    }
}

impl Default for StressModel {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

fn validate(input: &StressInput) -> Result<(), ModelError> {
    if !input.unlock_value_usd.is_finite() || input.unlock_value_usd < 0.0 {
        return Err(ModelError::InvalidInput(format!(
            "unlock_value_usd must be a finite non-negative number, got {}",
            input.unlock_value_usd
        )));
    }
    for (name, value) in [
        ("volume_24h", input.volume_24h),
        ("order_imbalance", input.order_imbalance),
        ("taker_buy_volume_24h", input.taker_buy_volume_24h),
        ("taker_sell_volume_24h", input.taker_sell_volume_24h),
        ("sigma_7d", input.sigma_7d),
    ] {
        if !value.is_finite() {
            return Err(ModelError::InvalidInput(format!(
                "{name} must be finite, got {value}"
            )));
        }
    }
    for depth in input.orderbook_depth.values() {
        if !depth.is_finite() {
            return Err(ModelError::InvalidInput(
                "orderbook_depth values must be finite".to_string(),
            ));
        }
    }
    Ok(())
}
