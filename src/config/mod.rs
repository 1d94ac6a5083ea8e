//! Configuration for the stress model
//!
//! All empirical tuning constants live here so the model can be
//! recalibrated from a YAML file + environment variables without touching
//! the algorithm.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Tuning constants for the stress model
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Scaling applied to the net depth drop each day (empirical)
    pub impact_scaling: f64,
    /// Hard ceiling on a single day's impact, in percent
    pub daily_cap_pct: f64,
    /// Daily depth refill multiplier while a bucket is below the deep-book
    /// threshold
    pub refill_shallow: f64,
    /// Daily depth refill multiplier once a bucket is at or above the
    /// deep-book threshold
    pub refill_deep: f64,
    /// USD depth at which a bucket switches to the deep refill rate
    pub deep_book_threshold_usd: f64,
    /// Ceiling on the volatility state
    pub sigma_ceiling: f64,
    /// Coefficient of the sell-pressure volatility feedback
    pub sigma_feedback: f64,
    /// Weight of order imbalance in the daily impact modifier
    pub imbalance_weight: f64,
    /// Weight of the taker sell-flow ratio in the flow pressure modifier
    pub flow_pressure_weight: f64,
    /// Sell ratio assumed when the caller omits one
    pub default_sell_ratio: f64,
    /// Sell horizon assumed when the caller omits one
    pub default_sell_days: u32,
    /// Extrapolation slope (USD per percentage point) used when the curve
    /// has fewer than two buckets
    pub default_slope_usd_per_pct: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            impact_scaling: 0.4,
            daily_cap_pct: 50.0,
            refill_shallow: 1.1,
            refill_deep: 1.4,
            deep_book_threshold_usd: 20_000_000.0,
            sigma_ceiling: 0.10,
            sigma_feedback: 0.3,
            imbalance_weight: 0.25,
            flow_pressure_weight: 0.5,
            default_sell_ratio: 0.2,
            default_sell_days: 7,
            default_slope_usd_per_pct: 1.0,
        }
    }
}

impl ModelConfig {
    /// Load configuration from file and environment
    ///
    /// Defaults reproduce the calibrated model exactly; `config/model.yaml`
    /// (optional) and `UNLOCK_STRESS_*` environment variables override
    /// individual constants.
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = Config::builder()
            .set_default("impact_scaling", defaults.impact_scaling)?
            .set_default("daily_cap_pct", defaults.daily_cap_pct)?
            .set_default("refill_shallow", defaults.refill_shallow)?
            .set_default("refill_deep", defaults.refill_deep)?
            .set_default("deep_book_threshold_usd", defaults.deep_book_threshold_usd)?
            .set_default("sigma_ceiling", defaults.sigma_ceiling)?
            .set_default("sigma_feedback", defaults.sigma_feedback)?
            .set_default("imbalance_weight", defaults.imbalance_weight)?
            .set_default("flow_pressure_weight", defaults.flow_pressure_weight)?
            .set_default("default_sell_ratio", defaults.default_sell_ratio)?
            .set_default("default_sell_days", defaults.default_sell_days as i64)?
            .set_default(
                "default_slope_usd_per_pct",
                defaults.default_slope_usd_per_pct,
            )?
            .add_source(File::with_name("config/model").required(false))
            // Override with environment variables (UNLOCK_STRESS_*)
            .add_source(Environment::with_prefix("UNLOCK_STRESS").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let model_config: ModelConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(model_config)
    }

    /// Generate a digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "scaling={:.2} cap={:.0}% refill={:.2}/{:.2}@{:.0}M sigma_cap={:.2}",
            self.impact_scaling,
            self.daily_cap_pct,
            self.refill_shallow,
            self.refill_deep,
            self.deep_book_threshold_usd / 1_000_000.0,
            self.sigma_ceiling
        )
    }
}
