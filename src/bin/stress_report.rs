//! Scenario runner for the unlock stress model
//!
//! Usage: cargo run --bin stress_report [scenario.json]
//!
//! Reads a `StressInput` scenario from a JSON file (or falls back to a
//! built-in sample) and prints the simulation result as pretty JSON.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use tracing::info;

use unlock_stress::config::ModelConfig;
use unlock_stress::model::StressModel;
use unlock_stress::types::{StressInput, StressResult};

#[derive(Serialize)]
struct Report {
    generated_at: DateTime<Utc>,
    scenario: StressInput,
    result: StressResult,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = ModelConfig::load()?;
    let model = StressModel::new(config);
    info!("model config: {}", model.config().digest());

    let input = match std::env::args().nth(1) {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read scenario file {path}"))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse scenario file {path}"))?
        }
        None => {
            info!("no scenario file given, using built-in sample");
            sample_scenario()?
        }
    };

    let result = model
        .run(&input)
        .context("Stress model rejected the scenario")?;

    info!(
        days = result.params.sell_days,
        final_cumulative_impact_percent = result.final_cumulative_impact_percent,
        "simulation complete"
    );

    let report = Report {
        generated_at: Utc::now(),
        scenario: input,
        result,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// A mid-cap unlock sold over a working week
fn sample_scenario() -> Result<StressInput> {
    let input = serde_json::from_str(
        r#"{
            "unlock_value_usd": 100000000.0,
            "sell_ratio": "50%",
            "sell_days": 5,
            "orderbook_depth": {
                "5": 0,
                "10": 2000000,
                "25": 10000000,
                "50": 50000000
            },
            "volume_24h": 20000000.0,
            "order_imbalance": 0.0,
            "taker_buy_volume_24h": 1000000.0,
            "taker_sell_volume_24h": 1000000.0,
            "sigma_7d": 0.02
        }"#,
    )?;
    Ok(input)
}
