//! Benchmark for the stress model day loop

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::HashMap;

use unlock_stress::model::StressModel;
use unlock_stress::types::{SellRatio, StressInput};

fn scenario(sell_days: u32) -> StressInput {
    let orderbook_depth: HashMap<String, f64> = [
        ("5", 0.0),
        ("10", 2_000_000.0),
        ("25", 10_000_000.0),
        ("50", 50_000_000.0),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), *v))
    .collect();

    StressInput {
        unlock_value_usd: 100_000_000.0,
        sell_ratio: Some(SellRatio::Number(0.5)),
        sell_days: Some(sell_days),
        orderbook_depth,
        volume_24h: 20_000_000.0,
        order_imbalance: 0.0,
        taker_buy_volume_24h: 1_000_000.0,
        taker_sell_volume_24h: 1_000_000.0,
        sigma_7d: 0.02,
    }
}

fn bench_run(c: &mut Criterion) {
    let model = StressModel::default();

    let week = scenario(7);
    c.bench_function("stress_run_7_days", |b| {
        b.iter(|| model.run(black_box(&week)).unwrap())
    });

    let quarter = scenario(90);
    c.bench_function("stress_run_90_days", |b| {
        b.iter(|| model.run(black_box(&quarter)).unwrap())
    });
}

criterion_group!(benches, bench_run);
criterion_main!(benches);
