//! Order-book depth curve
//!
//! Parses the caller's sparse depth buckets into a sorted working curve,
//! interpolates the price drop a given sell amount would cause, and applies
//! the daily liquidity refill.

use std::collections::HashMap;

use crate::config::ModelConfig;
use crate::types::DepthLevel;

/// Sorted working copy of the order-book depth curve for one run
#[derive(Debug, Clone, PartialEq)]
pub struct DepthCurve {
    /// Levels sorted ascending by `drop_pct`. Duplicate pairs are kept:
    /// a zero-depth bucket at some level means "no liquidity until this
    /// point" and must stay distinguishable from a deduplicated curve.
    levels: Vec<DepthLevel>,
    /// Drop fraction at which depth is still zero (the bid-ask spread),
    /// or 0 when every bucket carries liquidity
    spread_offset: f64,
}

impl DepthCurve {
    /// Build a curve from the caller's `"drop-percent label" → USD depth`
    /// mapping. Labels that do not parse as numbers are skipped.
    pub fn from_buckets(buckets: &HashMap<String, f64>) -> Self {
        let mut levels: Vec<DepthLevel> = buckets
            .iter()
            .filter_map(|(label, depth)| {
                label.trim().parse::<f64>().ok().map(|pct| DepthLevel {
                    drop_pct: pct / 100.0,
                    depth_usd: *depth,
                })
            })
            .collect();
        levels.sort_by(|a, b| a.drop_pct.total_cmp(&b.drop_pct));

        let spread_offset = levels
            .iter()
            .find(|l| l.depth_usd == 0.0)
            .map(|l| l.drop_pct)
            .unwrap_or(0.0);

        Self {
            levels,
            spread_offset,
        }
    }

    /// Drop fraction consumed by the bid-ask spread before any real
    /// liquidity is reachable
    pub fn spread_offset(&self) -> f64 {
        self.spread_offset
    }

    pub fn levels(&self) -> &[DepthLevel] {
        &self.levels
    }

    /// Percentage price drop caused by selling `sell_usd` into the curve,
    /// under a piecewise-linear model.
    pub fn impact_pct(&self, sell_usd: f64, config: &ModelConfig) -> f64 {
        let Some(first) = self.levels.first() else {
            return 0.0;
        };

        if sell_usd <= first.depth_usd {
            // Linear from the origin to the first bucket; floor the
            // denominator at 1 USD so a zero-depth first bucket cannot
            // divide by zero
            let ratio = sell_usd / first.depth_usd.max(1.0);
            return first.drop_pct * 100.0 * ratio;
        }

        for pair in self.levels.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if sell_usd > prev.depth_usd && sell_usd <= next.depth_usd {
                // Identical depths form a zero-width segment; keep scanning
                if next.depth_usd == prev.depth_usd {
                    continue;
                }
                let progress = (sell_usd - prev.depth_usd) / (next.depth_usd - prev.depth_usd);
                return (prev.drop_pct + (next.drop_pct - prev.drop_pct) * progress) * 100.0;
            }
        }

        let deepest = self.levels[self.levels.len() - 1];
        if sell_usd <= deepest.depth_usd {
            return deepest.drop_pct * 100.0;
        }

        // Beyond the book: extrapolate along the slope of the two deepest
        // buckets, in USD per percentage point
        let mut slope = config.default_slope_usd_per_pct;
        if self.levels.len() > 1 {
            let second = self.levels[self.levels.len() - 2];
            let pct_diff = (deepest.drop_pct - second.drop_pct) * 100.0;
            if pct_diff != 0.0 {
                slope = (deepest.depth_usd - second.depth_usd) / pct_diff;
            }
        }

        let needed = sell_usd - deepest.depth_usd;
        deepest.drop_pct * 100.0 + needed / slope
    }

    /// Next-day curve after market makers replenish liquidity. Shallow
    /// buckets refill slower than a book that is already deep.
    pub fn refilled(&self, config: &ModelConfig) -> Self {
        let levels = self
            .levels
            .iter()
            .map(|l| {
                let rate = if l.depth_usd < config.deep_book_threshold_usd {
                    config.refill_shallow
                } else {
                    config.refill_deep
                };
                DepthLevel {
                    drop_pct: l.drop_pct,
                    depth_usd: l.depth_usd * rate,
                }
            })
            .collect();

        Self {
            levels,
            spread_offset: self.spread_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_buckets_sorted_and_spread_detected() {
        let curve = DepthCurve::from_buckets(&buckets(&[
            ("20", 5_000_000.0),
            ("5", 0.0),
            ("10", 1_000_000.0),
        ]));

        let pcts: Vec<f64> = curve.levels().iter().map(|l| l.drop_pct).collect();
        assert_eq!(pcts, vec![0.05, 0.10, 0.20]);
        assert_eq!(curve.spread_offset(), 0.05);
    }

    #[test]
    fn test_no_zero_bucket_means_no_spread_offset() {
        let curve = DepthCurve::from_buckets(&buckets(&[("5", 100.0), ("10", 200.0)]));
        assert_eq!(curve.spread_offset(), 0.0);
    }

    #[test]
    fn test_unparseable_labels_are_skipped() {
        let curve = DepthCurve::from_buckets(&buckets(&[("abc", 100.0), ("10", 200.0)]));
        assert_eq!(curve.levels().len(), 1);
        assert_eq!(curve.levels()[0].drop_pct, 0.10);
    }

    #[test]
    fn test_empty_curve_has_zero_impact() {
        let curve = DepthCurve::from_buckets(&HashMap::new());
        assert_eq!(curve.impact_pct(1_000_000.0, &ModelConfig::default()), 0.0);
    }

    #[test]
    fn test_exact_bucket_hit() {
        let cfg = ModelConfig::default();
        let curve = DepthCurve::from_buckets(&buckets(&[
            ("5", 0.0),
            ("10", 1_000_000.0),
            ("20", 5_000_000.0),
        ]));
        // Selling exactly the depth of the 10% bucket lands on 10%
        assert!((curve.impact_pct(1_000_000.0, &cfg) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_interpolation_between_buckets() {
        let cfg = ModelConfig::default();
        let curve = DepthCurve::from_buckets(&buckets(&[
            ("5", 0.0),
            ("10", 1_000_000.0),
            ("20", 5_000_000.0),
        ]));
        // 500k is halfway between the 0-depth 5% bucket and the 1M 10%
        // bucket: 5% + 0.5 * 5% = 7.5%
        assert!((curve.impact_pct(500_000.0, &cfg) - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_depth_first_bucket_does_not_divide_by_zero() {
        let cfg = ModelConfig::default();
        let curve = DepthCurve::from_buckets(&buckets(&[("5", 0.0)]));
        let impact = curve.impact_pct(0.0, &cfg);
        assert!(impact.is_finite());
        assert_eq!(impact, 0.0);
    }

    #[test]
    fn test_flat_segment_is_skipped() {
        let cfg = ModelConfig::default();
        let curve = DepthCurve::from_buckets(&buckets(&[
            ("5", 1_000_000.0),
            ("10", 2_000_000.0),
            ("15", 2_000_000.0),
            ("20", 4_000_000.0),
        ]));
        // 2M sits on the flat 10%/15% pair at the top of the 5%→10%
        // segment; the first matching pair (5%→10%) resolves it
        let impact = curve.impact_pct(2_000_000.0, &cfg);
        assert!(impact.is_finite());
        assert!((impact - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_extrapolation_beyond_deepest_bucket() {
        let cfg = ModelConfig::default();
        let curve = DepthCurve::from_buckets(&buckets(&[
            ("10", 1_000_000.0),
            ("20", 2_000_000.0),
        ]));
        // Slope: (2M - 1M) / (20 - 10) = 100k USD per percentage point.
        // Selling 3M exceeds the book by 1M → 20% + 10% = 30%
        assert!((curve.impact_pct(3_000_000.0, &cfg) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_extrapolation_single_bucket_uses_default_slope() {
        let cfg = ModelConfig::default();
        let curve = DepthCurve::from_buckets(&buckets(&[("10", 100.0)]));
        // Default slope is 1 USD per percentage point
        let impact = curve.impact_pct(150.0, &cfg);
        assert!((impact - (10.0 + 50.0)).abs() < 1e-9);
    }

    #[test]
    fn test_refill_rates_split_at_threshold() {
        let cfg = ModelConfig::default();
        let curve = DepthCurve::from_buckets(&buckets(&[
            ("10", 1_000_000.0),
            ("25", 50_000_000.0),
        ]));
        let next = curve.refilled(&cfg);
        assert!((next.levels()[0].depth_usd - 1_100_000.0).abs() < 1e-6);
        assert!((next.levels()[1].depth_usd - 70_000_000.0).abs() < 1e-6);
        // Spread offset is a property of the original book, not refilled
        assert_eq!(next.spread_offset(), curve.spread_offset());
    }
}
