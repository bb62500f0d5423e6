//! Tier 3: signal detection. Each detector fires independently; the emitted
//! order is fixed (trend, costliest source, cost outliers, build/buy, diversity).

use std::fmt;

use crate::analysis::stats::{distinct_count, linear_regression, mean, z_scores};
use crate::analysis::tiers::{by_source, column, percent, Descriptive};
use crate::analysis::{AnalysisError, InsightGroup};
use crate::models::hiring::flag;

/// Regression needs strictly more distinct hire days than this.
pub const MIN_DISTINCT_DAYS: usize = 10;
/// Outlier detection needs strictly more rows than this.
pub const MIN_ROWS_FOR_OUTLIERS: usize = 10;
pub const SIGNIFICANCE: f64 = 0.05;
pub const OUTLIER_Z: f64 = 2.0;
pub const BUILD_SHARE_BOUNDS: (f64, f64) = (0.25, 0.75);
pub const DIVERSITY_BOUNDS: (f64, f64) = (0.15, 0.85);

pub const NO_SIGNALS: &str = "No deep signals";

#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    RisingTimeToFill {
        /// Days of time-to-fill added per elapsed calendar day.
        slope: f64,
        p_value: f64,
    },
    CostliestSource {
        source: String,
        mean_cost: f64,
        diversity_rate: f64,
    },
    CostOutliers {
        count: usize,
    },
    BuildBuyImbalance {
        build_share: f64,
    },
    DiversityOutlier {
        diversity_rate: f64,
    },
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::RisingTimeToFill { slope, p_value } => write!(
                f,
                "Time to Fill rising by {slope:.2} days per elapsed day (p={p_value:.4})"
            ),
            Signal::CostliestSource {
                source,
                mean_cost,
                diversity_rate,
            } => write!(
                f,
                "Source '{source}' has high cost ({}) and diversity: {}",
                mean_cost.trunc() as i64,
                percent(*diversity_rate)
            ),
            Signal::CostOutliers { count } => {
                write!(f, "{count} cost outlier(s) detected (Z > {OUTLIER_Z})")
            }
            Signal::BuildBuyImbalance { build_share } => {
                write!(f, "Build/Buy imbalance: {}", percent(*build_share))
            }
            Signal::DiversityOutlier { diversity_rate } => {
                write!(f, "Diversity outlier: {}", percent(*diversity_rate))
            }
        }
    }
}

pub fn detect_signals(
    group: &InsightGroup<'_>,
    descriptive: &Descriptive,
) -> Result<Vec<Signal>, AnalysisError> {
    let mut signals = Vec::new();

    if let Some(signal) = rising_time_to_fill(group)? {
        signals.push(signal);
    }
    if let Some(signal) = costliest_source(group)? {
        signals.push(signal);
    }
    if let Some(signal) = cost_outliers(group)? {
        signals.push(signal);
    }
    if outside(descriptive.build_share, BUILD_SHARE_BOUNDS) {
        signals.push(Signal::BuildBuyImbalance {
            build_share: descriptive.build_share,
        });
    }
    if outside(descriptive.diversity_rate, DIVERSITY_BOUNDS) {
        signals.push(Signal::DiversityOutlier {
            diversity_rate: descriptive.diversity_rate,
        });
    }

    Ok(signals)
}

/// Strictly below the lower bound or strictly above the upper one.
fn outside(value: f64, (low, high): (f64, f64)) -> bool {
    value < low || value > high
}

fn rising_time_to_fill(group: &InsightGroup<'_>) -> Result<Option<Signal>, AnalysisError> {
    let records = &group.records;
    let Some(first_hire) = records.iter().map(|r| r.hire_date).min() else {
        return Ok(None);
    };

    let days: Vec<i64> = records
        .iter()
        .map(|r| (r.hire_date - first_hire).num_days())
        .collect();
    if distinct_count(days.iter().copied()) <= MIN_DISTINCT_DAYS
        || distinct_count(records.iter().map(|r| r.time_to_fill)) <= 1
    {
        return Ok(None);
    }

    let xs: Vec<f64> = days.iter().map(|d| *d as f64).collect();
    let ys = column(records, |r| r.time_to_fill as f64);
    let fit = linear_regression(&xs, &ys)?;

    Ok((fit.p_value < SIGNIFICANCE && fit.slope > 0.0).then_some(Signal::RisingTimeToFill {
        slope: fit.slope,
        p_value: fit.p_value,
    }))
}

fn costliest_source(group: &InsightGroup<'_>) -> Result<Option<Signal>, AnalysisError> {
    let mut costliest: Option<Signal> = None;
    let mut highest_cost = f64::NEG_INFINITY;

    // by_source iterates in name order, so equal costs keep the first name.
    for (source, rows) in by_source(&group.records) {
        let mean_cost = mean(&column(&rows, |r| r.cost_per_hire as f64))?;
        if mean_cost > highest_cost {
            highest_cost = mean_cost;
            costliest = Some(Signal::CostliestSource {
                source: source.to_string(),
                mean_cost,
                diversity_rate: mean(&column(&rows, |r| flag(r.diversity_ratio)))?,
            });
        }
    }
    Ok(costliest)
}

fn cost_outliers(group: &InsightGroup<'_>) -> Result<Option<Signal>, AnalysisError> {
    let records = &group.records;
    if records.len() <= MIN_ROWS_FOR_OUTLIERS
        || distinct_count(records.iter().map(|r| r.cost_per_hire)) <= 1
    {
        return Ok(None);
    }

    let scores = z_scores(&column(records, |r| r.cost_per_hire as f64))?;
    let count = scores.iter().filter(|z| **z > OUTLIER_Z).count();
    Ok((count > 0).then_some(Signal::CostOutliers { count }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::{group, hire, linear_partition};
    use crate::analysis::tiers::describe;

    fn signals_for(records: &[crate::models::hiring::HiringRecord]) -> Vec<Signal> {
        let g = group(records, None);
        let d = describe(&g).unwrap();
        detect_signals(&g, &d).unwrap()
    }

    #[test]
    fn test_rising_trend_fires_on_injected_slope() {
        let records = linear_partition(15, 2);
        let signals = signals_for(&records);
        match &signals[0] {
            Signal::RisingTimeToFill { slope, p_value } => {
                assert!((slope - 2.0).abs() < 1e-9);
                assert!(*p_value < 1e-6);
            }
            other => panic!("expected rising trend first, got {other:?}"),
        }
    }

    #[test]
    fn test_flat_trend_does_not_fire() {
        let records = linear_partition(15, 0);
        let signals = signals_for(&records);
        assert!(!signals
            .iter()
            .any(|s| matches!(s, Signal::RisingTimeToFill { .. })));
    }

    #[test]
    fn test_falling_trend_does_not_fire() {
        let records = linear_partition(15, -1);
        assert!(!signals_for(&records)
            .iter()
            .any(|s| matches!(s, Signal::RisingTimeToFill { .. })));
    }

    #[test]
    fn test_insignificant_rising_trend_does_not_fire() {
        let noisy = [40, 60, 35, 55, 42, 38, 61, 33, 50, 45, 39, 58, 36, 52, 47];
        let mut records = linear_partition(15, 0);
        for (record, ttf) in records.iter_mut().zip(noisy) {
            record.time_to_fill = ttf;
        }

        // Slightly positive slope, far from significant: only the p-value gate blocks it.
        let xs: Vec<f64> = (0..15).map(f64::from).collect();
        let ys: Vec<f64> = noisy.iter().map(|&v| f64::from(v)).collect();
        let fit = linear_regression(&xs, &ys).unwrap();
        assert!(fit.slope > 0.0);
        assert!(fit.p_value >= SIGNIFICANCE);

        assert!(!signals_for(&records)
            .iter()
            .any(|s| matches!(s, Signal::RisingTimeToFill { .. })));
    }

    #[test]
    fn test_trend_needs_more_than_ten_distinct_days() {
        // Exactly ten distinct days, perfect rising line: gate keeps it silent.
        let records = linear_partition(10, 3);
        assert!(!signals_for(&records)
            .iter()
            .any(|s| matches!(s, Signal::RisingTimeToFill { .. })));
    }

    #[test]
    fn test_costliest_source_is_reported() {
        let records = vec![
            hire("2025-01-10", 30_000, 20, "Referral", "Build", false),
            hire("2025-01-11", 90_500, 20, "Agency", "Build", true),
            hire("2025-01-12", 80_000, 20, "Agency", "Buy", false),
            hire("2025-01-13", 50_000, 20, "LinkedIn", "Buy", false),
        ];
        let signals = signals_for(&records);
        let costliest = signals
            .iter()
            .find(|s| matches!(s, Signal::CostliestSource { .. }))
            .unwrap();
        assert_eq!(
            costliest.to_string(),
            "Source 'Agency' has high cost (85250) and diversity: 50.0%"
        );
    }

    #[test]
    fn test_cost_outliers_are_counted() {
        let mut records: Vec<_> = (0..11)
            .map(|i| hire(&format!("2025-02-{:02}", i + 1), 50_000 + i * 10, 30, "Referral", "Build", false))
            .collect();
        records.push(hire("2025-03-01", 500_000, 30, "Agency", "Buy", true));
        let signals = signals_for(&records);
        assert!(signals.contains(&Signal::CostOutliers { count: 1 }));
    }

    #[test]
    fn test_outliers_need_more_than_ten_rows() {
        let mut records: Vec<_> = (0..9)
            .map(|i| hire(&format!("2025-02-{:02}", i + 1), 50_000, 30, "Referral", "Build", false))
            .collect();
        records.push(hire("2025-03-01", 900_000, 30, "Agency", "Buy", true));
        assert!(!signals_for(&records)
            .iter()
            .any(|s| matches!(s, Signal::CostOutliers { .. })));
    }

    #[test]
    fn test_build_share_boundaries_do_not_fire() {
        let quarter = vec![
            hire("2025-01-10", 1, 1, "A", "Build", false),
            hire("2025-01-11", 1, 1, "A", "Buy", true),
            hire("2025-01-12", 1, 1, "A", "Buy", false),
            hire("2025-01-13", 1, 1, "A", "Buy", true),
        ];
        let three_quarters = vec![
            hire("2025-01-10", 1, 1, "A", "Build", false),
            hire("2025-01-11", 1, 1, "A", "Build", true),
            hire("2025-01-12", 1, 1, "A", "Build", false),
            hire("2025-01-13", 1, 1, "A", "Buy", true),
        ];
        for records in [quarter, three_quarters] {
            assert!(!signals_for(&records)
                .iter()
                .any(|s| matches!(s, Signal::BuildBuyImbalance { .. })));
        }
    }

    #[test]
    fn test_build_share_outside_bounds_fires() {
        let all_buy = vec![
            hire("2025-01-10", 1, 1, "A", "Buy", false),
            hire("2025-01-11", 1, 1, "A", "Buy", true),
        ];
        let signals = signals_for(&all_buy);
        assert!(signals.contains(&Signal::BuildBuyImbalance { build_share: 0.0 }));
        assert_eq!(
            Signal::BuildBuyImbalance { build_share: 0.0 }.to_string(),
            "Build/Buy imbalance: 0.0%"
        );
    }

    #[test]
    fn test_diversity_boundaries_do_not_fire() {
        // 3 of 20 and 17 of 20 diverse hires: exactly 15% and 85%.
        for diverse in [3, 17] {
            let records: Vec<_> = (0..20)
                .map(|i| {
                    hire(
                        &format!("2025-01-{:02}", i + 1),
                        1,
                        1,
                        "A",
                        if i % 2 == 0 { "Build" } else { "Buy" },
                        i < diverse,
                    )
                })
                .collect();
            let signals = signals_for(&records);
            assert!(
                !signals
                    .iter()
                    .any(|s| matches!(s, Signal::DiversityOutlier { .. })),
                "{diverse} of 20 diverse hires fired {signals:?}"
            );
        }
    }

    #[test]
    fn test_diversity_outlier_fires() {
        let records = vec![
            hire("2025-01-10", 1, 1, "A", "Build", true),
            hire("2025-01-11", 1, 1, "A", "Buy", true),
        ];
        assert!(signals_for(&records).contains(&Signal::DiversityOutlier { diversity_rate: 1.0 }));
    }

    #[test]
    fn test_signal_order_is_fixed() {
        let mut records = linear_partition(15, 2);
        for r in &mut records {
            r.build_buy_ratio = "Buy".to_string();
            r.diversity_ratio = false;
        }
        let kinds: Vec<u8> = signals_for(&records)
            .iter()
            .map(|s| match s {
                Signal::RisingTimeToFill { .. } => 1,
                Signal::CostliestSource { .. } => 2,
                Signal::CostOutliers { .. } => 3,
                Signal::BuildBuyImbalance { .. } => 4,
                Signal::DiversityOutlier { .. } => 5,
            })
            .collect();
        let mut sorted = kinds.clone();
        sorted.sort();
        assert_eq!(kinds, sorted);
        assert!(kinds.contains(&1) && kinds.contains(&4) && kinds.contains(&5));
    }
}
