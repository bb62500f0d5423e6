//! Chart formatting for drill-down series, plus the KPI prompt text built from
//! the same numbers.

use serde::{Deserialize, Serialize};

use crate::drilldown::kpi::{Dimension, Kpi, Unit};
use crate::hiring::aggregates::round_to_int;
use crate::store::SeriesPoint;

/// A series point that has a value. Still in raw units (rates are fractions).
#[derive(Debug, Clone, PartialEq)]
pub struct Observed {
    pub label: String,
    pub value: f64,
}

/// Chart-ready point: percentages scaled, every value rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: i64,
}

/// Drops points whose aggregate came back NULL.
pub fn observed(points: Vec<SeriesPoint>) -> Vec<Observed> {
    points
        .into_iter()
        .filter_map(|p| p.value.map(|value| Observed { label: p.label, value }))
        .collect()
}

pub fn format_points(points: &[Observed], unit: Unit) -> Vec<ChartPoint> {
    points
        .iter()
        .map(|p| ChartPoint {
            label: p.label.clone(),
            value: round_to_int(p.value * unit.scale()),
        })
        .collect()
}

/// Headline total shown above the charts: the sum of the displayed breakdown values.
pub fn total_of(breakdown: &[ChartPoint]) -> i64 {
    breakdown.iter().map(|p| p.value).sum()
}

pub fn kpi_prompt(
    kpi: Kpi,
    total: i64,
    trend: &[Observed],
    breakdown_by: Dimension,
    breakdown: &[Observed],
) -> String {
    format!(
        "Data for '{}' KPI on a selection of {total} hires.\n\n\
         Monthly Trend:\n{}\n\n\
         Breakdown by {}:\n{}",
        kpi.title(),
        join_points(trend),
        breakdown_by.title(),
        join_points(breakdown)
    )
}

fn join_points(points: &[Observed]) -> String {
    points
        .iter()
        .map(|p| format!("{}: {:.2}", p.label, p.value))
        .collect::<Vec<_>>()
        .join(", ")
}
