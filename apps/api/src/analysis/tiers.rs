//! Descriptive (tier 1) and operational (tier 2) metrics of one partition.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;

use crate::analysis::stats::{distinct_count, mean};
use crate::analysis::{AnalysisError, InsightGroup};
use crate::models::hiring::{flag, HiringRecord};

/// Months assumed in the hiring window when counting stagnant months.
/// Fixed regardless of the filtered date range.
pub const HIRING_WINDOW_MONTHS: usize = 12;

const TOP_SOURCE_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Descriptive {
    pub total_hires: usize,
    pub avg_time_to_fill: f64,
    pub avg_cost_per_hire: f64,
    pub build_share: f64,
    pub ijp_rate: f64,
    pub diversity_rate: f64,
    /// Most frequent sourcing channels, most frequent first.
    pub top_sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operational {
    /// None when the partition has no matching summary row.
    pub headcount_gap: Option<i32>,
    /// hires / (gap + 1); None without a summary row or when gap = -1.
    pub coverage: Option<f64>,
    pub hiring_months: usize,
    pub stagnant_months: usize,
    pub top_source: String,
    /// The most frequent source costs more than the partition average.
    pub top_source_inefficient: bool,
}

pub fn describe(group: &InsightGroup<'_>) -> Result<Descriptive, AnalysisError> {
    let records = &group.records;
    if records.is_empty() {
        return Err(AnalysisError::EmptyPartition);
    }

    Ok(Descriptive {
        total_hires: records.len(),
        avg_time_to_fill: mean(&column(records, |r| r.time_to_fill as f64))?,
        avg_cost_per_hire: mean(&column(records, |r| r.cost_per_hire as f64))?,
        build_share: mean(&column(records, |r| flag(r.is_build())))?,
        ijp_rate: mean(&column(records, |r| flag(r.ijp_adherence)))?,
        diversity_rate: mean(&column(records, |r| flag(r.diversity_ratio)))?,
        top_sources: sources_by_frequency(records)
            .into_iter()
            .take(TOP_SOURCE_COUNT)
            .map(|(source, _)| source.to_string())
            .collect(),
    })
}

pub fn operate(
    group: &InsightGroup<'_>,
    descriptive: &Descriptive,
) -> Result<Operational, AnalysisError> {
    let records = &group.records;
    let hires = records.len() as f64;

    let headcount_gap = group.summary.map(|s| s.gap);
    let coverage = headcount_gap.and_then(|gap| coverage_ratio(hires, gap));

    let hiring_months = distinct_count(records.iter().map(|r| r.hire_date.month()));
    let stagnant_months = HIRING_WINDOW_MONTHS.saturating_sub(hiring_months);

    let (top_source, _) = sources_by_frequency(records)
        .into_iter()
        .next()
        .ok_or(AnalysisError::EmptyPartition)?;
    let top_source_cost = mean(&column_where(
        records,
        |r| r.source == top_source,
        |r| r.cost_per_hire as f64,
    ))?;

    Ok(Operational {
        headcount_gap,
        coverage,
        hiring_months,
        stagnant_months,
        top_source: top_source.to_string(),
        top_source_inefficient: top_source_cost > descriptive.avg_cost_per_hire,
    })
}

/// hires / (gap + 1), undefined when the denominator is zero.
pub fn coverage_ratio(hires: f64, gap: i32) -> Option<f64> {
    let denominator = gap as f64 + 1.0;
    (denominator != 0.0).then(|| hires / denominator)
}

/// Sources with their hire counts, most frequent first; ties by name.
pub fn sources_by_frequency<'a>(records: &[&'a HiringRecord]) -> Vec<(&'a str, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.source.as_str()).or_default() += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
}

/// Records grouped by source, in source-name order.
pub fn by_source<'a>(records: &[&'a HiringRecord]) -> BTreeMap<&'a str, Vec<&'a HiringRecord>> {
    let mut groups: BTreeMap<&str, Vec<&HiringRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.source.as_str()).or_default().push(record);
    }
    groups
}

pub fn column(records: &[&HiringRecord], value: impl Fn(&HiringRecord) -> f64) -> Vec<f64> {
    records.iter().map(|r| value(r)).collect()
}

fn column_where(
    records: &[&HiringRecord],
    keep: impl Fn(&HiringRecord) -> bool,
    value: impl Fn(&HiringRecord) -> f64,
) -> Vec<f64> {
    records.iter().filter(|r| keep(r)).map(|r| value(r)).collect()
}

impl Descriptive {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Total Hires: {}", self.total_hires),
            format!("Avg Time to Fill: {:.1}", self.avg_time_to_fill),
            format!("Avg Cost/Hire: {:.1}", self.avg_cost_per_hire),
            format!("Build %: {}", percent(self.build_share)),
            format!("IJP %: {}", percent(self.ijp_rate)),
            format!("Diversity %: {}", percent(self.diversity_rate)),
            format!("Top Sources: {}", self.top_sources.join(", ")),
        ]
    }
}

impl Operational {
    pub fn lines(&self) -> Vec<String> {
        let gap = self
            .headcount_gap
            .map_or_else(|| "N/A".to_string(), |g| g.to_string());
        let coverage = self
            .coverage
            .map_or_else(|| "N/A".to_string(), |c| format!("{:.1}", c * 100.0));
        let efficiency = if self.top_source_inefficient {
            "Top source has high cost"
        } else {
            "Top source is cost-efficient"
        };
        vec![
            format!("Headcount Gap: {gap}"),
            format!("Coverage %: {coverage}"),
            format!("Hiring Months: {}", self.hiring_months),
            format!("Stagnant Months: {}", self.stagnant_months),
            format!("Top Source Cost-Efficiency: {efficiency}"),
        ]
    }
}

/// Fraction rendered as a percentage with one decimal, e.g. "37.5%".
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}
