//! Multi-level statistical analysis of hiring records.
//!
//! Records are partitioned by (business_group, function). Every partition is
//! analyzed on its own in three tiers:
//!
//! 1. descriptive KPIs (`tiers::describe`)
//! 2. operational indicators against the headcount summary (`tiers::operate`)
//! 3. signal detection (`signals::detect_signals`)
//!
//! A failing partition becomes `PartitionOutcome::Failed` and the remaining
//! partitions are still analyzed.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::hiring::HiringRecord;
use crate::models::summary::BusinessSummary;

pub mod report;
pub mod signals;
pub mod stats;
pub mod tiers;

use signals::{detect_signals, Signal};
use tiers::{describe, operate, Descriptive, Operational};

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("partition has no hiring records")]
    EmptyPartition,

    #[error("{metric} is not a finite number")]
    NonFinite { metric: &'static str },

    #[error("degenerate input: {0}")]
    Degenerate(String),

    #[error("statistics error: {0}")]
    Statistics(String),
}

/// Hiring rows sharing one (business_group, function) key, with the matching
/// summary row if ingestion produced one.
#[derive(Debug, Clone)]
pub struct InsightGroup<'a> {
    pub business_group: &'a str,
    pub function: &'a str,
    pub records: Vec<&'a HiringRecord>,
    pub summary: Option<&'a BusinessSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionAnalysis {
    pub descriptive: Descriptive,
    pub operational: Operational,
    /// Empty when nothing fired.
    pub signals: Vec<Signal>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartitionOutcome {
    Analyzed(PartitionAnalysis),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionReport {
    pub business_group: String,
    pub function: String,
    pub outcome: PartitionOutcome,
}

/// Runs the three-tier analysis over every (business_group, function) partition.
/// Returns one report per partition, in key order; empty input gives an empty list.
pub fn generate_deep_insights(
    records: &[HiringRecord],
    summaries: &[BusinessSummary],
) -> Vec<PartitionReport> {
    let groups = group_records(records, summaries);
    debug!(
        "Analyzing {} hiring rows in {} partitions",
        records.len(),
        groups.len()
    );
    collect_outcomes(groups, analyze_group)
}

/// Partitions records by (business_group, function) and attaches the first
/// summary row with the same key.
pub fn group_records<'a>(
    records: &'a [HiringRecord],
    summaries: &'a [BusinessSummary],
) -> Vec<InsightGroup<'a>> {
    let mut partitions: BTreeMap<(&str, &str), Vec<&HiringRecord>> = BTreeMap::new();
    for record in records {
        partitions
            .entry((record.business_group.as_str(), record.function.as_str()))
            .or_default()
            .push(record);
    }

    partitions
        .into_iter()
        .map(|((business_group, function), records)| InsightGroup {
            business_group,
            function,
            records,
            summary: summaries
                .iter()
                .find(|s| s.business_group == business_group && s.function == function),
        })
        .collect()
}

pub fn analyze_group(group: &InsightGroup<'_>) -> Result<PartitionAnalysis, AnalysisError> {
    let descriptive = describe(group)?;
    let operational = operate(group, &descriptive)?;
    let signals = detect_signals(group, &descriptive)?;
    Ok(PartitionAnalysis {
        descriptive,
        operational,
        signals,
    })
}

/// Applies `analyze` to every group and keeps every outcome; a failure is
/// recorded in place and never stops the remaining groups.
pub fn collect_outcomes<'a, F>(groups: Vec<InsightGroup<'a>>, analyze: F) -> Vec<PartitionReport>
where
    F: Fn(&InsightGroup<'a>) -> Result<PartitionAnalysis, AnalysisError>,
{
    groups
        .iter()
        .map(|group| {
            let outcome = match analyze(group) {
                Ok(analysis) => PartitionOutcome::Analyzed(analysis),
                Err(e) => {
                    warn!(
                        "Analysis failed for {} / {}: {e}",
                        group.business_group, group.function
                    );
                    PartitionOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            PartitionReport {
                business_group: group.business_group.to_string(),
                function: group.function.to_string(),
                outcome,
            }
        })
        .collect()
}
