//! Plain-text rendering of partition reports, as fed to the narrative prompt.

use crate::analysis::signals::NO_SIGNALS;
use crate::analysis::{PartitionOutcome, PartitionReport};

/// The three tiers of one partition, each a newline-joined block.
#[derive(Debug, Clone, PartialEq)]
pub struct TierText {
    pub kpis: String,
    pub operational: String,
    pub signals: String,
}

impl PartitionReport {
    pub fn tier_text(&self) -> TierText {
        match &self.outcome {
            PartitionOutcome::Analyzed(analysis) => TierText {
                kpis: analysis.descriptive.lines().join("\n"),
                operational: analysis.operational.lines().join("\n"),
                signals: if analysis.signals.is_empty() {
                    NO_SIGNALS.to_string()
                } else {
                    analysis
                        .signals
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            },
            PartitionOutcome::Failed { error } => TierText {
                kpis: "Error during analysis.".to_string(),
                operational: format!("Error: {error}"),
                signals: "Skipping due to error.".to_string(),
            },
        }
    }
}

/// User message for the 3-card narrative: one labelled block per partition.
pub fn build_narrative_prompt(reports: &[PartitionReport]) -> String {
    let mut prompt = String::from("Here is the data summary:\n\n");
    for report in reports {
        let text = report.tier_text();
        prompt.push_str(&format!(
            "--- For {} - {} ---\nKPIs:\n{}\nOperational Data:\n{}\nDeeper Signals:\n{}\n\n",
            report.business_group, report.function, text.kpis, text.operational, text.signals
        ));
    }
    prompt
}
