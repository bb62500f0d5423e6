//! Narrative insight cards.
//!
//! Turns a plain-text statistical summary into a short list of
//! `{title, description}` cards via the configured `CompletionBackend`.
//! `generate_insights` never fails: every degraded path (no key, transport
//! error, unusable output) collapses into a single placeholder card.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::prompts::JSON_ARRAY_ONLY;
use crate::llm_client::{strip_json_fences, CompletionBackend, CompletionRequest};

pub mod handlers;
pub mod prompts;

use prompts::{GENERAL_INSIGHTS_SYSTEM, KPI_INSIGHTS_SYSTEM_TEMPLATE};

pub const CONFIGURATION_ERROR: &str = "Configuration Error";
pub const AI_COMMUNICATION_ERROR: &str = "AI Communication Error";
pub const FORMATTING_ERROR: &str = "Formatting Error";
pub const NO_DATA_FOUND: &str = "No Data Found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightCard {
    pub title: String,
    pub description: String,
}

impl InsightCard {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiInsight {
    pub insights: Vec<InsightCard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightMode<'a> {
    /// Three cards over the whole deep-dive summary.
    General,
    /// Two action cards about one KPI.
    Kpi { kpi_title: &'a str },
}

impl InsightMode<'_> {
    pub fn card_count(&self) -> usize {
        match self {
            InsightMode::General => 3,
            InsightMode::Kpi { .. } => 2,
        }
    }

    fn temperature(&self) -> f32 {
        match self {
            InsightMode::General => 0.6,
            InsightMode::Kpi { .. } => 0.7,
        }
    }

    fn max_tokens(&self) -> u32 {
        match self {
            InsightMode::General => 500,
            InsightMode::Kpi { .. } => 1000,
        }
    }

    pub fn system_prompt(&self) -> String {
        let base = match self {
            InsightMode::General => GENERAL_INSIGHTS_SYSTEM.to_string(),
            InsightMode::Kpi { kpi_title } => {
                KPI_INSIGHTS_SYSTEM_TEMPLATE.replace("{kpi_name}", kpi_title)
            }
        };
        format!("{base}\n\n{JSON_ARRAY_ONLY}")
    }
}

#[derive(Debug, Error)]
pub enum CardParseError {
    #[error("output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output contains no insight cards")]
    Empty,
}

/// Asks the model for `mode.card_count()` cards about `analysis_text`.
pub async fn generate_insights(
    llm: &dyn CompletionBackend,
    mode: InsightMode<'_>,
    analysis_text: &str,
) -> Vec<InsightCard> {
    if !llm.is_configured() {
        warn!("ANTHROPIC_API_KEY not set, returning configuration-error card");
        return vec![InsightCard::new(
            CONFIGURATION_ERROR,
            "ANTHROPIC_API_KEY not found. Please set it in the .env file.",
        )];
    }

    let system = mode.system_prompt();
    let request = CompletionRequest {
        system: &system,
        user: analysis_text,
        max_tokens: mode.max_tokens(),
        temperature: mode.temperature(),
    };

    let raw = match llm.complete(request).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Insight generation failed: {e}");
            return vec![InsightCard::new(
                AI_COMMUNICATION_ERROR,
                format!("Error communicating with the AI model: {e}"),
            )];
        }
    };
    debug!("Raw insight output: {raw}");

    match parse_cards(&raw, mode.card_count()) {
        Ok(cards) => cards,
        Err(e) => {
            warn!("Could not parse insight cards: {e}");
            vec![InsightCard::new(
                FORMATTING_ERROR,
                format!("The AI returned data in an unexpected format: {e}"),
            )]
        }
    }
}

/// Parses model output into at most `limit` cards. Accepts a bare array or an
/// object with a single key wrapping the array (e.g. `{"insights": [...]}`).
pub fn parse_cards(raw: &str, limit: usize) -> Result<Vec<InsightCard>, CardParseError> {
    let value: Value = serde_json::from_str(strip_json_fences(raw))?;
    let list = match value {
        Value::Object(map) if map.len() == 1 => {
            map.into_iter().next().map(|(_, inner)| inner).unwrap_or(Value::Null)
        }
        other => other,
    };

    let mut cards: Vec<InsightCard> = serde_json::from_value(list)?;
    if cards.is_empty() {
        return Err(CardParseError::Empty);
    }
    cards.truncate(limit);
    Ok(cards)
}
