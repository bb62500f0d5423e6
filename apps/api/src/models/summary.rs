use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// `function` value of the per-business roll-up row.
pub const OVERALL_FUNCTION: &str = "Overall";

/// Headcount position of one (business_group, function) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusinessSummary {
    pub id: i32,
    pub business_group: String,
    pub function: String,
    pub total_headcount: i32,
    pub available_headcount: i32,
    /// total_headcount - available_headcount, pre-computed by ingestion.
    pub gap: i32,
}
