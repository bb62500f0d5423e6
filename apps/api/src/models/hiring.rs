use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Value of `build_buy_ratio` for hires developed internally.
pub const BUILD: &str = "Build";

/// One hire, as written by the ingestion job. Never mutated by this service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HiringRecord {
    pub id: i32,
    pub business_group: String,
    pub function: String,
    pub role_title: String,
    pub hire_date: NaiveDate,
    pub cost_per_hire: i32,
    /// Days from requisition to accepted offer.
    pub time_to_fill: i32,
    pub ijp_adherence: bool,
    /// "Build" or "Buy".
    pub build_buy_ratio: String,
    /// Stored as a flag ("is diversity hire") but averaged as a rate everywhere.
    pub diversity_ratio: bool,
    pub source: String,
}

impl HiringRecord {
    pub fn is_build(&self) -> bool {
        self.build_buy_ratio == BUILD
    }
}

/// Converts a boolean column into the 0/1 value its rate is averaged from.
pub fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(build_buy: &str, hire_date: NaiveDate) -> HiringRecord {
        HiringRecord {
            id: 1,
            business_group: "Tech".to_string(),
            function: "Engineering".to_string(),
            role_title: "Backend Engineer".to_string(),
            hire_date,
            cost_per_hire: 50_000,
            time_to_fill: 30,
            ijp_adherence: true,
            build_buy_ratio: build_buy.to_string(),
            diversity_ratio: false,
            source: "Referral".to_string(),
        }
    }

    #[test]
    fn test_is_build_is_exact_match() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert!(record("Build", date).is_build());
        assert!(!record("Buy", date).is_build());
        assert!(!record("build", date).is_build());
    }
}
