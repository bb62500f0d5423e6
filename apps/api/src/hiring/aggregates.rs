use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Aggregate row exactly as the database returns it: every average is NULL
/// when no hiring row matches the filters.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct RawKpiAggregates {
    pub avg_time_to_fill: Option<f64>,
    pub avg_cost_per_hire: Option<f64>,
    /// Fractions in [0, 1].
    pub ijp_adherence_rate: Option<f64>,
    pub build_buy_rate: Option<f64>,
    pub diversity_hire_rate: Option<f64>,
    pub total_hires: i64,
}

/// Headline KPI tiles. Means are whole units, rates are whole percentages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiAverages {
    pub avg_time_to_fill: i64,
    pub avg_cost_per_hire: i64,
    pub ijp_adherence_rate: i64,
    pub build_buy_rate: i64,
    pub diversity_hire_rate: i64,
    pub total_hires: i64,
}

impl RawKpiAggregates {
    /// Post-query normalization: an empty selection yields all zeros, never nulls.
    pub fn normalize(&self) -> KpiAverages {
        if self.total_hires <= 0 {
            return KpiAverages::default();
        }

        KpiAverages {
            avg_time_to_fill: round_to_int(self.avg_time_to_fill.unwrap_or(0.0)),
            avg_cost_per_hire: round_to_int(self.avg_cost_per_hire.unwrap_or(0.0)),
            ijp_adherence_rate: to_percent(self.ijp_adherence_rate),
            build_buy_rate: to_percent(self.build_buy_rate),
            diversity_hire_rate: to_percent(self.diversity_hire_rate),
            total_hires: self.total_hires,
        }
    }
}

/// Rounds half to even, the rounding the dashboard has always displayed.
pub fn round_to_int(value: f64) -> i64 {
    if value.is_finite() {
        value.round_ties_even() as i64
    } else {
        0
    }
}

fn to_percent(rate: Option<f64>) -> i64 {
    round_to_int(rate.unwrap_or(0.0) * 100.0)
}
