//! KPI catalog for the drill-down views.
//!
//! Each `Kpi` maps to a `KpiSpec`: the measure aggregated per group, the display
//! unit and the rule choosing the breakdown dimension. Trend and breakdown queries
//! are both derived from the `KpiSpec`, so adding a KPI is one match arm per method.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::store::DrilldownScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kpi {
    TimeToFill,
    CostPerHire,
    DiversityRate,
    IjpAdherenceRate,
    BuildRate,
    TotalHires,
}

#[derive(Debug, Error, PartialEq)]
#[error("KPI '{0}' not found.")]
pub struct UnknownKpi(pub String);

/// Aggregate computed per group of hiring rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    MeanTimeToFill,
    MeanCostPerHire,
    DiversityShare,
    IjpShare,
    BuildShare,
    HireCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Days,
    Cost,
    Percent,
    Hires,
}

/// Column a series is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Month,
    BusinessGroup,
    Function,
    Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownRule {
    /// Always by sourcing channel.
    Source,
    /// By business group when a function filter is active, else by function.
    OppositeOfFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesOrder {
    /// Chronological for "YYYY-MM" labels.
    LabelAscending,
    ValueDescending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesQuery {
    pub measure: Measure,
    pub dimension: Dimension,
    pub order: SeriesOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KpiSpec {
    pub measure: Measure,
    pub unit: Unit,
    pub breakdown: BreakdownRule,
}

impl Kpi {
    pub const ALL: [Kpi; 6] = [
        Kpi::TimeToFill,
        Kpi::CostPerHire,
        Kpi::DiversityRate,
        Kpi::IjpAdherenceRate,
        Kpi::BuildRate,
        Kpi::TotalHires,
    ];

    pub fn spec(self) -> KpiSpec {
        match self {
            Kpi::TimeToFill => KpiSpec {
                measure: Measure::MeanTimeToFill,
                unit: Unit::Days,
                breakdown: BreakdownRule::OppositeOfFilter,
            },
            Kpi::CostPerHire => KpiSpec {
                measure: Measure::MeanCostPerHire,
                unit: Unit::Cost,
                breakdown: BreakdownRule::Source,
            },
            Kpi::DiversityRate => KpiSpec {
                measure: Measure::DiversityShare,
                unit: Unit::Percent,
                breakdown: BreakdownRule::OppositeOfFilter,
            },
            Kpi::IjpAdherenceRate => KpiSpec {
                measure: Measure::IjpShare,
                unit: Unit::Percent,
                breakdown: BreakdownRule::OppositeOfFilter,
            },
            Kpi::BuildRate => KpiSpec {
                measure: Measure::BuildShare,
                unit: Unit::Percent,
                breakdown: BreakdownRule::OppositeOfFilter,
            },
            Kpi::TotalHires => KpiSpec {
                measure: Measure::HireCount,
                unit: Unit::Hires,
                breakdown: BreakdownRule::OppositeOfFilter,
            },
        }
    }

    /// Path segment used by the dashboard, e.g. `time_to_fill`.
    pub fn as_str(self) -> &'static str {
        match self {
            Kpi::TimeToFill => "time_to_fill",
            Kpi::CostPerHire => "cost_per_hire",
            Kpi::DiversityRate => "diversity_rate",
            Kpi::IjpAdherenceRate => "ijp_adherence_rate",
            Kpi::BuildRate => "build_rate",
            Kpi::TotalHires => "total_hires",
        }
    }

    /// Human title used in prompts, e.g. "Time To Fill".
    pub fn title(self) -> &'static str {
        match self {
            Kpi::TimeToFill => "Time To Fill",
            Kpi::CostPerHire => "Cost Per Hire",
            Kpi::DiversityRate => "Diversity Rate",
            Kpi::IjpAdherenceRate => "IJP Adherence Rate",
            Kpi::BuildRate => "Build Rate",
            Kpi::TotalHires => "Total Hires",
        }
    }

    pub fn trend_query(self) -> SeriesQuery {
        SeriesQuery {
            measure: self.spec().measure,
            dimension: Dimension::Month,
            order: SeriesOrder::LabelAscending,
        }
    }

    pub fn breakdown_query(self, scope: &DrilldownScope) -> SeriesQuery {
        let spec = self.spec();
        SeriesQuery {
            measure: spec.measure,
            dimension: spec.breakdown.dimension(scope),
            order: SeriesOrder::ValueDescending,
        }
    }
}

impl fmt::Display for Kpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kpi {
    type Err = UnknownKpi;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kpi::ALL
            .into_iter()
            .find(|kpi| kpi.as_str() == s)
            .ok_or_else(|| UnknownKpi(s.to_string()))
    }
}

impl BreakdownRule {
    pub fn dimension(self, scope: &DrilldownScope) -> Dimension {
        match self {
            BreakdownRule::Source => Dimension::Source,
            BreakdownRule::OppositeOfFilter if scope.function.is_some() => {
                Dimension::BusinessGroup
            }
            BreakdownRule::OppositeOfFilter => Dimension::Function,
        }
    }
}

impl Measure {
    /// Aggregate expression over the `hirings` table, always `float8`.
    pub fn sql(self) -> &'static str {
        match self {
            Measure::MeanTimeToFill => "AVG(time_to_fill)::float8",
            Measure::MeanCostPerHire => "AVG(cost_per_hire)::float8",
            Measure::DiversityShare => "AVG(diversity_ratio::int)::float8",
            Measure::IjpShare => "AVG(ijp_adherence::int)::float8",
            Measure::BuildShare => "AVG((build_buy_ratio = 'Build')::int)::float8",
            Measure::HireCount => "COUNT(id)::float8",
        }
    }
}

impl Dimension {
    pub fn sql(self) -> &'static str {
        match self {
            Dimension::Month => "to_char(hire_date, 'YYYY-MM')",
            Dimension::BusinessGroup => "business_group",
            Dimension::Function => "\"function\"",
            Dimension::Source => "source",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dimension::Month => "Month",
            Dimension::BusinessGroup => "Business Group",
            Dimension::Function => "Function",
            Dimension::Source => "Source",
        }
    }
}

impl SeriesOrder {
    pub fn sql(self) -> &'static str {
        match self {
            SeriesOrder::LabelAscending => "label ASC",
            SeriesOrder::ValueDescending => "value DESC NULLS LAST, label ASC",
        }
    }
}

impl Unit {
    /// Factor applied at the formatting boundary.
    pub fn scale(self) -> f64 {
        match self {
            Unit::Percent => 100.0,
            Unit::Days | Unit::Cost | Unit::Hires => 1.0,
        }
    }
}
