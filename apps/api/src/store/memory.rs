//! In-memory `HiringStore` for handler tests. Mirrors the SQL in `postgres.rs`.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::drilldown::kpi::{Dimension, Measure, SeriesOrder, SeriesQuery};
use crate::hiring::aggregates::RawKpiAggregates;
use crate::models::hiring::{flag, HiringRecord};
use crate::models::summary::{BusinessSummary, OVERALL_FUNCTION};
use crate::store::{DrilldownScope, HiringFilter, HiringStore, Page, SeriesPoint};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub hirings: Vec<HiringRecord>,
    pub summaries: Vec<BusinessSummary>,
}

impl MemoryStore {
    pub fn new(hirings: Vec<HiringRecord>, summaries: Vec<BusinessSummary>) -> Self {
        Self {
            hirings,
            summaries,
        }
    }

    fn filtered(&self, filter: &HiringFilter, case_insensitive: bool) -> Vec<&HiringRecord> {
        let matches = |wanted: &Option<String>, actual: &str| match wanted {
            None => true,
            Some(w) if case_insensitive => w.to_lowercase() == actual.to_lowercase(),
            Some(w) => w == actual,
        };
        self.hirings
            .iter()
            .filter(|r| matches(&filter.business_group, &r.business_group))
            .filter(|r| matches(&filter.function, &r.function))
            .filter(|r| filter.start_date.map_or(true, |d| r.hire_date >= d))
            .filter(|r| filter.end_date.map_or(true, |d| r.hire_date <= d))
            .collect()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn measure(measure: Measure, rows: &[&HiringRecord]) -> Option<f64> {
    match measure {
        Measure::MeanTimeToFill => mean(rows.iter().map(|r| r.time_to_fill as f64)),
        Measure::MeanCostPerHire => mean(rows.iter().map(|r| r.cost_per_hire as f64)),
        Measure::DiversityShare => mean(rows.iter().map(|r| flag(r.diversity_ratio))),
        Measure::IjpShare => mean(rows.iter().map(|r| flag(r.ijp_adherence))),
        Measure::BuildShare => mean(rows.iter().map(|r| flag(r.is_build()))),
        Measure::HireCount => Some(rows.len() as f64),
    }
}

fn dimension_value(dimension: Dimension, record: &HiringRecord) -> String {
    match dimension {
        Dimension::Month => record.hire_date.format("%Y-%m").to_string(),
        Dimension::BusinessGroup => record.business_group.clone(),
        Dimension::Function => record.function.clone(),
        Dimension::Source => record.source.clone(),
    }
}

#[async_trait]
impl HiringStore for MemoryStore {
    async fn list_summaries(&self, page: Page) -> Result<Vec<BusinessSummary>, sqlx::Error> {
        Ok(self
            .summaries
            .iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn summaries_for_business_group(
        &self,
        business_group: &str,
    ) -> Result<Vec<BusinessSummary>, sqlx::Error> {
        Ok(self
            .summaries
            .iter()
            .filter(|s| s.business_group == business_group)
            .cloned()
            .collect())
    }

    async fn summaries_for_scope(
        &self,
        scope: &DrilldownScope,
    ) -> Result<Vec<BusinessSummary>, sqlx::Error> {
        Ok(self
            .summaries
            .iter()
            .filter(|s| match (&scope.business_group, &scope.function) {
                (Some(bg), Some(f)) => {
                    &s.business_group == bg && (&s.function == f || s.function == OVERALL_FUNCTION)
                }
                (Some(bg), None) => &s.business_group == bg,
                (None, Some(f)) => &s.function == f,
                (None, None) => true,
            })
            .cloned()
            .collect())
    }

    async fn list_hirings(
        &self,
        filter: &HiringFilter,
        page: Page,
    ) -> Result<Vec<HiringRecord>, sqlx::Error> {
        Ok(self
            .filtered(filter, false)
            .into_iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn hirings_for_analysis(
        &self,
        filter: &HiringFilter,
    ) -> Result<Vec<HiringRecord>, sqlx::Error> {
        Ok(self.filtered(filter, true).into_iter().cloned().collect())
    }

    async fn distinct_business_groups(&self) -> Result<Vec<String>, sqlx::Error> {
        let mut groups: Vec<String> = self.hirings.iter().map(|r| r.business_group.clone()).collect();
        groups.sort();
        groups.dedup();
        Ok(groups)
    }

    async fn distinct_functions(&self) -> Result<Vec<String>, sqlx::Error> {
        let mut functions: Vec<String> = self.hirings.iter().map(|r| r.function.clone()).collect();
        functions.sort();
        functions.dedup();
        Ok(functions)
    }

    async fn kpi_aggregates(
        &self,
        filter: &HiringFilter,
    ) -> Result<RawKpiAggregates, sqlx::Error> {
        let rows = self.filtered(filter, false);
        Ok(RawKpiAggregates {
            avg_time_to_fill: measure(Measure::MeanTimeToFill, &rows),
            avg_cost_per_hire: measure(Measure::MeanCostPerHire, &rows),
            ijp_adherence_rate: measure(Measure::IjpShare, &rows),
            build_buy_rate: measure(Measure::BuildShare, &rows),
            diversity_hire_rate: measure(Measure::DiversityShare, &rows),
            total_hires: rows.len() as i64,
        })
    }

    async fn kpi_series(
        &self,
        query: SeriesQuery,
        scope: &DrilldownScope,
    ) -> Result<Vec<SeriesPoint>, sqlx::Error> {
        let filter = HiringFilter {
            business_group: scope.business_group.clone(),
            function: scope.function.clone(),
            ..Default::default()
        };

        let mut groups: BTreeMap<String, Vec<&HiringRecord>> = BTreeMap::new();
        for record in self.filtered(&filter, false) {
            groups
                .entry(dimension_value(query.dimension, record))
                .or_default()
                .push(record);
        }

        let mut points: Vec<SeriesPoint> = groups
            .into_iter()
            .map(|(label, rows)| SeriesPoint {
                value: measure(query.measure, &rows),
                label,
            })
            .collect();

        if query.order == SeriesOrder::ValueDescending {
            points.sort_by(|a, b| {
                b.value
                    .unwrap_or(f64::NEG_INFINITY)
                    .total_cmp(&a.value.unwrap_or(f64::NEG_INFINITY))
                    .then_with(|| a.label.cmp(&b.label))
            });
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::hire;
    use crate::drilldown::kpi::Kpi;

    #[tokio::test]
    async fn test_month_labels_are_zero_padded_and_sorted() {
        let store = MemoryStore::new(
            vec![
                hire("2025-10-02", 1, 1, "A", "Buy", false),
                hire("2025-03-09", 1, 1, "A", "Buy", false),
            ],
            vec![],
        );
        let points = store
            .kpi_series(Kpi::TotalHires.trend_query(), &DrilldownScope::default())
            .await
            .unwrap();
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["2025-03", "2025-10"]);
    }
}
