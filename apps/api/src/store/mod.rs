//! Read-only access to the hiring tables.
//!
//! Handlers never touch SQL directly: they go through `HiringStore`, carried in
//! `AppState` as `Arc<dyn HiringStore>`. `PgHiringStore` is the production backend;
//! tests use the in-memory `memory::MemoryStore`.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use crate::drilldown::kpi::SeriesQuery;
use crate::hiring::aggregates::RawKpiAggregates;
use crate::models::hiring::HiringRecord;
use crate::models::summary::BusinessSummary;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgHiringStore;

/// Optional filters shared by the record listing, the KPI averages and the deep dive.
/// Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HiringFilter {
    pub business_group: Option<String>,
    pub function: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

/// Filters accepted by the KPI drill-down. No date range there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrilldownScope {
    pub business_group: Option<String>,
    pub function: Option<String>,
}

/// One grouped aggregate as returned by the database, before formatting.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct SeriesPoint {
    pub label: String,
    pub value: Option<f64>,
}

#[async_trait]
pub trait HiringStore: Send + Sync {
    /// All summary rows, ordered by id.
    async fn list_summaries(&self, page: Page) -> Result<Vec<BusinessSummary>, sqlx::Error>;

    /// Every summary row of one business group, including its "Overall" row.
    async fn summaries_for_business_group(
        &self,
        business_group: &str,
    ) -> Result<Vec<BusinessSummary>, sqlx::Error>;

    /// Summary rows shown alongside a KPI drill-down.
    ///
    /// Both filters: the group's rows for that function plus its "Overall" row.
    /// One filter: every row matching it. No filter: every row.
    async fn summaries_for_scope(
        &self,
        scope: &DrilldownScope,
    ) -> Result<Vec<BusinessSummary>, sqlx::Error>;

    async fn list_hirings(
        &self,
        filter: &HiringFilter,
        page: Page,
    ) -> Result<Vec<HiringRecord>, sqlx::Error>;

    /// Unpaginated records for the statistical analysis. Group and function
    /// match case-insensitively.
    async fn hirings_for_analysis(
        &self,
        filter: &HiringFilter,
    ) -> Result<Vec<HiringRecord>, sqlx::Error>;

    async fn distinct_business_groups(&self) -> Result<Vec<String>, sqlx::Error>;

    async fn distinct_functions(&self) -> Result<Vec<String>, sqlx::Error>;

    /// Nullable averages and the row count; see `RawKpiAggregates::normalize`.
    async fn kpi_aggregates(&self, filter: &HiringFilter)
        -> Result<RawKpiAggregates, sqlx::Error>;

    /// One grouped series (trend or breakdown) for a KPI.
    async fn kpi_series(
        &self,
        query: SeriesQuery,
        scope: &DrilldownScope,
    ) -> Result<Vec<SeriesPoint>, sqlx::Error>;
}
