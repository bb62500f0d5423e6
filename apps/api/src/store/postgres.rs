use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::drilldown::kpi::SeriesQuery;
use crate::hiring::aggregates::RawKpiAggregates;
use crate::models::hiring::HiringRecord;
use crate::models::summary::{BusinessSummary, OVERALL_FUNCTION};
use crate::store::{DrilldownScope, HiringFilter, HiringStore, Page, SeriesPoint};

const HIRING_COLUMNS: &str = r#"id, business_group, "function", role_title, hire_date,
    cost_per_hire, time_to_fill, ijp_adherence, build_buy_ratio, diversity_ratio, source"#;

const SUMMARY_COLUMNS: &str =
    r#"id, business_group, "function", total_headcount, available_headcount, gap"#;

/// Optional exact-match filters; binds are $1 business_group, $2 function,
/// $3 start_date, $4 end_date.
const FILTER_CLAUSE: &str = r#"($1::text IS NULL OR business_group = $1)
    AND ($2::text IS NULL OR "function" = $2)
    AND ($3::date IS NULL OR hire_date >= $3)
    AND ($4::date IS NULL OR hire_date <= $4)"#;

const ANALYSIS_FILTER_CLAUSE: &str = r#"($1::text IS NULL OR LOWER(business_group) = LOWER($1))
    AND ($2::text IS NULL OR LOWER("function") = LOWER($2))
    AND ($3::date IS NULL OR hire_date >= $3)
    AND ($4::date IS NULL OR hire_date <= $4)"#;

const SCOPE_CLAUSE: &str = r#"($1::text IS NULL OR business_group = $1)
    AND ($2::text IS NULL OR "function" = $2)"#;

/// `HiringStore` over the PostgreSQL tables written by ingestion.
#[derive(Clone)]
pub struct PgHiringStore {
    pool: PgPool,
}

impl PgHiringStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HiringStore for PgHiringStore {
    async fn list_summaries(&self, page: Page) -> Result<Vec<BusinessSummary>, sqlx::Error> {
        let sql =
            format!("SELECT {SUMMARY_COLUMNS} FROM business_summaries ORDER BY id OFFSET $1 LIMIT $2");
        sqlx::query_as::<_, BusinessSummary>(&sql)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
    }

    async fn summaries_for_business_group(
        &self,
        business_group: &str,
    ) -> Result<Vec<BusinessSummary>, sqlx::Error> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM business_summaries WHERE business_group = $1 ORDER BY id"
        );
        sqlx::query_as::<_, BusinessSummary>(&sql)
            .bind(business_group)
            .fetch_all(&self.pool)
            .await
    }

    async fn summaries_for_scope(
        &self,
        scope: &DrilldownScope,
    ) -> Result<Vec<BusinessSummary>, sqlx::Error> {
        // With both filters the group's "Overall" row rides along with the function row.
        let sql = format!(
            r#"SELECT {SUMMARY_COLUMNS} FROM business_summaries
            WHERE ($1::text IS NULL OR business_group = $1)
              AND ($2::text IS NULL
                   OR "function" = $2
                   OR ($1::text IS NOT NULL AND "function" = $3))
            ORDER BY id"#
        );
        sqlx::query_as::<_, BusinessSummary>(&sql)
            .bind(scope.business_group.as_deref())
            .bind(scope.function.as_deref())
            .bind(OVERALL_FUNCTION)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_hirings(
        &self,
        filter: &HiringFilter,
        page: Page,
    ) -> Result<Vec<HiringRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {HIRING_COLUMNS} FROM hirings WHERE {FILTER_CLAUSE} ORDER BY id OFFSET $5 LIMIT $6"
        );
        sqlx::query_as::<_, HiringRecord>(&sql)
            .bind(filter.business_group.as_deref())
            .bind(filter.function.as_deref())
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
    }

    async fn hirings_for_analysis(
        &self,
        filter: &HiringFilter,
    ) -> Result<Vec<HiringRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {HIRING_COLUMNS} FROM hirings WHERE {ANALYSIS_FILTER_CLAUSE} ORDER BY id"
        );
        let records = sqlx::query_as::<_, HiringRecord>(&sql)
            .bind(filter.business_group.as_deref())
            .bind(filter.function.as_deref())
            .bind(filter.start_date)
            .bind(filter.end_date)
            .fetch_all(&self.pool)
            .await?;
        debug!("Loaded {} hiring rows for analysis", records.len());
        Ok(records)
    }

    async fn distinct_business_groups(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT business_group FROM hirings ORDER BY business_group")
            .fetch_all(&self.pool)
            .await
    }

    async fn distinct_functions(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(r#"SELECT DISTINCT "function" FROM hirings ORDER BY "function""#)
            .fetch_all(&self.pool)
            .await
    }

    async fn kpi_aggregates(
        &self,
        filter: &HiringFilter,
    ) -> Result<RawKpiAggregates, sqlx::Error> {
        let sql = format!(
            r#"SELECT
                AVG(time_to_fill)::float8 AS avg_time_to_fill,
                AVG(cost_per_hire)::float8 AS avg_cost_per_hire,
                AVG(ijp_adherence::int)::float8 AS ijp_adherence_rate,
                AVG(CASE WHEN build_buy_ratio = 'Build' THEN 1 ELSE 0 END)::float8 AS build_buy_rate,
                AVG(CASE WHEN diversity_ratio THEN 1 ELSE 0 END)::float8 AS diversity_hire_rate,
                COUNT(id) AS total_hires
            FROM hirings
            WHERE {FILTER_CLAUSE}"#
        );
        sqlx::query_as::<_, RawKpiAggregates>(&sql)
            .bind(filter.business_group.as_deref())
            .bind(filter.function.as_deref())
            .bind(filter.start_date)
            .bind(filter.end_date)
            .fetch_one(&self.pool)
            .await
    }

    async fn kpi_series(
        &self,
        query: SeriesQuery,
        scope: &DrilldownScope,
    ) -> Result<Vec<SeriesPoint>, sqlx::Error> {
        // Every interpolated fragment is a fixed string from the KPI catalog.
        let sql = format!(
            "SELECT {dimension} AS label, {measure} AS value
            FROM hirings
            WHERE {SCOPE_CLAUSE}
            GROUP BY 1
            ORDER BY {order}",
            dimension = query.dimension.sql(),
            measure = query.measure.sql(),
            order = query.order.sql(),
        );
        sqlx::query_as::<_, SeriesPoint>(&sql)
            .bind(scope.business_group.as_deref())
            .bind(scope.function.as_deref())
            .fetch_all(&self.pool)
            .await
    }
}
