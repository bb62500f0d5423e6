use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::drilldown::kpi::{Kpi, UnknownKpi};
use crate::drilldown::series::{format_points, kpi_prompt, observed, total_of, ChartPoint};
use crate::errors::AppError;
use crate::hiring::filters::ScopeParams;
use crate::insights::{generate_insights, AiInsight, InsightMode};
use crate::models::summary::BusinessSummary;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DrilldownResponse {
    pub summary_data: Vec<BusinessSummary>,
    pub total_hires: i64,
    pub trend_chart_data: Vec<ChartPoint>,
    pub breakdown_chart_data: Vec<ChartPoint>,
    pub ai_insights: AiInsight,
}

/// GET /api/v1/kpis/drilldown/:kpi_name
pub async fn handle_kpi_drilldown(
    State(state): State<AppState>,
    Path(kpi_name): Path<String>,
    Query(params): Query<ScopeParams>,
) -> Result<Json<DrilldownResponse>, AppError> {
    let kpi: Kpi = kpi_name
        .parse()
        .map_err(|e: UnknownKpi| AppError::NotFound(e.to_string()))?;
    let scope = params.into_scope();
    let unit = kpi.spec().unit;
    let breakdown_query = kpi.breakdown_query(&scope);

    let (summary_data, trend, breakdown) = tokio::try_join!(
        state.store.summaries_for_scope(&scope),
        state.store.kpi_series(kpi.trend_query(), &scope),
        state.store.kpi_series(breakdown_query, &scope),
    )?;
    let trend = observed(trend);
    let breakdown = observed(breakdown);

    let trend_chart_data = format_points(&trend, unit);
    let breakdown_chart_data = format_points(&breakdown, unit);
    let total_hires = total_of(&breakdown_chart_data);

    let prompt = kpi_prompt(
        kpi,
        total_hires,
        &trend,
        breakdown_query.dimension,
        &breakdown,
    );
    let insights = generate_insights(
        state.llm.as_ref(),
        InsightMode::Kpi {
            kpi_title: kpi.title(),
        },
        &prompt,
    )
    .await;

    Ok(Json(DrilldownResponse {
        summary_data,
        total_hires,
        trend_chart_data,
        breakdown_chart_data,
        ai_insights: AiInsight { insights },
    }))
}
