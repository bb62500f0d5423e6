use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::errors::AppError;
use crate::hiring::aggregates::KpiAverages;
use crate::hiring::filters::{FilterParams, HiringsParams, PageParams};
use crate::models::hiring::HiringRecord;
use crate::models::summary::BusinessSummary;
use crate::state::AppState;

/// GET /api/v1/summaries
pub async fn handle_list_summaries(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<BusinessSummary>>, AppError> {
    let page = params.into_page()?;
    Ok(Json(state.store.list_summaries(page).await?))
}

/// GET /api/v1/summaries/:business_group
pub async fn handle_summaries_for_business_group(
    State(state): State<AppState>,
    Path(business_group): Path<String>,
) -> Result<Json<Vec<BusinessSummary>>, AppError> {
    let summaries = state
        .store
        .summaries_for_business_group(&business_group)
        .await?;
    Ok(Json(summaries))
}

/// GET /api/v1/hirings
pub async fn handle_list_hirings(
    State(state): State<AppState>,
    Query(params): Query<HiringsParams>,
) -> Result<Json<Vec<HiringRecord>>, AppError> {
    let (filter, page) = params.into_parts()?;
    Ok(Json(state.store.list_hirings(&filter, page).await?))
}

/// GET /api/v1/filters/business-groups
pub async fn handle_business_groups(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.store.distinct_business_groups().await?))
}

/// GET /api/v1/filters/functions
pub async fn handle_functions(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.store.distinct_functions().await?))
}

/// GET /api/v1/kpis/averages
pub async fn handle_kpi_averages(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<KpiAverages>, AppError> {
    let filter = params.into_filter()?;
    let raw = state.store.kpi_aggregates(&filter).await?;
    Ok(Json(raw.normalize()))
}
