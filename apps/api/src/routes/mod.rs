pub mod health;

use axum::{routing::get, Router};

use crate::drilldown::handlers as drilldown;
use crate::hiring::handlers as hiring;
use crate::insights::handlers as insights;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Headcount summaries
        .route("/api/v1/summaries", get(hiring::handle_list_summaries))
        .route(
            "/api/v1/summaries/:business_group",
            get(hiring::handle_summaries_for_business_group),
        )
        // Hiring records, filter values and headline KPIs
        .route("/api/v1/hirings", get(hiring::handle_list_hirings))
        .route(
            "/api/v1/filters/business-groups",
            get(hiring::handle_business_groups),
        )
        .route("/api/v1/filters/functions", get(hiring::handle_functions))
        .route("/api/v1/kpis/averages", get(hiring::handle_kpi_averages))
        // Drill-down and AI insights
        .route(
            "/api/v1/kpis/drilldown/:kpi_name",
            get(drilldown::handle_kpi_drilldown),
        )
        .route(
            "/api/v1/insights/deep-dive",
            get(insights::handle_deep_dive),
        )
        .with_state(state)
}
