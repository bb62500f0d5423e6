use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::analysis::generate_deep_insights;
use crate::analysis::report::build_narrative_prompt;
use crate::errors::AppError;
use crate::hiring::filters::FilterParams;
use crate::insights::{generate_insights, AiInsight, InsightCard, InsightMode, NO_DATA_FOUND};
use crate::state::AppState;
use crate::store::DrilldownScope;

/// GET /api/v1/insights/deep-dive
///
/// Runs the per-partition analysis over the filtered records and asks the
/// model for three narrative cards about it.
pub async fn handle_deep_dive(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<AiInsight>, AppError> {
    let filter = params.into_filter()?;
    let records = state.store.hirings_for_analysis(&filter).await?;
    let summaries = state
        .store
        .summaries_for_scope(&DrilldownScope::default())
        .await?;

    let reports = generate_deep_insights(&records, &summaries);
    if reports.is_empty() {
        info!("Deep dive found no hiring records for {filter:?}");
        return Ok(Json(AiInsight {
            insights: vec![InsightCard::new(
                NO_DATA_FOUND,
                "No hiring records match the specified filters.",
            )],
        }));
    }

    let prompt = build_narrative_prompt(&reports);
    let insights = generate_insights(state.llm.as_ref(), InsightMode::General, &prompt).await;
    Ok(Json(AiInsight { insights }))
}
