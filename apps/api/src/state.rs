use std::sync::Arc;

use crate::llm_client::CompletionBackend;
use crate::store::HiringStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only hiring tables. Default: PgHiringStore over the connection pool.
    pub store: Arc<dyn HiringStore>,
    /// Insight card generator. Default: LlmClient (Anthropic Messages API).
    pub llm: Arc<dyn CompletionBackend>,
}
