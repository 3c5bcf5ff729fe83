use std::sync::Arc;

use crate::tailoring::orchestrator::TailoringPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless across runs; one instance serves concurrent requests.
    pub pipeline: Arc<TailoringPipeline>,
}
