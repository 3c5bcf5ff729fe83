//! Axum route handlers for the Tailoring API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{JobData, ResumeContent};
use crate::state::AppState;
use crate::tailoring::orchestrator::{HybridTailorResult, TailorPreview};

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorRequest {
    pub resume_id: String,
    pub resume: ResumeContent,
    pub job: JobData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub resume: ResumeContent,
    pub job: JobData,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/tailor
///
/// Full hybrid pipeline: pre-analysis → rules → batched rewrites → scoring.
/// Returns the tailored résumé with an auditable diff of every change.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<HybridTailorResult>, AppError> {
    if request.resume_id.trim().is_empty() {
        return Err(AppError::Validation("resumeId cannot be empty".to_string()));
    }
    validate_job(&request.job)?;

    let result = state
        .pipeline
        .tailor(&request.resume_id, &request.resume, &request.job)
        .await?;

    Ok(Json(result))
}

/// POST /api/v1/tailor/preview
///
/// Pre-analysis, rule instructions and readiness score without calling the model.
/// Lets the user see what would change before spending a tailoring run.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<TailorPreview>, AppError> {
    validate_job(&request.job)?;

    let preview = state.pipeline.preview(&request.resume, &request.job).await?;

    Ok(Json(preview))
}

fn validate_job(job: &JobData) -> Result<(), AppError> {
    if job.title.trim().is_empty() && job.description.trim().is_empty() {
        return Err(AppError::Validation(
            "job must have a title or a description".to_string(),
        ));
    }
    Ok(())
}
