use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::summary::generate_summary;

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub candidate_data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// POST /api/v1/summary
///
/// 400 without candidate data, 500 when the prompt config failed to load,
/// 503 when no model API key is configured.
pub async fn handle_generate_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let candidate_data = request
        .candidate_data
        .filter(|data| !data.trim().is_empty())
        .ok_or_else(|| AppError::Validation("No candidate data provided".to_string()))?;

    let prompt_config = state
        .summary_prompt
        .as_deref()
        .ok_or_else(|| AppError::Internal("Prompt config could not be loaded".to_string()))?;

    let summarizer = state
        .summarizer
        .as_deref()
        .ok_or_else(|| AppError::Misconfigured("no model API key configured".to_string()))?;

    let summary = generate_summary(summarizer, prompt_config, &candidate_data).await?;
    Ok(Json(SummaryResponse { summary }))
}
