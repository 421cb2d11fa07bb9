use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::candidate::create_candidate;
use crate::document::DocumentSource;
use crate::errors::AppError;
use crate::models::candidate::{CandidateDoc, NewCandidate};
use crate::pipeline::{Pipeline, RunReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CvTextRequest {
    #[serde(rename = "cvText")]
    pub cv_text: String,
}

fn pipeline(state: &AppState) -> Result<&Pipeline, AppError> {
    state
        .pipeline
        .as_ref()
        .ok_or_else(|| AppError::Misconfigured("no model API key configured".to_string()))
}

fn report_response(report: RunReport) -> (StatusCode, Json<RunReport>) {
    let status = if report.is_complete() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    (status, Json(report))
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("Missing required field '{field}'")))
}

fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    required(value.filter(|v| !v.trim().is_empty()), field)
}

/// POST /api/v1/candidates
///
/// Inserts the candidate, then runs skill extraction on the submitted text.
/// A failed extraction still leaves the candidate saved (201 + warning).
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    Json(req): Json<NewCandidate>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let candidate = CandidateDoc {
        id: required(req.id, "id")?,
        name: required_text(req.name, "name")?,
        email: required_text(req.email, "email")?,
        cv_text: required_text(req.cv_text, "cvText")?,
    };

    create_candidate(state.store.as_ref(), &state.config.bucket, &candidate).await?;

    let outcome = match pipeline(&state) {
        Ok(p) => p
            .run(DocumentSource::Text(candidate.cv_text.clone()), candidate.id)
            .await
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match outcome {
        Ok(report) => Ok((
            StatusCode::OK,
            Json(json!({
                "message": "Candidate added and processed successfully",
                "report": report
            })),
        )),
        Err(details) => {
            warn!("Candidate {} saved but skill extraction failed: {details}", candidate.id);
            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "warning": "Candidate saved, but skill extraction failed",
                    "details": details
                })),
            ))
        }
    }
}

/// POST /api/v1/candidates/:id/cv
pub async fn handle_process_text(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
    Json(req): Json<CvTextRequest>,
) -> Result<(StatusCode, Json<RunReport>), AppError> {
    let report = pipeline(&state)?
        .run(DocumentSource::Text(req.cv_text), candidate_id)
        .await?;
    Ok(report_response(report))
}

/// POST /api/v1/candidates/:id/cv/upload — multipart with a PDF in `file`.
pub async fn handle_process_upload(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<RunReport>), AppError> {
    let pipeline = pipeline(&state)?;

    let mut pdf = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            pdf = Some(bytes);
        }
    }

    let pdf = required(pdf, "file")?;
    let report = pipeline
        .run(DocumentSource::PdfBytes(pdf), candidate_id)
        .await?;
    Ok(report_response(report))
}
