//! SMS analysis handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::json;

use crate::{AppError, AppState};

/// Request body for SMS analysis
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub sms_text: String,
}

/// POST /api/sms/analyze - Extract a transaction candidate from SMS text
///
/// Non-financial texts (OTPs, promotions) return 200 with
/// `not_a_transaction: true`; they are an expected outcome, not an error.
pub async fn analyze_sms(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let extractor = state.extractor.as_ref().ok_or_else(|| {
        AppError::service_unavailable("SMS analysis unavailable: no AI backend configured")
    })?;

    let analysis = extractor
        .analyze(&state.db, &request.sms_text)
        .await
        .map_err(AppError::from_core)?;

    match analysis {
        Some(a) => Ok(Json(json!(a))),
        None => Ok(Json(json!({"not_a_transaction": true}))),
    }
}
