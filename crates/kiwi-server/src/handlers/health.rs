//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::json;

use crate::{AppError, AppState};

/// GET /api/health - Report database and AI backend status
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tx_count = state
        .db
        .count_transactions()
        .map_err(AppError::from_core)?;
    let rule_count = state
        .db
        .count_merchant_rules()
        .map_err(AppError::from_core)?;

    let ai_status = match &state.extractor {
        Some(_) => "configured",
        None => "not_configured",
    };

    Ok(Json(json!({
        "status": "ok",
        "transactions": tx_count,
        "merchant_rules": rule_count,
        "ai": ai_status,
    })))
}
