//! Merchant rule handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppError, AppState};

/// GET /api/rules - List learned merchant rules
pub async fn list_rules(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let rules = state
        .db
        .list_merchant_rules()
        .map_err(AppError::from_core)?;
    Ok(Json(json!(rules)))
}

/// Request body for setting a rule
#[derive(Debug, Deserialize)]
pub struct SetRuleRequest {
    pub category: String,
}

/// PUT /api/rules/:merchant - Set or correct the category for a merchant
///
/// Unlike automatic learning, this overwrites an existing rule.
pub async fn set_rule(
    State(state): State<Arc<AppState>>,
    Path(merchant): Path<String>,
    Json(request): Json<SetRuleRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let rule = state
        .db
        .set_merchant_rule(&merchant, &request.category)
        .map_err(AppError::from_core)?;
    Ok(Json(json!(rule)))
}
