//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{AppError, AppState};
use kiwi_core::models::{DeleteOutcome, InsertOutcome, NewTransaction, SyncTransaction};

/// POST /api/transactions - Record a transaction
///
/// A duplicate (same user, amount, merchant, date, and kind) is acknowledged
/// with 200 and `skipped: true` rather than stored twice, so clients can
/// safely retry.
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(new_tx): Json<NewTransaction>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let outcome = state
        .db
        .insert_transaction(&new_tx)
        .map_err(AppError::from_core)?;

    match outcome {
        InsertOutcome::Inserted(tx) => Ok((StatusCode::CREATED, Json(json!(tx)))),
        InsertOutcome::Skipped => Ok((
            StatusCode::OK,
            Json(json!({
                "skipped": true,
                "message": "Duplicate transaction ignored"
            })),
        )),
    }
}

/// GET /api/users/:user_id/transactions - List a user's transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let transactions = state
        .db
        .list_transactions(&user_id)
        .map_err(AppError::from_core)?;
    Ok(Json(json!(transactions)))
}

/// DELETE /api/transactions/:id - Delete a transaction
///
/// Deleting a missing id is reported, not failed, so repeated deletes from a
/// laggy client don't surface errors.
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state
        .db
        .delete_transaction(id)
        .map_err(AppError::from_core)?;

    match outcome {
        DeleteOutcome::Deleted => Ok(Json(json!({"deleted": true}))),
        DeleteOutcome::NotFound => Ok(Json(json!({"deleted": false, "not_found": true}))),
    }
}

/// Request body for bulk sync
#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub transactions: Vec<SyncTransaction>,
}

#[derive(Serialize)]
pub struct SyncResponse {
    /// Number of rows inserted or updated
    pub count: usize,
    /// Number of records in the batch
    pub total: usize,
}

/// POST /api/transactions/sync - Bulk upsert by client-assigned id
pub async fn sync_transactions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, AppError> {
    let total = request.transactions.len();
    let count = state
        .db
        .sync_transactions(&request.transactions)
        .map_err(AppError::from_core)?;

    Ok(Json(SyncResponse { count, total }))
}
