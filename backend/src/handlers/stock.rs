//! Stock ledger handlers: adjustments, receipts, ledger history

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::LedgerEntry;
use crate::services::stock::{ReceiptResult, ReceiveMaterialInput, StockLedgerService};
use crate::AppState;

#[derive(Deserialize)]
pub struct AdjustStockRequest {
    /// Signed quantity change
    pub delta: i64,
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct AdjustStockResponse {
    pub new_stock: i64,
}

/// Manually adjust a material's stock; the acting user is stamped into the
/// ledger entry
pub async fn adjust_stock(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(material_id): Path<i64>,
    Json(body): Json<AdjustStockRequest>,
) -> AppResult<Json<AdjustStockResponse>> {
    let service = StockLedgerService::new(state.db);
    let new_stock = service
        .adjust_stock(material_id, body.delta, user.user_id, body.reason)
        .await?;
    Ok(Json(AdjustStockResponse { new_stock }))
}

/// Receive a purchase batch for a material
pub async fn receive_material(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<ReceiveMaterialInput>,
) -> AppResult<(StatusCode, Json<ReceiptResult>)> {
    let service = StockLedgerService::new(state.db);
    let receipt = service.receive_material(input, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Ledger history for a material, newest first
pub async fn material_ledger(
    State(state): State<AppState>,
    Path(material_id): Path<i64>,
) -> AppResult<Json<Vec<LedgerEntry>>> {
    let service = StockLedgerService::new(state.db);
    Ok(Json(service.material_ledger(material_id).await?))
}
