//! Stock ledger service: manual adjustments, batch receipts, and ledger reads
//!
//! Both write paths are multi-table units (stock update + ledger append,
//! plus batch creation for receipts) and run inside a single transaction:
//! either every row lands or none does. Stock can never go negative after a
//! committed operation; the guard lives in the UPDATE itself rather than in
//! a separate read, so concurrent adjustments cannot lose updates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use shared::models::{format_batch_code, LedgerEntry};
use shared::types::StockDirection;

/// Ledger reason stamped on receipt entries
pub const RECEIPT_REASON: &str = "รับวัสดุเข้า";

/// Default reason for manual adjustments
pub const DEFAULT_ADJUST_REASON: &str = "manual adjustment";

/// Stock ledger service
#[derive(Clone)]
pub struct StockLedgerService {
    db: PgPool,
}

/// Input for receiving a purchase batch
#[derive(Debug, Deserialize)]
pub struct ReceiveMaterialInput {
    pub material_id: i64,
    pub purchase_price: Decimal,
    #[serde(default)]
    pub vat_applicable: bool,
    pub vat_rate: Option<Decimal>,
    pub qty_received: i64,
    pub supplier_name: String,
}

/// Outcome of a successful receipt
#[derive(Debug, Serialize)]
pub struct ReceiptResult {
    pub batch_id: i64,
    pub batch_code: String,
}

/// Row for the ledger history query
#[derive(Debug, FromRow)]
struct LedgerRow {
    id: i64,
    qty: i64,
    direction: String,
    reason: String,
    note: Option<String>,
    created_at: DateTime<Utc>,
    batch_code: Option<String>,
    user_name: Option<String>,
}

impl StockLedgerService {
    /// Create a new StockLedgerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply a signed delta to a material's stock and append a ledger entry.
    ///
    /// The non-negativity check and the write are one conditional UPDATE, so
    /// two concurrent adjustments serialize on the row instead of racing a
    /// read-then-write. Returns the new stock value.
    pub async fn adjust_stock(
        &self,
        material_id: i64,
        delta: i64,
        user_id: i64,
        reason: Option<String>,
    ) -> AppResult<i64> {
        let reason = reason.unwrap_or_else(|| DEFAULT_ADJUST_REASON.to_string());

        let mut tx = self.db.begin().await?;

        let new_stock = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE materials
            SET current_stock = current_stock + $1, updated_at = NOW()
            WHERE id = $2 AND current_stock + $1 >= 0
            RETURNING current_stock
            "#,
        )
        .bind(delta)
        .bind(material_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(new_stock) = new_stock else {
            // No row updated: the material is missing, or the delta would
            // have driven its stock negative. Tell the caller which.
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM materials WHERE id = $1)",
            )
            .bind(material_id)
            .fetch_one(&mut *tx)
            .await?;

            return Err(if exists {
                AppError::InsufficientStock(format!(
                    "adjustment of {} would drive material {} below zero",
                    delta, material_id
                ))
            } else {
                AppError::NotFound("Material".to_string())
            });
        };

        sqlx::query(
            r#"
            INSERT INTO material_logs (material_id, qty, direction, reason, user_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(material_id)
        .bind(delta.abs())
        .bind(StockDirection::from_delta(delta).as_str())
        .bind(&reason)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(new_stock)
    }

    /// Receive a purchase batch: create the batch row, append the ledger
    /// entry, and increment stock, all in one transaction.
    ///
    /// The material row is locked up front so concurrent receipts for the
    /// same material serialize and the derived batch code stays unique; the
    /// `(material_id, batch_code)` unique constraint backstops it. A failed
    /// receipt rolls back completely and consumes no sequence number.
    pub async fn receive_material(
        &self,
        input: ReceiveMaterialInput,
        user_id: i64,
    ) -> AppResult<ReceiptResult> {
        let mut tx = self.db.begin().await?;

        let material = sqlx::query_scalar::<_, i64>(
            "SELECT current_stock FROM materials WHERE id = $1 FOR UPDATE",
        )
        .bind(input.material_id)
        .fetch_optional(&mut *tx)
        .await?;

        if material.is_none() {
            return Err(AppError::NotFound("Material".to_string()));
        }

        let batch_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM material_batches WHERE material_id = $1",
        )
        .bind(input.material_id)
        .fetch_one(&mut *tx)
        .await?;

        let batch_code = format_batch_code(input.material_id, batch_count + 1);

        let batch_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO material_batches
                (material_id, batch_code, purchase_price, vat_applicable, vat_rate,
                 qty_received, qty_remaining, supplier_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(input.material_id)
        .bind(&batch_code)
        .bind(input.purchase_price)
        .bind(input.vat_applicable)
        .bind(input.vat_rate)
        .bind(input.qty_received)
        .bind(input.qty_received)
        .bind(&input.supplier_name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO material_logs (material_id, batch_id, qty, direction, reason, user_id, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(input.material_id)
        .bind(batch_id)
        .bind(input.qty_received)
        .bind(StockDirection::In.as_str())
        .bind(RECEIPT_REASON)
        .bind(user_id)
        .bind(&input.supplier_name)
        .execute(&mut *tx)
        .await?;

        // Receipts only add stock, so a plain atomic increment suffices
        sqlx::query(
            "UPDATE materials SET current_stock = current_stock + $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(input.qty_received)
        .bind(input.material_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ReceiptResult {
            batch_id,
            batch_code,
        })
    }

    /// Ledger history for a material, newest first.
    ///
    /// Left joins keep entries visible when the batch is absent (manual
    /// adjustments) or the acting user no longer exists.
    pub async fn material_ledger(&self, material_id: i64) -> AppResult<Vec<LedgerEntry>> {
        let rows = sqlx::query_as::<_, LedgerRow>(
            r#"
            SELECT l.id, l.qty, l.direction, l.reason, l.note, l.created_at,
                   b.batch_code, u.name AS user_name
            FROM material_logs l
            LEFT JOIN material_batches b ON b.id = l.batch_id
            LEFT JOIN users u ON u.id = l.user_id
            WHERE l.material_id = $1
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(material_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| LedgerEntry {
                id: r.id,
                qty: r.qty,
                direction: r.direction,
                reason: r.reason,
                note: r.note,
                created_at: r.created_at,
                batch_code: r.batch_code,
                user_name: r.user_name,
            })
            .collect())
    }
}
