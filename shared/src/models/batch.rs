//! Purchase batch models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One discrete receipt of a material from a supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialBatch {
    pub id: i64,
    pub material_id: i64,
    /// Human-readable code, see [`format_batch_code`]
    pub batch_code: String,
    pub purchase_price: Decimal,
    pub vat_applicable: bool,
    pub vat_rate: Option<Decimal>,
    /// Quantity received from the supplier; immutable once set
    pub qty_received: i64,
    /// Starts equal to `qty_received`; reserved for future consumption tracking
    pub qty_remaining: i64,
    pub supplier_name: String,
    pub created_at: DateTime<Utc>,
}

/// Format a batch code from a material id and a per-material sequence number.
///
/// Codes look like `RM00070001`: the material id and the sequence, each
/// zero-padded to four digits. The sequence is 1-based and derived from the
/// number of batches already recorded for the material.
pub fn format_batch_code(material_id: i64, sequence: i64) -> String {
    format!("RM{:04}{:04}", material_id, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_code_format() {
        assert_eq!(format_batch_code(7, 1), "RM00070001");
        assert_eq!(format_batch_code(42, 13), "RM00420013");
        assert_eq!(format_batch_code(1234, 9999), "RM12349999");
    }

    #[test]
    fn test_batch_code_wide_ids() {
        // Ids beyond four digits widen the field instead of truncating
        assert_eq!(format_batch_code(12345, 1), "RM123450001");
    }
}
