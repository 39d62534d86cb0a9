//! Stock ledger models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stock ledger entry as shown to API clients.
///
/// Joined against the batch (for the batch code) and the acting user (for
/// the display name); both joins are optional, so manual adjustments and
/// entries whose user has since been removed still appear with those fields
/// empty. Entries are immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    /// Non-negative magnitude of the quantity change
    pub qty: i64,
    /// `in` or `out`
    pub direction: String,
    pub reason: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub batch_code: Option<String>,
    pub user_name: Option<String>,
}
