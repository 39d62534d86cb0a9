//! Raw-material models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A trackable raw-material stock item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    pub name: String,
    /// Unit of measure (kg, pcs, ...)
    pub unit: String,
    /// Minimum-threshold alert level
    pub min_stock: i64,
    /// Current on-hand quantity; never negative after a committed operation
    pub current_stock: i64,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Material {
    /// Whether the material has fallen below its minimum-stock threshold
    pub fn is_low_stock(&self) -> bool {
        self.current_stock < self.min_stock
    }
}
