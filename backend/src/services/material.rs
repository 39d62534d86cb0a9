//! Material catalog service: CRUD, search, and the low-stock report

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::error::{AppError, AppResult};
use shared::models::Material;

/// Material service for the raw-material catalog
#[derive(Clone)]
pub struct MaterialService {
    db: PgPool,
}

/// Row for material queries
#[derive(Debug, FromRow)]
struct MaterialRow {
    id: i64,
    name: String,
    unit: String,
    min_stock: i64,
    current_stock: i64,
    category_id: Option<i64>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MaterialRow> for Material {
    fn from(row: MaterialRow) -> Self {
        Material {
            id: row.id,
            name: row.name,
            unit: row.unit,
            min_stock: row.min_stock,
            current_stock: row.current_stock,
            category_id: row.category_id,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a material
#[derive(Debug, Deserialize)]
pub struct CreateMaterialInput {
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub min_stock: i64,
}

/// Input for a full material update
#[derive(Debug, Deserialize)]
pub struct UpdateMaterialInput {
    pub name: String,
    pub unit: String,
    pub image_url: Option<String>,
    pub category_id: Option<i64>,
    pub min_stock: i64,
}

/// Composite filter for material queries
#[derive(Debug, Default, Deserialize)]
pub struct MaterialFilter {
    /// Name substring
    pub q: Option<String>,
    /// Category id
    pub category: Option<i64>,
    /// Only materials with positive stock
    pub in_stock: Option<bool>,
}

const MATERIAL_COLUMNS: &str =
    "id, name, unit, min_stock, current_stock, category_id, image_url, created_at, updated_at";

impl MaterialService {
    /// Create a new MaterialService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all materials
    pub async fn list(&self) -> AppResult<Vec<Material>> {
        let rows = sqlx::query_as::<_, MaterialRow>(&format!(
            "SELECT {} FROM materials ORDER BY id",
            MATERIAL_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Material::from).collect())
    }

    /// Create a material
    pub async fn create(&self, input: CreateMaterialInput) -> AppResult<Material> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Material name cannot be empty".to_string(),
                message_th: "ชื่อวัสดุไม่สามารถว่างได้".to_string(),
            });
        }
        if input.unit.trim().is_empty() {
            return Err(AppError::Validation {
                field: "unit".to_string(),
                message: "Material unit cannot be empty".to_string(),
                message_th: "หน่วยวัสดุไม่สามารถว่างได้".to_string(),
            });
        }

        let row = sqlx::query_as::<_, MaterialRow>(&format!(
            r#"
            INSERT INTO materials (name, unit, min_stock)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            MATERIAL_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.unit)
        .bind(input.min_stock)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get a material by id
    pub async fn get(&self, material_id: i64) -> AppResult<Material> {
        let row = sqlx::query_as::<_, MaterialRow>(&format!(
            "SELECT {} FROM materials WHERE id = $1",
            MATERIAL_COLUMNS
        ))
        .bind(material_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Material".to_string()))?;

        Ok(row.into())
    }

    /// Search materials by name substring
    pub async fn search(&self, query: &str) -> AppResult<Vec<Material>> {
        let rows = sqlx::query_as::<_, MaterialRow>(&format!(
            "SELECT {} FROM materials WHERE name ILIKE $1 ORDER BY id",
            MATERIAL_COLUMNS
        ))
        .bind(format!("%{}%", query))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Material::from).collect())
    }

    /// Composite filter: name substring, category, positive-stock flag.
    /// An empty filter returns everything; no combination is an error.
    pub async fn filter(&self, filter: MaterialFilter) -> AppResult<Vec<Material>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM materials WHERE 1=1",
            MATERIAL_COLUMNS
        ));

        if let Some(q) = &filter.q {
            qb.push(" AND name ILIKE ").push_bind(format!("%{}%", q));
        }
        if let Some(category) = filter.category {
            qb.push(" AND category_id = ").push_bind(category);
        }
        if filter.in_stock == Some(true) {
            qb.push(" AND current_stock > 0");
        }
        qb.push(" ORDER BY id");

        let rows = qb
            .build_query_as::<MaterialRow>()
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Material::from).collect())
    }

    /// Full update of a material record; reports whether a row changed
    pub async fn update(&self, material_id: i64, input: UpdateMaterialInput) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE materials
            SET name = $1, unit = $2, image_url = $3, category_id = $4, min_stock = $5,
                updated_at = NOW()
            WHERE id = $6
            "#,
        )
        .bind(&input.name)
        .bind(&input.unit)
        .bind(&input.image_url)
        .bind(input.category_id)
        .bind(input.min_stock)
        .bind(material_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Best-effort delete; materials referenced by batches or ledger entries
    /// stay put and surface a conflict instead
    pub async fn delete(&self, material_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(material_id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict {
                        resource: "material".to_string(),
                        message: "Material is referenced by batches or ledger entries".to_string(),
                        message_th: "วัสดุถูกอ้างอิงโดยล็อตหรือรายการในบัญชีสต็อก".to_string(),
                    }
                } else {
                    AppError::DatabaseError(e)
                }
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Materials below their minimum-stock threshold
    pub async fn low_stock(&self) -> AppResult<Vec<Material>> {
        let rows = sqlx::query_as::<_, MaterialRow>(&format!(
            "SELECT {} FROM materials WHERE current_stock < min_stock ORDER BY id",
            MATERIAL_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Material::from).collect())
    }
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"))
}
