//! Material catalog handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::Material;
use crate::services::material::{
    CreateMaterialInput, MaterialFilter, MaterialService, UpdateMaterialInput,
};
use crate::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct UpdateStatus {
    pub updated: bool,
}

#[derive(Serialize)]
pub struct DeleteStatus {
    pub deleted: bool,
}

/// List all materials
pub async fn list_materials(State(state): State<AppState>) -> AppResult<Json<Vec<Material>>> {
    let service = MaterialService::new(state.db);
    Ok(Json(service.list().await?))
}

/// Create a material
pub async fn create_material(
    State(state): State<AppState>,
    Json(input): Json<CreateMaterialInput>,
) -> AppResult<(StatusCode, Json<Material>)> {
    let service = MaterialService::new(state.db);
    let material = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

/// Get a material by id
pub async fn get_material(
    State(state): State<AppState>,
    Path(material_id): Path<i64>,
) -> AppResult<Json<Material>> {
    let service = MaterialService::new(state.db);
    Ok(Json(service.get(material_id).await?))
}

/// Search materials by name substring
pub async fn search_materials(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Material>>> {
    let service = MaterialService::new(state.db);
    let materials = service.search(query.q.as_deref().unwrap_or("")).await?;
    Ok(Json(materials))
}

/// Composite filter over the catalog
pub async fn filter_materials(
    State(state): State<AppState>,
    Query(filter): Query<MaterialFilter>,
) -> AppResult<Json<Vec<Material>>> {
    let service = MaterialService::new(state.db);
    Ok(Json(service.filter(filter).await?))
}

/// Full update of a material
pub async fn update_material(
    State(state): State<AppState>,
    Path(material_id): Path<i64>,
    Json(input): Json<UpdateMaterialInput>,
) -> AppResult<Json<UpdateStatus>> {
    let service = MaterialService::new(state.db);
    let updated = service.update(material_id, input).await?;
    Ok(Json(UpdateStatus { updated }))
}

/// Best-effort delete of a material
pub async fn delete_material(
    State(state): State<AppState>,
    Path(material_id): Path<i64>,
) -> AppResult<Json<DeleteStatus>> {
    let service = MaterialService::new(state.db);
    let deleted = service.delete(material_id).await?;
    Ok(Json(DeleteStatus { deleted }))
}

/// Materials below their minimum-stock threshold
pub async fn low_stock_materials(State(state): State<AppState>) -> AppResult<Json<Vec<Material>>> {
    let service = MaterialService::new(state.db);
    Ok(Json(service.low_stock().await?))
}
