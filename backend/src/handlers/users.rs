//! User administration handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{can_assign_roles, UserSummary, UserView, ROLE_STOREKEEPER};
use crate::services::user::{
    CreateUserInput, UpdateSelfInput, UpdateUserInput, UserProfile, UserService,
};
use crate::AppState;

/// Listing shape depends on the actor's role
#[derive(Serialize)]
#[serde(untagged)]
pub enum UsersResponse {
    Full(Vec<UserView>),
    Summary(Vec<UserSummary>),
}

/// Current user's own record
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<UserView>> {
    let service = UserService::new(state.db);
    Ok(Json(service.get(user.user_id).await?))
}

/// Self-service profile update
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<UpdateSelfInput>,
) -> AppResult<Json<UserView>> {
    check_input(&input)?;
    let service = UserService::new(state.db);
    Ok(Json(service.update_self(user.user_id, input).await?))
}

/// List all users; owners and admins see full records, storekeepers a
/// reduced projection, everyone else is denied
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<UsersResponse>> {
    let service = UserService::new(state.db);

    if can_assign_roles(user.role_level) {
        return Ok(Json(UsersResponse::Full(service.list_full().await?)));
    }
    if user.role_level == ROLE_STOREKEEPER {
        return Ok(Json(UsersResponse::Summary(service.list_summaries().await?)));
    }
    Err(AppError::InsufficientPermissions)
}

/// Get one user, shaped by what the actor may see
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<Json<UserProfile>> {
    let service = UserService::new(state.db);
    let profile = service
        .get_as(user.role_level, user.user_id, user_id)
        .await?;
    Ok(Json(profile))
}

/// Create a user account (owner/admin only)
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<UserView>)> {
    check_input(&input)?;
    let service = UserService::new(state.db);
    let created = service.create(user.role_level, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Edit a user account
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<i64>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<UserView>> {
    check_input(&input)?;
    let service = UserService::new(state.db);
    let updated = service
        .update(user.role_level, user.user_id, user_id, input)
        .await?;
    Ok(Json(updated))
}

/// Delete a user account
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = UserService::new(state.db);
    service
        .delete(user.role_level, user.user_id, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Run validator-derived checks, folding the first failure into the
/// standard validation error shape
fn check_input<T: Validate>(input: &T) -> AppResult<()> {
    input.validate().map_err(|errors| {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "body".to_string());
        AppError::Validation {
            message: format!("Invalid value for field '{}'", field),
            message_th: format!("ข้อมูลในช่อง '{}' ไม่ถูกต้อง", field),
            field,
        }
    })
}
