//! User administration service
//!
//! Every permission decision here goes through the policy functions in
//! `shared::models::user`; handlers and service methods never compare role
//! integers directly.

use bcrypt::{hash, DEFAULT_COST};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::auth::UserRow;
use shared::models::{
    can_assign_roles, can_manage_user, UserSummary, UserView, ROLE_ADMIN, ROLE_OWNER,
    ROLE_STOREKEEPER,
};

/// User service for account administration
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// Input for creating a user account
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(range(min = 1, max = 5))]
    pub role_level: i16,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub img: Option<String>,
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Input for editing another user's account
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub role_level: Option<i16>,
    pub is_active: Option<bool>,
    pub img: Option<String>,
    pub description: Option<String>,
}

/// Input for self-service profile updates; role and activation excluded
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSelfInput {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub img: Option<String>,
    pub description: Option<String>,
}

/// Projection of a user account shaped by the actor's role
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UserProfile {
    Full(UserView),
    Summary(UserSummary),
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role_level, is_active, last_login, \
                            img, description, created_at, updated_at";

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a user by id
    pub async fn get(&self, user_id: i64) -> AppResult<UserView> {
        Ok(self.fetch_row(user_id).await?.into_view())
    }

    /// Get a user the way the acting user is allowed to see it
    pub async fn get_as(
        &self,
        actor_role: i16,
        actor_id: i64,
        target_id: i64,
    ) -> AppResult<UserProfile> {
        let target = self.fetch_row(target_id).await?;

        if can_manage_user(actor_role, actor_id, target.role_level, target.id) {
            return Ok(UserProfile::Full(target.into_view()));
        }
        if actor_role == ROLE_STOREKEEPER {
            let view = target.into_view();
            return Ok(UserProfile::Summary(UserSummary {
                id: view.id,
                name: view.name,
                email: view.email,
                role_level: view.role_level,
                is_active: view.is_active,
                img: view.img,
            }));
        }
        Err(AppError::InsufficientPermissions)
    }

    /// List all accounts with full records (owner/admin view)
    pub async fn list_full(&self) -> AppResult<Vec<UserView>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY id",
            USER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(UserRow::into_view).collect())
    }

    /// List all accounts as the reduced storekeeper projection
    pub async fn list_summaries(&self) -> AppResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, (i64, String, String, i16, bool, Option<String>)>(
            "SELECT id, name, email, role_level, is_active, img FROM users ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| UserSummary {
                id: r.0,
                name: r.1,
                email: r.2,
                role_level: r.3,
                is_active: r.4,
                img: r.5,
            })
            .collect())
    }

    /// Create a user account (owner/admin only)
    pub async fn create(&self, actor_role: i16, input: CreateUserInput) -> AppResult<UserView> {
        if !can_assign_roles(actor_role) {
            return Err(AppError::InsufficientPermissions);
        }
        // Admins may not mint owner accounts
        if actor_role == ROLE_ADMIN && input.role_level == ROLE_OWNER {
            return Err(AppError::InsufficientPermissions);
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role_level, is_active, img, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(input.role_level)
        .bind(input.is_active)
        .bind(&input.img)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict {
                    resource: "email".to_string(),
                    message: "A user with this email already exists".to_string(),
                    message_th: "มีผู้ใช้อีเมลนี้อยู่แล้ว".to_string(),
                }
            } else {
                AppError::DatabaseError(e)
            }
        })?;

        Ok(row.into_view())
    }

    /// Edit a user account, guarded by the management policy
    pub async fn update(
        &self,
        actor_role: i16,
        actor_id: i64,
        target_id: i64,
        input: UpdateUserInput,
    ) -> AppResult<UserView> {
        let target = self.fetch_row(target_id).await?;

        if !can_manage_user(actor_role, actor_id, target.role_level, target.id) {
            return Err(AppError::InsufficientPermissions);
        }
        // Role and activation changes are owner/admin operations
        if (input.role_level.is_some() || input.is_active.is_some()) && !can_assign_roles(actor_role)
        {
            return Err(AppError::InsufficientPermissions);
        }

        if input.name.is_none()
            && input.email.is_none()
            && input.password.is_none()
            && input.role_level.is_none()
            && input.is_active.is_none()
            && input.img.is_none()
            && input.description.is_none()
        {
            return Err(nothing_to_update());
        }

        let password_hash = match &input.password {
            Some(password) => Some(
                hash(password, DEFAULT_COST)
                    .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?,
            ),
            None => None,
        };

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = NOW()");
        if let Some(name) = &input.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(email) = &input.email {
            qb.push(", email = ").push_bind(email);
        }
        if let Some(hash) = &password_hash {
            qb.push(", password_hash = ").push_bind(hash);
        }
        if let Some(role_level) = input.role_level {
            qb.push(", role_level = ").push_bind(role_level);
        }
        if let Some(is_active) = input.is_active {
            qb.push(", is_active = ").push_bind(is_active);
        }
        if let Some(img) = &input.img {
            qb.push(", img = ").push_bind(img);
        }
        if let Some(description) = &input.description {
            qb.push(", description = ").push_bind(description);
        }
        qb.push(" WHERE id = ").push_bind(target_id);
        qb.build().execute(&self.db).await?;

        self.get(target_id).await
    }

    /// Self-service profile update
    pub async fn update_self(&self, user_id: i64, input: UpdateSelfInput) -> AppResult<UserView> {
        if input.name.is_none()
            && input.email.is_none()
            && input.password.is_none()
            && input.img.is_none()
            && input.description.is_none()
        {
            return Err(nothing_to_update());
        }

        let password_hash = match &input.password {
            Some(password) => Some(
                hash(password, DEFAULT_COST)
                    .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?,
            ),
            None => None,
        };

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = NOW()");
        if let Some(name) = &input.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(email) = &input.email {
            qb.push(", email = ").push_bind(email);
        }
        if let Some(hash) = &password_hash {
            qb.push(", password_hash = ").push_bind(hash);
        }
        if let Some(img) = &input.img {
            qb.push(", img = ").push_bind(img);
        }
        if let Some(description) = &input.description {
            qb.push(", description = ").push_bind(description);
        }
        qb.push(" WHERE id = ").push_bind(user_id);
        qb.build().execute(&self.db).await?;

        self.get(user_id).await
    }

    /// Delete a user account; removing an absent user is a no-op
    pub async fn delete(&self, actor_role: i16, actor_id: i64, target_id: i64) -> AppResult<()> {
        let target = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(target_id)
        .fetch_optional(&self.db)
        .await?;

        let Some(target) = target else {
            return Ok(());
        };

        if !can_manage_user(actor_role, actor_id, target.role_level, target.id) {
            return Err(AppError::InsufficientPermissions);
        }

        // The system must always retain at least one owner
        if target.role_level == ROLE_OWNER {
            let owners = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM users WHERE role_level = $1",
            )
            .bind(ROLE_OWNER)
            .fetch_one(&self.db)
            .await?;

            if owners <= 1 {
                return Err(AppError::Conflict {
                    resource: "user".to_string(),
                    message: "Cannot delete the last owner".to_string(),
                    message_th: "ไม่สามารถลบเจ้าของคนสุดท้ายได้".to_string(),
                });
            }
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(target_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn fetch_row(&self, user_id: i64) -> AppResult<UserRow> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))
    }
}

fn nothing_to_update() -> AppError {
    AppError::Validation {
        field: "body".to_string(),
        message: "Nothing to update".to_string(),
        message_th: "ไม่มีข้อมูลให้แก้ไข".to_string(),
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
