//! User models and the user-administration policy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full access to every account and setting
pub const ROLE_OWNER: i16 = 1;
/// Full rights except acting on owner accounts
pub const ROLE_ADMIN: i16 = 2;
/// Read-limited warehouse role
pub const ROLE_STOREKEEPER: i16 = 4;

/// Role levels accepted when creating or editing an account
pub fn is_valid_role_level(level: i16) -> bool {
    (1..=5).contains(&level)
}

/// Single policy decision for acting on another user's account.
///
/// Owners may act on anyone. Admins may act on anyone except owners.
/// Everyone may act on their own account. All other combinations are denied.
pub fn can_manage_user(actor_role: i16, actor_id: i64, target_role: i16, target_id: i64) -> bool {
    if actor_role == ROLE_OWNER {
        return true;
    }
    if actor_role == ROLE_ADMIN {
        return target_role != ROLE_OWNER;
    }
    actor_id == target_id
}

/// Whether the actor may assign roles or toggle account activation at all.
/// Owner and admin only; admins are further restricted by
/// [`can_manage_user`] from touching owner accounts.
pub fn can_assign_roles(actor_role: i16) -> bool {
    actor_role == ROLE_OWNER || actor_role == ROLE_ADMIN
}

/// A user account as exposed to API clients; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role_level: i16,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub img: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reduced projection storekeepers see when listing accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role_level: i16,
    pub is_active: bool,
    pub img: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_manages_everyone() {
        assert!(can_manage_user(ROLE_OWNER, 1, ROLE_OWNER, 2));
        assert!(can_manage_user(ROLE_OWNER, 1, ROLE_ADMIN, 2));
        assert!(can_manage_user(ROLE_OWNER, 1, ROLE_STOREKEEPER, 2));
    }

    #[test]
    fn test_admin_cannot_touch_owner() {
        assert!(!can_manage_user(ROLE_ADMIN, 5, ROLE_OWNER, 1));
        assert!(can_manage_user(ROLE_ADMIN, 5, ROLE_ADMIN, 6));
        assert!(can_manage_user(ROLE_ADMIN, 5, ROLE_STOREKEEPER, 7));
    }

    #[test]
    fn test_everyone_manages_self() {
        assert!(can_manage_user(ROLE_STOREKEEPER, 9, ROLE_STOREKEEPER, 9));
        assert!(!can_manage_user(ROLE_STOREKEEPER, 9, ROLE_STOREKEEPER, 10));
    }

    #[test]
    fn test_role_assignment_gate() {
        assert!(can_assign_roles(ROLE_OWNER));
        assert!(can_assign_roles(ROLE_ADMIN));
        assert!(!can_assign_roles(ROLE_STOREKEEPER));
    }

    #[test]
    fn test_role_level_bounds() {
        assert!(is_valid_role_level(1));
        assert!(is_valid_role_level(5));
        assert!(!is_valid_role_level(0));
        assert!(!is_valid_role_level(6));
    }
}
