//! User administration policy tests
//!
//! The whole permission table lives in one declarative function pair
//! (`can_manage_user` / `can_assign_roles`); these tests pin its behavior.

use proptest::prelude::*;
use shared::models::{
    can_assign_roles, can_manage_user, is_valid_role_level, ROLE_ADMIN, ROLE_OWNER,
    ROLE_STOREKEEPER,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_owner_has_full_rights() {
        for target_role in 1i16..=5 {
            assert!(can_manage_user(ROLE_OWNER, 1, target_role, 99));
        }
    }

    #[test]
    fn test_admin_blocked_from_owner_accounts() {
        assert!(!can_manage_user(ROLE_ADMIN, 2, ROLE_OWNER, 1));
        // Non-owner targets are fine
        assert!(can_manage_user(ROLE_ADMIN, 2, ROLE_ADMIN, 3));
        assert!(can_manage_user(ROLE_ADMIN, 2, ROLE_STOREKEEPER, 4));
    }

    #[test]
    fn test_self_service_allowed_for_any_role() {
        for role in 1i16..=5 {
            assert!(can_manage_user(role, 7, role, 7));
        }
    }

    #[test]
    fn test_storekeeper_cannot_manage_others() {
        assert!(!can_manage_user(ROLE_STOREKEEPER, 4, ROLE_STOREKEEPER, 5));
        assert!(!can_manage_user(ROLE_STOREKEEPER, 4, ROLE_ADMIN, 2));
        assert!(!can_assign_roles(ROLE_STOREKEEPER));
    }

    #[test]
    fn test_role_assignment_restricted_to_owner_and_admin() {
        assert!(can_assign_roles(ROLE_OWNER));
        assert!(can_assign_roles(ROLE_ADMIN));
        for role in 3i16..=5 {
            assert!(!can_assign_roles(role));
        }
    }

    #[test]
    fn test_valid_role_levels() {
        for level in 1i16..=5 {
            assert!(is_valid_role_level(level));
        }
        assert!(!is_valid_role_level(0));
        assert!(!is_valid_role_level(6));
        assert!(!is_valid_role_level(-1));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn role_strategy() -> impl Strategy<Value = i16> {
        1i16..=5
    }

    fn user_id_strategy() -> impl Strategy<Value = i64> {
        1i64..=10_000
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Everyone may act on their own account
        #[test]
        fn prop_self_management_always_allowed(
            role in role_strategy(),
            id in user_id_strategy()
        ) {
            prop_assert!(can_manage_user(role, id, role, id));
        }

        /// Owners are never denied
        #[test]
        fn prop_owner_manages_everyone(
            target_role in role_strategy(),
            actor_id in user_id_strategy(),
            target_id in user_id_strategy()
        ) {
            prop_assert!(can_manage_user(ROLE_OWNER, actor_id, target_role, target_id));
        }

        /// Admins never act on owner accounts
        #[test]
        fn prop_admin_never_touches_owner(
            actor_id in user_id_strategy(),
            target_id in user_id_strategy()
        ) {
            prop_assert!(!can_manage_user(ROLE_ADMIN, actor_id, ROLE_OWNER, target_id));
        }

        /// Roles without administrative rights only ever reach themselves
        #[test]
        fn prop_unprivileged_roles_self_only(
            actor_role in 3i16..=5,
            target_role in role_strategy(),
            actor_id in user_id_strategy(),
            target_id in user_id_strategy()
        ) {
            let allowed = can_manage_user(actor_role, actor_id, target_role, target_id);
            prop_assert_eq!(allowed, actor_id == target_id);
        }

        /// The management policy implies the role-assignment gate: anyone
        /// who can act on arbitrary other users can also assign roles
        #[test]
        fn prop_assignment_gate_consistent(actor_role in role_strategy()) {
            // Acting on two distinct non-owner strangers
            let manages_strangers = can_manage_user(actor_role, 1, ROLE_STOREKEEPER, 2)
                && can_manage_user(actor_role, 1, 5, 3);
            if manages_strangers {
                prop_assert!(can_assign_roles(actor_role));
            }
        }
    }
}
