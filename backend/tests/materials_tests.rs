//! Material catalog tests
//!
//! Low-stock reporting and the composite filter predicate.

use chrono::Utc;
use proptest::prelude::*;
use shared::models::Material;

fn material(id: i64, name: &str, min_stock: i64, current_stock: i64) -> Material {
    let now = Utc::now();
    Material {
        id,
        name: name.to_string(),
        unit: "kg".to_string(),
        min_stock,
        current_stock,
        category_id: None,
        image_url: None,
        created_at: now,
        updated_at: now,
    }
}

/// Mirror of the composite filter's WHERE clause
fn matches_filter(m: &Material, q: Option<&str>, category: Option<i64>, in_stock: bool) -> bool {
    if let Some(q) = q {
        if !m.name.to_lowercase().contains(&q.to_lowercase()) {
            return false;
        }
    }
    if let Some(category) = category {
        if m.category_id != Some(category) {
            return false;
        }
    }
    if in_stock && m.current_stock <= 0 {
        return false;
    }
    true
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_low_stock_boundary() {
        assert!(material(1, "Steel rod", 100, 99).is_low_stock());
        // Exactly at the threshold is not low
        assert!(!material(1, "Steel rod", 100, 100).is_low_stock());
        assert!(!material(1, "Steel rod", 100, 150).is_low_stock());
    }

    #[test]
    fn test_zero_threshold_never_low() {
        assert!(!material(2, "Scrap", 0, 0).is_low_stock());
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let m = material(1, "Copper wire", 10, 0);
        assert!(matches_filter(&m, None, None, false));
    }

    #[test]
    fn test_name_filter_is_case_insensitive() {
        let m = material(1, "Copper wire", 10, 5);
        assert!(matches_filter(&m, Some("copper"), None, false));
        assert!(matches_filter(&m, Some("WIRE"), None, false));
        assert!(!matches_filter(&m, Some("steel"), None, false));
    }

    #[test]
    fn test_category_filter() {
        let mut m = material(1, "Copper wire", 10, 5);
        m.category_id = Some(3);
        assert!(matches_filter(&m, None, Some(3), false));
        assert!(!matches_filter(&m, None, Some(4), false));

        // Uncategorized materials never match a category filter
        let uncategorized = material(2, "Misc", 0, 0);
        assert!(!matches_filter(&uncategorized, None, Some(3), false));
    }

    #[test]
    fn test_in_stock_flag_excludes_empty() {
        let empty = material(1, "Copper wire", 10, 0);
        let stocked = material(2, "Copper wire", 10, 1);
        assert!(!matches_filter(&empty, None, None, true));
        assert!(matches_filter(&stocked, None, None, true));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A material is low on stock iff current < min
        #[test]
        fn prop_low_stock_definition(
            min_stock in 0i64..=10_000,
            current_stock in 0i64..=10_000
        ) {
            let m = material(1, "Bolt", min_stock, current_stock);
            prop_assert_eq!(m.is_low_stock(), current_stock < min_stock);
        }

        /// The empty filter never excludes anything
        #[test]
        fn prop_empty_filter_total(
            current_stock in 0i64..=10_000,
            name in "[A-Za-z ]{1,30}"
        ) {
            let m = material(1, &name, 0, current_stock);
            prop_assert!(matches_filter(&m, None, None, false));
        }

        /// The in-stock flag keeps exactly the materials with positive stock
        #[test]
        fn prop_in_stock_flag(current_stock in 0i64..=10_000) {
            let m = material(1, "Bolt", 0, current_stock);
            prop_assert_eq!(matches_filter(&m, None, None, true), current_stock > 0);
        }

        /// A material always matches a substring of its own name
        #[test]
        fn prop_name_substring_matches(name in "[a-z]{3,20}") {
            let m = material(1, &name, 0, 0);
            let mid = name.len() / 2;
            prop_assert!(matches_filter(&m, Some(&name[..mid]), None, false));
            prop_assert!(matches_filter(&m, Some(&name[mid..]), None, false));
        }
    }
}
