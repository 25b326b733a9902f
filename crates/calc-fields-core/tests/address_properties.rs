// Property-based tests for range address arithmetic.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use calc_fields_core::RangeAddress;
use proptest::prelude::*;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

/// Arbitrary range, possibly given with start/end swapped.
fn arb_range() -> impl Strategy<Value = RangeAddress> {
    (0..3i32, -500..500i32, -500..500i32, -500..500i32, -500..500i32)
        .prop_map(|(sheet, c1, r1, c2, r2)| RangeAddress::new(sheet, c1, r1, c2, r2))
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn offset_round_trips(r in arb_range(), a in any::<i32>(), b in any::<i32>()) {
        prop_assert_eq!(r.offset(a, b).offset(a.wrapping_neg(), b.wrapping_neg()), r);
    }

    #[test]
    fn offset_preserves_shape(r in arb_range(), a in -10_000..10_000i32, b in -10_000..10_000i32) {
        let moved = r.offset(a, b);
        prop_assert_eq!(moved.row_count(), r.row_count());
        prop_assert_eq!(moved.column_count(), r.column_count());
    }

    #[test]
    fn intersect_is_commutative(a in arb_range(), b in arb_range()) {
        prop_assert_eq!(a.intersect(&b), b.intersect(&a));
    }

    #[test]
    fn intersect_with_self_is_identity(r in arb_range()) {
        prop_assert_eq!(r.intersect(&r), Some(r.normalized()));
    }

    #[test]
    fn intersection_lies_inside_both(a in arb_range(), b in arb_range()) {
        if let Some(x) = a.intersect(&b) {
            prop_assert!(a.contains(&x.top_left()) && a.contains(&x.bottom_right()));
            prop_assert!(b.contains(&x.top_left()) && b.contains(&x.bottom_right()));
        }
    }

    #[test]
    fn union_covers_both(a in arb_range(), b in arb_range()) {
        match a.union(&b) {
            Some(u) => {
                prop_assert_eq!(u.intersect(&a), Some(a));
                prop_assert_eq!(u.intersect(&b), Some(b));
            }
            None => prop_assert_ne!(a.sheet, b.sheet),
        }
    }

    #[test]
    fn resize_sets_counts(r in arb_range(), rows in 1..200i32, cols in 1..200i32) {
        let sized = r.resize(Some(rows), Some(cols));
        prop_assert_eq!(sized.top_left(), r.top_left());
        prop_assert_eq!(sized.row_count(), rows);
        prop_assert_eq!(sized.column_count(), cols);
    }
}
