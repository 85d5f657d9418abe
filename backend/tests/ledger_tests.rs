//! Stock ledger tests
//!
//! Tests for the atomic adjustment contract:
//! - no lost updates: the final quantity equals the initial
//!   quantity plus the sum of accepted deltas
//! - non-negativity: no adjustment is accepted if it would
//!   drive the balance below zero

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::apply_delta;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_increment() {
        assert_eq!(apply_delta(dec("100.0"), dec("15.5")), Some(dec("115.5")));
    }

    #[test]
    fn test_decrement() {
        assert_eq!(apply_delta(dec("100.0"), dec("-85.0")), Some(dec("15.0")));
    }

    #[test]
    fn test_decrement_to_exactly_zero() {
        assert_eq!(apply_delta(dec("20.0"), dec("-20.0")), Some(dec("0.0")));
    }

    #[test]
    fn test_overdraw_refused() {
        // 15 on hand, 20 requested: refused, ledger unchanged.
        assert_eq!(apply_delta(dec("15.0"), dec("-20.0")), None);
    }

    #[test]
    fn test_fractional_quantities() {
        assert_eq!(apply_delta(dec("1.250"), dec("-0.750")), Some(dec("0.500")));
    }

    /// Two concurrent over-drawing decrements: whichever is ordered first
    /// wins, the other sees the reduced balance and is refused.
    #[test]
    fn test_serialized_overdraw_one_winner() {
        let initial = dec("50.0");
        let first = apply_delta(initial, dec("-40.0"));
        assert_eq!(first, Some(dec("10.0")));

        let second = apply_delta(first.unwrap(), dec("-40.0"));
        assert_eq!(second, None);
    }

    /// Interleaving a restock between usages changes the outcome, which is
    /// exactly why adjustments on one item must be strictly ordered.
    #[test]
    fn test_order_matters_for_acceptance() {
        let mut qty = dec("10.0");
        for delta in [dec("-8.0"), dec("5.0"), dec("-6.0")] {
            if let Some(next) = apply_delta(qty, delta) {
                qty = next;
            }
        }
        assert_eq!(qty, dec("1.0"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for signed deltas (usage decrements and restocks)
    fn delta_strategy() -> impl Strategy<Value = Decimal> {
        (-5000i64..=5000i64).prop_map(|n| Decimal::new(n, 1))
    }

    /// Strategy for non-negative starting balances
    fn balance_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// For any sequence of adjustments applied in order,
        /// the final quantity equals the initial quantity plus the sum of
        /// the deltas that were accepted. Rejected calls contribute nothing.
        #[test]
        fn prop_conservation_of_accepted_deltas(
            initial in balance_strategy(),
            deltas in prop::collection::vec(delta_strategy(), 1..30)
        ) {
            let mut quantity = initial;
            let mut accepted_sum = Decimal::ZERO;

            for delta in &deltas {
                if let Some(next) = apply_delta(quantity, *delta) {
                    quantity = next;
                    accepted_sum += delta;
                }
            }

            prop_assert_eq!(quantity, initial + accepted_sum);
        }

        /// The balance never goes negative, no matter the
        /// adjustment sequence.
        #[test]
        fn prop_balance_never_negative(
            initial in balance_strategy(),
            deltas in prop::collection::vec(delta_strategy(), 1..30)
        ) {
            let mut quantity = initial;

            for delta in &deltas {
                if let Some(next) = apply_delta(quantity, *delta) {
                    quantity = next;
                }
                prop_assert!(quantity >= Decimal::ZERO);
            }
        }

        /// A decrement is accepted exactly when the balance covers it.
        #[test]
        fn prop_decrement_acceptance_matches_balance(
            balance in balance_strategy(),
            usage in (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
        ) {
            let result = apply_delta(balance, -usage);
            if usage <= balance {
                prop_assert_eq!(result, Some(balance - usage));
            } else {
                prop_assert_eq!(result, None);
            }
        }

        /// Increments are always accepted.
        #[test]
        fn prop_restock_always_accepted(
            balance in balance_strategy(),
            restock in (0i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
        ) {
            prop_assert_eq!(apply_delta(balance, restock), Some(balance + restock));
        }
    }
}
