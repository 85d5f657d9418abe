//! Reorder alert tests
//!
//! Tests for the edge-triggered alert rule:
//! - an alert fires only on the mutation that crosses the
//!   threshold, never on later mutations while still below it
//! - out_of_stock takes precedence when the quantity hits zero

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{apply_delta, evaluate_reorder_alert, AlertSeverity};

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
    fn test_low_stock_fires_on_crossing() {
        assert_eq!(
            evaluate_reorder_alert(dec("100"), dec("15"), dec("20")),
            Some(AlertSeverity::LowStock)
        );
    }

    #[test]
    fn test_no_alert_above_level() {
        assert_eq!(evaluate_reorder_alert(dec("100"), dec("60"), dec("20")), None);
    }

    #[test]
    fn test_out_of_stock_on_reaching_zero() {
        assert_eq!(
            evaluate_reorder_alert(dec("5"), dec("0"), dec("20")),
            Some(AlertSeverity::OutOfStock)
        );
    }

    #[test]
    fn test_no_alert_when_already_at_zero() {
        // The crossing fired earlier; a redundant mutation landing on zero
        // again (restock of zero is impossible, but the rule is total) is
        // silent.
        assert_eq!(evaluate_reorder_alert(dec("0"), dec("0"), dec("20")), None);
    }

    #[test]
    fn test_recovery_is_silent() {
        assert_eq!(evaluate_reorder_alert(dec("5"), dec("205"), dec("20")), None);
    }

    /// With reorder level 10, usages taking the quantity 15 -> 9 -> 8 -> 7
    /// emit exactly one low_stock alert, at the 9 transition.
    #[test]
    fn test_edge_triggered_no_alert_storm() {
        let level = dec("10");
        let steps = [
            (dec("15"), dec("9")),
            (dec("9"), dec("8")),
            (dec("8"), dec("7")),
        ];

        let alerts: Vec<_> = steps
            .iter()
            .filter_map(|(prev, new)| evaluate_reorder_alert(*prev, *new, level))
            .collect();

        assert_eq!(alerts, vec![AlertSeverity::LowStock]);
    }

    /// Items without a configured reorder level default to 0, making the
    /// low-stock and out-of-stock conditions coincide; out_of_stock wins.
    #[test]
    fn test_zero_level_default() {
        assert_eq!(
            evaluate_reorder_alert(dec("2"), dec("0"), dec("0")),
            Some(AlertSeverity::OutOfStock)
        );
        assert_eq!(evaluate_reorder_alert(dec("2"), dec("1"), dec("0")), None);
    }

    /// Dropping from above the level straight to zero reports out_of_stock,
    /// not two alerts.
    #[test]
    fn test_single_alert_per_mutation() {
        assert_eq!(
            evaluate_reorder_alert(dec("50"), dec("0"), dec("20")),
            Some(AlertSeverity::OutOfStock)
        );
    }

    /// A full usage sequence over the ledger arithmetic: alerts track the
    /// accepted mutations only.
    #[test]
    fn test_alerts_follow_accepted_adjustments() {
        let level = dec("20");
        let mut quantity = dec("100");
        let mut alerts = Vec::new();

        for delta in [dec("-85"), dec("-20"), dec("-15")] {
            match apply_delta(quantity, delta) {
                Some(next) => {
                    if let Some(severity) = evaluate_reorder_alert(quantity, next, level) {
                        alerts.push(severity);
                    }
                    quantity = next;
                }
                None => {
                    // Refused adjustment leaves the ledger unchanged and
                    // cannot emit an alert.
                }
            }
        }

        // 100 -> 15 fires low_stock; -20 is refused; 15 -> 0 fires
        // out_of_stock.
        assert_eq!(quantity, dec("0"));
        assert_eq!(alerts, vec![AlertSeverity::LowStock, AlertSeverity::OutOfStock]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// No alert ever fires when the previous quantity was
        /// already at or below the reorder level (edge-triggered, not
        /// level-triggered).
        #[test]
        fn prop_no_alert_when_already_below(
            level in quantity_strategy(),
            previous in quantity_strategy(),
            new in quantity_strategy()
        ) {
            prop_assume!(previous <= level);
            prop_assume!(new > Decimal::ZERO || previous == Decimal::ZERO);

            prop_assert_eq!(evaluate_reorder_alert(previous, new, level), None);
        }

        /// No alert fires when the new quantity stays above the
        /// reorder level.
        #[test]
        fn prop_no_alert_above_level(
            level in quantity_strategy(),
            previous in quantity_strategy(),
            extra in (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
        ) {
            let new = level + extra;
            prop_assert_eq!(evaluate_reorder_alert(previous, new, level), None);
        }

        /// Reaching zero from a positive quantity always
        /// reports out_of_stock, regardless of the configured level.
        #[test]
        fn prop_zero_is_out_of_stock(
            level in quantity_strategy(),
            previous in (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
        ) {
            prop_assert_eq!(
                evaluate_reorder_alert(previous, Decimal::ZERO, level),
                Some(AlertSeverity::OutOfStock)
            );
        }

        /// A monotonically decreasing usage run emits at most one low_stock
        /// and at most one out_of_stock alert in total.
        #[test]
        fn prop_at_most_one_alert_per_severity(
            level in quantity_strategy(),
            initial in quantity_strategy(),
            usages in prop::collection::vec((1i64..=500i64).prop_map(|n| Decimal::new(n, 1)), 1..20)
        ) {
            let mut quantity = initial;
            let mut low = 0;
            let mut out = 0;

            for usage in &usages {
                if let Some(next) = apply_delta(quantity, -usage) {
                    match evaluate_reorder_alert(quantity, next, level) {
                        Some(AlertSeverity::LowStock) => low += 1,
                        Some(AlertSeverity::OutOfStock) => out += 1,
                        None => {}
                    }
                    quantity = next;
                }
            }

            prop_assert!(low <= 1);
            prop_assert!(out <= 1);
        }
    }
}
