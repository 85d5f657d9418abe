//! Usage recording tests
//!
//! Exercises the pure ledger rules as the usage workflow composes them:
//! validation up front, then an atomic decrement, then the alert check
//! against the pre-adjustment quantity.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{apply_delta, evaluate_reorder_alert, AlertSeverity};
use shared::validation::{validate_purpose, validate_quantity};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Test Helpers
// ============================================================================

mod helpers {
    use super::*;

    /// In-memory stand-in for one item's ledger. Mirrors the service
    /// pipeline: a usage either applies in full (balance moves, history
    /// grows, alert may fire) or is refused leaving everything untouched.
    pub struct ItemLedger {
        pub balance: Decimal,
        pub reorder_level: Decimal,
        pub history: Vec<Decimal>,
        pub alerts: Vec<AlertSeverity>,
    }

    impl ItemLedger {
        pub fn new(balance: Decimal, reorder_level: Decimal) -> Self {
            Self {
                balance,
                reorder_level,
                history: Vec::new(),
                alerts: Vec::new(),
            }
        }

        pub fn record_usage(&mut self, quantity: Decimal, purpose: &str) -> Result<(), String> {
            validate_quantity(quantity).map_err(str::to_owned)?;
            validate_purpose(purpose).map_err(str::to_owned)?;
            let new_balance = apply_delta(self.balance, -quantity)
                .ok_or_else(|| format!("insufficient stock: {} available", self.balance))?;
            if let Some(severity) =
                evaluate_reorder_alert(self.balance, new_balance, self.reorder_level)
            {
                self.alerts.push(severity);
            }
            self.balance = new_balance;
            self.history.push(quantity);
            Ok(())
        }

        pub fn restock(&mut self, quantity: Decimal) {
            // Restocks never overdraw; alert check still runs (and stays
            // silent on the way up).
            let new_balance = apply_delta(self.balance, quantity).unwrap();
            if let Some(severity) =
                evaluate_reorder_alert(self.balance, new_balance, self.reorder_level)
            {
                self.alerts.push(severity);
            }
            self.balance = new_balance;
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::helpers::ItemLedger;
    use super::*;

    #[test]
    fn test_usage_decrements_and_appends_history() {
        let mut ledger = ItemLedger::new(dec("50"), dec("10"));
        ledger.record_usage(dec("12.5"), "greenhouse beds").unwrap();
        assert_eq!(ledger.balance, dec("37.5"));
        assert_eq!(ledger.history, vec![dec("12.5")]);
        assert!(ledger.alerts.is_empty());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut ledger = ItemLedger::new(dec("50"), dec("10"));
        assert!(ledger.record_usage(Decimal::ZERO, "weeding").is_err());
        assert_eq!(ledger.balance, dec("50"));
        assert!(ledger.history.is_empty());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut ledger = ItemLedger::new(dec("50"), dec("10"));
        assert!(ledger.record_usage(dec("-5"), "weeding").is_err());
        assert_eq!(ledger.balance, dec("50"));
    }

    #[test]
    fn test_blank_purpose_rejected() {
        let mut ledger = ItemLedger::new(dec("50"), dec("10"));
        assert!(ledger.record_usage(dec("5"), "   ").is_err());
        assert_eq!(ledger.balance, dec("50"));
        assert!(ledger.history.is_empty());
    }

    #[test]
    fn test_overdraw_refused_all_or_nothing() {
        let mut ledger = ItemLedger::new(dec("10"), dec("2"));
        let err = ledger.record_usage(dec("10.01"), "spraying").unwrap_err();
        assert!(err.contains("insufficient stock"));
        // Nothing moved: no balance change, no history row, no alert.
        assert_eq!(ledger.balance, dec("10"));
        assert!(ledger.history.is_empty());
        assert!(ledger.alerts.is_empty());
    }

    #[test]
    fn test_draining_to_zero_is_allowed() {
        let mut ledger = ItemLedger::new(dec("10"), dec("0"));
        ledger.record_usage(dec("10"), "final application").unwrap();
        assert_eq!(ledger.balance, Decimal::ZERO);
        assert_eq!(ledger.alerts, vec![AlertSeverity::OutOfStock]);
    }

    /// End-to-end scenario: a fertilizer item with 100 on hand and a
    /// reorder level of 20 goes through use, a refused overdraw, and a
    /// fulfilled 200-unit request.
    #[test]
    fn test_fertilizer_lifecycle() {
        let mut ledger = ItemLedger::new(dec("100"), dec("20"));

        // Use 85: balance crosses the reorder level, one low_stock alert.
        ledger.record_usage(dec("85"), "north field basal dressing").unwrap();
        assert_eq!(ledger.balance, dec("15"));
        assert_eq!(ledger.alerts, vec![AlertSeverity::LowStock]);

        // Use 20: only 15 left, refused with no side effects.
        assert!(ledger.record_usage(dec("20"), "south field").is_err());
        assert_eq!(ledger.balance, dec("15"));
        assert_eq!(ledger.alerts.len(), 1);

        // A 200-unit request is approved and fulfilled: restock lands.
        ledger.restock(dec("200"));
        assert_eq!(ledger.balance, dec("215"));
        // No new alerts on the way back up.
        assert_eq!(ledger.alerts.len(), 1);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::helpers::ItemLedger;
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10_000).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The balance always equals the opening balance minus accepted
        /// usages, and every accepted usage left a history row.
        #[test]
        fn prop_history_accounts_for_balance(
            opening in (0i64..=100_000).prop_map(|n| Decimal::new(n, 2)),
            usages in prop::collection::vec(quantity_strategy(), 0..30)
        ) {
            let mut ledger = ItemLedger::new(opening, dec("10"));
            for quantity in usages {
                let _ = ledger.record_usage(quantity, "field work");
            }
            let used: Decimal = ledger.history.iter().copied().sum();
            prop_assert_eq!(ledger.balance, opening - used);
            prop_assert!(ledger.balance >= Decimal::ZERO);
        }

        /// A refused usage is invisible: balance, history, and alerts all
        /// read the same before and after.
        #[test]
        fn prop_refused_usage_has_no_side_effects(
            opening in (0i64..=1_000).prop_map(Decimal::from),
            excess in (1i64..=1_000).prop_map(Decimal::from)
        ) {
            let mut ledger = ItemLedger::new(opening, dec("10"));
            let before_alerts = ledger.alerts.len();
            let result = ledger.record_usage(opening + excess, "field work");
            prop_assert!(result.is_err());
            prop_assert_eq!(ledger.balance, opening);
            prop_assert!(ledger.history.is_empty());
            prop_assert_eq!(ledger.alerts.len(), before_alerts);
        }

        /// Interleaved restocks never push the ledger negative and never
        /// fire alerts themselves.
        #[test]
        fn prop_restocks_never_alert(
            opening in (21i64..=1_000).prop_map(Decimal::from),
            restocks in prop::collection::vec((1i64..=500).prop_map(Decimal::from), 1..10)
        ) {
            let mut ledger = ItemLedger::new(opening, dec("20"));
            for quantity in restocks {
                ledger.restock(quantity);
            }
            prop_assert!(ledger.balance >= opening);
            prop_assert!(ledger.alerts.is_empty());
        }
    }
}
