//! Per-fund net balances derived from a user's transaction history.
//!
//! The summary is never persisted. It is rebuilt from the full list every
//! time a new list arrives, so there is no incremental state to drift.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::transaction::{Transaction, TransactionKind};

/// Fund name -> net amount (deposits minus cancellations).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSummary {
    by_fund: BTreeMap<String, Decimal>,
}

impl BalanceSummary {
    pub fn get(&self, fund: &str) -> Option<Decimal> {
        self.by_fund.get(fund).copied()
    }

    pub fn contains(&self, fund: &str) -> bool {
        self.by_fund.contains_key(fund)
    }

    /// Entries in fund-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.by_fund.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn fund_names(&self) -> Vec<&str> {
        self.by_fund.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.by_fund.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fund.is_empty()
    }

    /// Sum of every fund's net amount.
    pub fn total(&self) -> Decimal {
        self.by_fund.values().copied().sum()
    }
}

/// Build the balance summary for one user's transactions.
///
/// Every fund that appears gets a key (starting at zero); deposits add,
/// cancellations subtract, any other kind leaves the amount untouched.
pub fn aggregate(transactions: &[Transaction]) -> BalanceSummary {
    let mut by_fund: BTreeMap<String, Decimal> = BTreeMap::new();

    for tx in transactions {
        let entry = by_fund.entry(tx.fondo.clone()).or_insert(Decimal::ZERO);
        match &tx.kind {
            TransactionKind::Deposit => *entry += tx.monto,
            TransactionKind::Cancellation => *entry -= tx.monto,
            other => {
                debug!(fund = %tx.fondo, kind = %other, id = %tx.id, "ignoring transaction kind in balance");
            }
        }
    }

    BalanceSummary { by_fund }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tx(id: &str, fondo: &str, kind: TransactionKind, monto: i64) -> Transaction {
        Transaction::new(id, fondo, kind, Decimal::from(monto))
    }

    #[test]
    fn test_deposits_minus_cancellations() {
        let txns = vec![
            tx("1", "A", TransactionKind::Deposit, 100),
            tx("2", "A", TransactionKind::Cancellation, 30),
            tx("3", "B", TransactionKind::Deposit, 50),
        ];
        let summary = aggregate(&txns);
        assert_eq!(summary.get("A"), Some(Decimal::from(70)));
        assert_eq!(summary.get("B"), Some(Decimal::from(50)));
        assert_eq!(summary.len(), 2);
        assert_eq!(summary.total(), Decimal::from(120));
    }

    #[test]
    fn test_absent_fund_not_keyed() {
        let summary = aggregate(&[tx("1", "A", TransactionKind::Deposit, 10)]);
        assert!(!summary.contains("B"));
        assert_eq!(summary.get("B"), None);
    }

    #[test]
    fn test_empty_history_gives_empty_summary() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_other_kinds_keyed_at_zero() {
        let txns = vec![
            tx("1", "A", TransactionKind::Opening, 500),
            tx("2", "B", TransactionKind::Other("traslado".into()), 20),
        ];
        let summary = aggregate(&txns);
        assert_eq!(summary.get("A"), Some(Decimal::ZERO));
        assert_eq!(summary.get("B"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_miscased_kinds_do_not_count() {
        let txns = vec![
            tx("1", "A", TransactionKind::from("DEPOSITO"), 100),
            tx("2", "A", TransactionKind::from("Cancelacion"), 30),
            tx("3", "A", TransactionKind::from("deposito"), 5),
        ];
        let summary = aggregate(&txns);
        assert_eq!(summary.get("A"), Some(Decimal::from(5)));
    }

    #[test]
    fn test_withdrawal_can_go_negative() {
        let summary = aggregate(&[tx("1", "A", TransactionKind::Cancellation, 40)]);
        assert_eq!(summary.get("A"), Some(Decimal::from(-40)));
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let txns = vec![
            tx("1", "A", TransactionKind::Deposit, 100),
            tx("2", "A", TransactionKind::Cancellation, 30),
        ];
        assert_eq!(aggregate(&txns), aggregate(&txns));
    }

    fn arb_tx() -> impl Strategy<Value = Transaction> {
        (
            prop::sample::select(vec!["A", "B", "C"]),
            prop::sample::select(vec![
                TransactionKind::Deposit,
                TransactionKind::Cancellation,
                TransactionKind::Opening,
            ]),
            0i64..1_000_000,
            0u32..3,
        )
            .prop_map(|(fondo, kind, units, scale)| {
                Transaction::new("p", fondo, kind, Decimal::new(units, scale))
            })
    }

    proptest! {
        #[test]
        fn prop_order_does_not_change_summary(
            (txns, shuffled) in prop::collection::vec(arb_tx(), 0..40)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            prop_assert_eq!(aggregate(&txns), aggregate(&shuffled));
        }

        #[test]
        fn prop_fund_net_matches_definition(txns in prop::collection::vec(arb_tx(), 0..40)) {
            let summary = aggregate(&txns);
            for fund in ["A", "B", "C"] {
                let deposits: Decimal = txns.iter()
                    .filter(|t| t.fondo == fund && t.kind == TransactionKind::Deposit)
                    .map(|t| t.monto)
                    .sum();
                let cancellations: Decimal = txns.iter()
                    .filter(|t| t.fondo == fund && t.kind == TransactionKind::Cancellation)
                    .map(|t| t.monto)
                    .sum();
                let present = txns.iter().any(|t| t.fondo == fund);
                if present {
                    prop_assert_eq!(summary.get(fund), Some(deposits - cancellations));
                } else {
                    prop_assert_eq!(summary.get(fund), None);
                }
            }
        }
    }
}
