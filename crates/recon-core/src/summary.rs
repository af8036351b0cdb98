use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::category::{categorise, Category};
use crate::model::{Transaction, TransactionType};
use crate::period::MonthRange;

/// Totals of a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub by_type: BTreeMap<TransactionType, Decimal>,
    pub by_category: BTreeMap<Category, Decimal>,
    /// Card payments with no matching category keyword.
    pub uncategorised: Decimal,
}

impl Summary {
    pub fn of(transactions: &[Transaction]) -> Self {
        let mut summary = Summary {
            count: transactions.len(),
            ..Default::default()
        };
        for t in transactions {
            *summary.by_type.entry(t.kind).or_default() += t.amount;
            match categorise(t) {
                Some(category) => *summary.by_category.entry(category).or_default() += t.amount,
                None => summary.uncategorised += t.amount,
            }
        }
        summary
    }

    pub fn total(&self, kind: TransactionType) -> Decimal {
        self.by_type.get(&kind).copied().unwrap_or_default()
    }

    /// Credits, transfers in, interest and salary.
    pub fn income(&self) -> Decimal {
        [
            TransactionType::Credit,
            TransactionType::TransferIn,
            TransactionType::Interest,
            TransactionType::Salary,
        ]
        .iter()
        .map(|k| self.total(*k))
        .sum()
    }

    /// Card payments, transfers out and investments.
    pub fn outgoings(&self) -> Decimal {
        [
            TransactionType::CardPayment,
            TransactionType::TransferOut,
            TransactionType::Investment,
        ]
        .iter()
        .map(|k| self.total(*k))
        .sum()
    }

    /// Net change of the combined bank balance.
    pub fn net_change(&self) -> Decimal {
        self.income() - self.outgoings()
    }

    /// Transfers in minus transfers out.
    pub fn transfer_difference(&self) -> Decimal {
        self.total(TransactionType::TransferIn) - self.total(TransactionType::TransferOut)
    }
}

/// Transactions from several ledgers that fall inside `month`, sorted by date.
///
/// Only ledgers whose own range overlaps the month are consulted.
pub fn collate<'a>(
    ledgers: impl IntoIterator<Item = (&'a MonthRange, &'a [Transaction])>,
    month: &MonthRange,
) -> Vec<Transaction> {
    let mut out: Vec<Transaction> = ledgers
        .into_iter()
        .filter(|(range, _)| range.overlaps(month))
        .flat_map(|(_, transactions)| transactions.iter())
        .filter(|t| month.contains(t.date))
        .cloned()
        .collect();
    out.sort_by_key(|t| t.date);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(y: i32, m: u32, d: u32, description: &str, amount: Decimal, kind: TransactionType) -> Transaction {
        Transaction::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), description, amount, kind)
    }

    #[test]
    fn test_summary_totals() {
        let txs = vec![
            tx(2024, 11, 1, "SALARY", dec!(1000), TransactionType::Salary),
            tx(2024, 11, 2, "WOOLWORTHS", dec!(80), TransactionType::CardPayment),
            tx(2024, 11, 3, "BOOKSHOP", dec!(20), TransactionType::CardPayment),
            tx(2024, 11, 4, "To saver", dec!(300), TransactionType::TransferOut),
            tx(2024, 11, 5, "Interest", dec!(1.25), TransactionType::Interest),
        ];
        let s = Summary::of(&txs);
        assert_eq!(s.count, 5);
        assert_eq!(s.total(TransactionType::CardPayment), dec!(100));
        assert_eq!(s.income(), dec!(1001.25));
        assert_eq!(s.outgoings(), dec!(400));
        assert_eq!(s.net_change(), dec!(601.25));
        assert_eq!(s.transfer_difference(), dec!(-300));
        assert_eq!(s.by_category[&Category::Groceries], dec!(80));
        assert_eq!(s.uncategorised, dec!(20));
    }

    #[test]
    fn test_collate_filters_and_sorts() {
        let boq = vec![
            tx(2024, 11, 20, "B", dec!(1), TransactionType::Credit),
            tx(2024, 12, 1, "outside", dec!(1), TransactionType::Credit),
        ];
        let ing = vec![tx(2024, 11, 3, "A", dec!(1), TransactionType::Credit)];
        let old = vec![tx(2024, 11, 9, "never read", dec!(1), TransactionType::Credit)];

        let boq_range = MonthRange::from_months(2024, 11, 2024, 12).unwrap();
        let ing_range = MonthRange::single(2024, 11).unwrap();
        let old_range = MonthRange::single(2024, 9).unwrap();
        let november = MonthRange::single(2024, 11).unwrap();

        let out = collate(
            [
                (&boq_range, boq.as_slice()),
                (&ing_range, ing.as_slice()),
                (&old_range, old.as_slice()),
            ],
            &november,
        );
        let names: Vec<&str> = out.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
