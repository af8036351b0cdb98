use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ReconError;
use crate::model::{Transaction, TransactionType};

/// Figures a statement declares about itself. Any subset may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlTotals {
    pub opening: Option<Decimal>,
    pub closing: Option<Decimal>,
    pub total_debits: Option<Decimal>,
    pub total_credits: Option<Decimal>,
    pub debit_count: Option<usize>,
    pub credit_count: Option<usize>,
}

impl ControlTotals {
    pub fn is_empty(&self) -> bool {
        *self == ControlTotals::default()
    }
}

/// Which side of the ledger each transaction type counts toward.
///
/// Types listed in neither `debit` nor `excluded` count as credits.
/// `excluded` types are left out of both declared totals but still move the
/// balance (e.g. interest a provider reports on its own line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub debit: &'static [TransactionType],
    pub excluded: &'static [TransactionType],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Debit,
    Credit,
    Excluded,
}

impl Partition {
    pub const STANDARD: Partition = Partition {
        debit: &[
            TransactionType::CardPayment,
            TransactionType::TransferOut,
            TransactionType::Investment,
        ],
        excluded: &[],
    };

    pub fn side(&self, kind: TransactionType) -> Side {
        if self.excluded.contains(&kind) {
            Side::Excluded
        } else if self.debit.contains(&kind) {
            Side::Debit
        } else {
            Side::Credit
        }
    }
}

/// Sums and counts of a transaction set, split by partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub debits: Decimal,
    pub credits: Decimal,
    pub excluded: Decimal,
    pub debit_count: usize,
    pub credit_count: usize,
}

impl Aggregates {
    /// Net balance movement: credits and excluded inflows minus debits.
    pub fn movement(&self) -> Decimal {
        self.credits + self.excluded - self.debits
    }
}

pub fn aggregate(transactions: &[Transaction], partition: &Partition) -> Aggregates {
    transactions
        .iter()
        .fold(Aggregates::default(), |mut acc, t| {
            match partition.side(t.kind) {
                Side::Debit => {
                    acc.debits += t.amount;
                    acc.debit_count += 1;
                }
                Side::Credit => {
                    acc.credits += t.amount;
                    acc.credit_count += 1;
                }
                Side::Excluded => acc.excluded += t.amount,
            }
            acc
        })
}

/// A control-total comparison that passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub name: String,
    pub computed: Decimal,
    pub declared: Decimal,
}

fn tolerance() -> Decimal {
    Decimal::new(1, 2)
}

fn compare(name: &str, computed: Decimal, declared: Decimal) -> Result<Check, ReconError> {
    let difference = computed - declared;
    if difference.abs() >= tolerance() {
        return Err(ReconError::Reconciliation {
            check: name.to_string(),
            computed,
            declared,
            difference,
        });
    }
    debug!(check = name, %computed, %declared, "check passed");
    Ok(Check {
        name: name.to_string(),
        computed,
        declared,
    })
}

fn compare_count(name: &str, computed: usize, declared: usize) -> Result<Check, ReconError> {
    let (computed, declared) = (Decimal::from(computed), Decimal::from(declared));
    if computed != declared {
        return Err(ReconError::Reconciliation {
            check: name.to_string(),
            computed,
            declared,
            difference: computed - declared,
        });
    }
    Ok(Check {
        name: name.to_string(),
        computed,
        declared,
    })
}

/// Compare declared control totals against the transactions.
///
/// Runs, in order, every check whose declared figures are present:
/// statement consistency (`closing - opening` against the declared credits
/// and debits), total debits, total credits, debit and credit counts, and the
/// balance movement. The first mismatch fails the statement.
pub fn validate(
    totals: &ControlTotals,
    transactions: &[Transaction],
    partition: &Partition,
) -> Result<Vec<Check>, ReconError> {
    if totals.is_empty() {
        warn!(
            transactions = transactions.len(),
            "statement declares no control totals; persisting unvalidated"
        );
        return Ok(Vec::new());
    }

    let agg = aggregate(transactions, partition);
    let mut checks = Vec::new();

    if let (Some(opening), Some(closing), Some(debits), Some(credits)) = (
        totals.opening,
        totals.closing,
        totals.total_debits,
        totals.total_credits,
    ) {
        checks.push(compare(
            "statement consistency",
            credits - debits + agg.excluded,
            closing - opening,
        )?);
    }
    if let Some(declared) = totals.total_debits {
        checks.push(compare("total debits", agg.debits, declared)?);
    }
    if let Some(declared) = totals.total_credits {
        checks.push(compare("total credits", agg.credits, declared)?);
    }
    if let Some(declared) = totals.debit_count {
        checks.push(compare_count("debit count", agg.debit_count, declared)?);
    }
    if let Some(declared) = totals.credit_count {
        checks.push(compare_count("credit count", agg.credit_count, declared)?);
    }
    if let (Some(opening), Some(closing)) = (totals.opening, totals.closing) {
        checks.push(compare("balance movement", opening + agg.movement(), closing)?);
    }

    Ok(checks)
}
