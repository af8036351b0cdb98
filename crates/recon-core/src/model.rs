use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::period::MonthRange;
use crate::validate::Check;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "Card Payment")]
    CardPayment,
    Credit,
    #[serde(rename = "Transfer In")]
    TransferIn,
    #[serde(rename = "Transfer Out")]
    TransferOut,
    Interest,
    Investment,
    Salary,
}

impl TransactionType {
    pub const ALL: [TransactionType; 7] = [
        TransactionType::CardPayment,
        TransactionType::Credit,
        TransactionType::TransferIn,
        TransactionType::TransferOut,
        TransactionType::Interest,
        TransactionType::Investment,
        TransactionType::Salary,
    ];

    /// Display string used in CSV output.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::CardPayment => "Card Payment",
            TransactionType::Credit => "Credit",
            TransactionType::TransferIn => "Transfer In",
            TransactionType::TransferOut => "Transfer Out",
            TransactionType::Interest => "Interest",
            TransactionType::Investment => "Investment",
            TransactionType::Salary => "Salary",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown transaction type '{s}'"))
    }
}

/// Statement providers with a dedicated layout adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Boq,
    Coles,
    Commbank,
    Hsbc,
    Ing,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::Boq,
        Provider::Coles,
        Provider::Commbank,
        Provider::Hsbc,
        Provider::Ing,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Provider::Boq => "boq",
            Provider::Coles => "coles",
            Provider::Commbank => "commbank",
            Provider::Hsbc => "hsbc",
            Provider::Ing => "ing",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Boq => write!(f, "BOQ"),
            Provider::Coles => write!(f, "Coles"),
            Provider::Commbank => write!(f, "Commonwealth Bank"),
            Provider::Hsbc => write!(f, "HSBC"),
            Provider::Ing => write!(f, "ING"),
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Provider::ALL
            .into_iter()
            .find(|p| p.code() == lower)
            .ok_or_else(|| {
                let known: Vec<&str> = Provider::ALL.iter().map(|p| p.code()).collect();
                format!("unknown provider '{s}'. Available: {}", known.join(", "))
            })
    }
}

/// A single reconciled ledger entry.
///
/// `amount` is always a non-negative magnitude; direction is carried by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Amount")]
    pub amount: Decimal,
    #[serde(rename = "Type")]
    pub kind: TransactionType,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: &str, amount: Decimal, kind: TransactionType) -> Self {
        Transaction {
            date,
            description: clean_description(description),
            amount: amount.abs(),
            kind,
        }
    }
}

/// Collapse whitespace runs and drop commas so the text is safe in a CSV cell.
pub fn clean_description(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| word.replace(',', ""))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A fully reconciled statement document.
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub provider: Provider,
    pub month_range: MonthRange,
    pub transactions: Vec<Transaction>,
    /// Control-total comparisons that passed during validation.
    pub checks: Vec<Check>,
}
