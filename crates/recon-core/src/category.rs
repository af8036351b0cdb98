use serde::Serialize;
use std::fmt;

use crate::model::{Transaction, TransactionType};

/// Spending and income buckets used by summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Interest,
    Cashback,
    Salary,
    Transport,
    Utilities,
    Groceries,
    Entertainment,
    TransfersIn,
    TransfersOut,
    Investments,
}

/// Broad grouping of categories, used to colour output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Income,
    Expense,
    Transfer,
}

impl Category {
    pub fn flow(&self) -> Flow {
        match self {
            Category::Interest | Category::Cashback | Category::Salary => Flow::Income,
            Category::Transport | Category::Utilities | Category::Groceries | Category::Entertainment => {
                Flow::Expense
            }
            Category::TransfersIn | Category::TransfersOut | Category::Investments => Flow::Transfer,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Interest => "Interest",
            Category::Cashback => "Cashback",
            Category::Salary => "Salary",
            Category::Transport => "Transport",
            Category::Utilities => "Utilities",
            Category::Groceries => "Groceries",
            Category::Entertainment => "Entertainment",
            Category::TransfersIn => "Transfers In",
            Category::TransfersOut => "Transfers Out",
            Category::Investments => "Investments",
        };
        f.write_str(name)
    }
}

// Checked in order against the lower-cased description.
const KEYWORDS: &[(&str, Category)] = &[
    ("myki", Category::Transport),
    ("art mem vol", Category::Investments),
    ("agl", Category::Utilities),
    ("*amaysimmobi", Category::Utilities),
    ("coles", Category::Groceries),
    ("woolworths", Category::Groceries),
    ("aldi", Category::Groceries),
    ("metro petroleum", Category::Transport),
];

fn from_type(kind: TransactionType) -> Option<Category> {
    match kind {
        TransactionType::TransferIn => Some(Category::TransfersIn),
        TransactionType::TransferOut => Some(Category::TransfersOut),
        TransactionType::Interest => Some(Category::Interest),
        TransactionType::Credit => Some(Category::Cashback),
        TransactionType::Salary => Some(Category::Salary),
        TransactionType::Investment => Some(Category::Investments),
        TransactionType::CardPayment => None,
    }
}

fn from_description(description: &str) -> Option<Category> {
    let lowered = description.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, category)| *category)
}

/// Category of a transaction: by type first, then by description keywords.
pub fn categorise(transaction: &Transaction) -> Option<Category> {
    from_type(transaction.kind).or_else(|| from_description(&transaction.description))
}
