use crate::model::TransactionType;

/// The type a matching rule assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Always this type, whatever the sign.
    Always(TransactionType),
    /// Chosen by the sign of the raw amount (zero counts as a credit).
    BySign {
        debit: TransactionType,
        credit: TransactionType,
    },
}

impl Outcome {
    /// Money moved between the user's own accounts.
    pub const TRANSFER: Outcome = Outcome::BySign {
        debit: TransactionType::TransferOut,
        credit: TransactionType::TransferIn,
    };

    pub fn resolve(&self, is_debit: bool) -> TransactionType {
        match *self {
            Outcome::Always(kind) => kind,
            Outcome::BySign { debit, credit } => {
                if is_debit {
                    debit
                } else {
                    credit
                }
            }
        }
    }
}

/// Types used when no rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fallback {
    pub debit: TransactionType,
    pub credit: TransactionType,
}

impl Fallback {
    /// Everyday account: spending is a card payment, money in is a credit.
    pub const SPENDING: Fallback = Fallback {
        debit: TransactionType::CardPayment,
        credit: TransactionType::Credit,
    };

    /// Account whose unmatched movements are transfers.
    pub const TRANSFERS: Fallback = Fallback {
        debit: TransactionType::TransferOut,
        credit: TransactionType::TransferIn,
    };

    pub fn outcome(&self) -> Outcome {
        Outcome::BySign {
            debit: self.debit,
            credit: self.credit,
        }
    }
}
