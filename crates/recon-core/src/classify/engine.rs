use rust_decimal::Decimal;

use crate::classify::{Fallback, Matcher, Rule};
use crate::model::TransactionType;
use crate::parsing::dates::month_references;
use crate::period::MonthRange;

/// Assigns a transaction type to a signed amount and its description.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
    fallback: Fallback,
    /// `MMMYY` codes of the statement months, upper-case.
    references: Vec<String>,
}

impl Classifier {
    pub fn new(rules: Vec<Rule>, fallback: Fallback, range: &MonthRange) -> Self {
        Classifier {
            rules,
            fallback,
            references: month_references(range),
        }
    }

    /// Returns the magnitude of `amount` and the type of the first matching
    /// rule, or the sign fallback when none match. Never fails.
    pub fn classify(&self, amount: Decimal, description: &str) -> (Decimal, TransactionType) {
        let is_debit = amount.is_sign_negative() && !amount.is_zero();
        let outcome = self
            .rules
            .iter()
            .find(|rule| self.matches(&rule.matcher, description))
            .map(|rule| rule.outcome)
            .unwrap_or_else(|| self.fallback.outcome());
        (amount.abs(), outcome.resolve(is_debit))
    }

    fn matches(&self, matcher: &Matcher, description: &str) -> bool {
        match matcher {
            Matcher::Contains(keyword) => description.contains(keyword.as_str()),
            Matcher::ContainsIgnoreCase(keyword) => description
                .to_ascii_lowercase()
                .contains(&keyword.to_ascii_lowercase()),
            Matcher::Equals(text) => description.trim() == text,
            Matcher::FirstWord(word) => description.split_whitespace().next() == Some(word.as_str()),
            Matcher::DatedReference => description
                .split_whitespace()
                .next()
                .is_some_and(|first| self.is_dated_reference(first)),
        }
    }

    fn is_dated_reference(&self, word: &str) -> bool {
        is_dated_reference_shape(word)
            && self
                .references
                .iter()
                .any(|r| word[2..].eq_ignore_ascii_case(r))
    }
}

/// `DDMMMYY`: two digits, three letters, two digits.
pub fn is_dated_reference_shape(word: &str) -> bool {
    let bytes = word.as_bytes();
    bytes.len() == 7
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[2..5].iter().all(u8::is_ascii_alphabetic)
        && bytes[5..].iter().all(u8::is_ascii_digit)
}
