use regex::Regex;
use std::sync::LazyLock;

use crate::classify::engine::is_dated_reference_shape;
use crate::classify::{Fallback, Matcher, Outcome, Rule};
use crate::error::ReconError;
use crate::extraction::PageContent;
use crate::model::{Provider, TransactionType};
use crate::parsing::assemble::{DateToken, LineKind, RawRecord};
use crate::parsing::columns::columns;
use crate::parsing::header::{day_month_year_period, money_columns};
use crate::parsing::scan::{find, line_at, line_end};
use crate::parsing::segment::{Anchors, EndAnchor, Layout, RegionLine};
use crate::parsing::values::{parse_balance, parse_count};
use crate::period::MonthRange;
use crate::providers::{missing_amount, page_with, AmountColumns, StatementAdapter};
use crate::validate::{ControlTotals, Partition};

static DAY_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}) ([A-Z][a-z]{2})$").expect("valid date regex"));

const OPENING: &str = "BALANCE BROUGHT FORWARD";
const CLOSING: &str = "CLOSING BALANCE";

const LAYOUT: Layout = Layout {
    page_keywords: &["Details", "Debits", "Credits"],
    anchors: Anchors {
        start: &["Date", "Details", "Debits", "Credits", "Balance"],
        end: &[
            EndAnchor::line(CLOSING),
            EndAnchor::line("Transaction Number"),
            EndAnchor::line("Important Information"),
        ],
        to_page_end: false,
    },
    carry_markers: &[OPENING, "BALANCE CARRIED FORWARD"],
};

const AMOUNTS: AmountColumns = AmountColumns {
    debit: "Debits",
    credit: "Credits",
    balance: "Balance",
};

/// HSBC everyday accounts.
///
/// Only the first row of each day prints the date; later rows take it from
/// the row above. A record starts at every line with a debit or credit.
pub struct Hsbc;

impl StatementAdapter for Hsbc {
    fn provider(&self) -> Provider {
        Provider::Hsbc
    }

    fn month_range(&self, pages: &[PageContent]) -> Result<MonthRange, ReconError> {
        day_month_year_period(&page_with(pages, &["STATEMENT PERIOD"])?.text, "STATEMENT PERIOD")
    }

    /// Opening balance from the brought-forward line; closing balance, debit
    /// and credit totals, and debit and credit counts from the three lines
    /// starting at the closing balance.
    fn control_totals(&self, pages: &[PageContent]) -> Result<ControlTotals, ReconError> {
        let opening_page = page_with(pages, &[OPENING])?;
        let opening = last_amount(&opening_page.text, OPENING)?;

        let text = &page_with(pages, &[CLOSING])?.text;
        let closing = last_amount(text, CLOSING)?;

        let position = find(text, CLOSING, 0).unwrap_or(0);
        let mut following = text[line_end(text, position)..]
            .lines()
            .filter(|l| !l.trim().is_empty());

        let totals_line = following
            .next()
            .ok_or_else(|| ReconError::field("total debits", "missing after closing balance"))?;
        let amounts = money_columns(totals_line);
        let [.., debits, credits] = amounts.as_slice() else {
            return Err(ReconError::field(
                "total debits",
                format!("expected debit and credit totals on '{}'", totals_line.trim()),
            ));
        };
        let (debits, credits) = (parse_balance(debits)?.abs(), parse_balance(credits)?.abs());

        let counts_line = following
            .next()
            .ok_or_else(|| ReconError::field("debit count", "missing after totals"))?;
        let counts: Vec<&str> = columns(counts_line)
            .into_iter()
            .map(|c| c.text)
            .filter(|t| t.chars().all(|c| c.is_ascii_digit() || c == ','))
            .collect();
        let [.., debit_count, credit_count] = counts.as_slice() else {
            return Err(ReconError::field(
                "debit count",
                format!("expected two counts on '{}'", counts_line.trim()),
            ));
        };

        Ok(ControlTotals {
            opening: Some(opening),
            closing: Some(closing),
            total_debits: Some(debits),
            total_credits: Some(credits),
            debit_count: Some(parse_count(debit_count)?),
            credit_count: Some(parse_count(credit_count)?),
        })
    }

    fn layout(&self) -> &Layout {
        &LAYOUT
    }

    fn read_line(&self, line: &RegionLine<'_>) -> Result<LineKind, ReconError> {
        let first = columns(line.text).first().map(|c| c.text);
        let date = match first.and_then(|f| DAY_MONTH.captures(f)) {
            Some(caps) => Some(DateToken::DayMonth {
                day: caps[1]
                    .parse()
                    .map_err(|_| ReconError::date(&caps[0], "bad day"))?,
                month: caps[2].to_string(),
            }),
            None => None,
        };

        let row = AMOUNTS.read(line, usize::from(date.is_some()))?;
        match (row.amount, date) {
            (Some(amount), date) => Ok(LineKind::Start(RawRecord::new(date, row.description, amount))),
            (None, Some(_)) => Err(missing_amount(line)),
            (None, None) => Ok(LineKind::Continuation(line.text.trim().to_string())),
        }
    }

    fn rules(&self) -> Vec<Rule> {
        vec![
            Rule::new(
                Matcher::FirstWord("EFTPOS".into()),
                Outcome::Always(TransactionType::CardPayment),
            ),
            Rule::new(Matcher::DatedReference, Outcome::Always(TransactionType::Credit)),
        ]
    }

    fn fallback(&self) -> Fallback {
        Fallback::TRANSFERS
    }

    fn partition(&self) -> Partition {
        Partition::STANDARD
    }

    /// Drop the `EFTPOS` / `DDMMMYY` lead word, a `VISA AUD` prefix and a
    /// trailing `AU` country code.
    fn tidy_description(&self, description: &str) -> String {
        let mut words: Vec<&str> = description.split_whitespace().collect();
        if words
            .first()
            .is_some_and(|w| *w == "EFTPOS" || is_dated_reference_shape(w))
        {
            words.remove(0);
            if words.starts_with(&["VISA", "AUD"]) {
                words.drain(..2);
            }
            if words.last() == Some(&"AU") {
                words.pop();
            }
        }
        words.join(" ")
    }
}

/// The last money column on the line holding `label`.
fn last_amount(text: &str, label: &str) -> Result<rust_decimal::Decimal, ReconError> {
    let position = find(text, label, 0)
        .ok_or_else(|| ReconError::structure(label, "statement summary line not found"))?;
    let line = line_at(text, position);
    let values = money_columns(line);
    let value = values
        .last()
        .ok_or_else(|| ReconError::field(label, format!("no amount on '{}'", line.trim())))?;
    parse_balance(value)
}
