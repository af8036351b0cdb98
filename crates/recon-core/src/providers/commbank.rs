use regex::Regex;
use std::sync::LazyLock;

use crate::classify::{Fallback, Outcome, Rule};
use crate::error::ReconError;
use crate::extraction::PageContent;
use crate::model::Provider;
use crate::parsing::assemble::{DateToken, LineKind, RawRecord};
use crate::parsing::columns::columns;
use crate::parsing::header::{day_month_year_period, money_row_after};
use crate::parsing::segment::{Anchors, EndAnchor, Layout, RegionLine};
use crate::parsing::values::parse_balance;
use crate::period::MonthRange;
use crate::providers::{first_page, missing_amount, page_with, AmountColumns, StatementAdapter};
use crate::validate::{ControlTotals, Partition};

static DAY_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}) ([A-Z][a-z]{2})$").expect("valid date regex"));

const LAYOUT: Layout = Layout {
    page_keywords: &["Date", "Transaction", "Debit", "Credit", "Balance"],
    anchors: Anchors {
        start: &["Date", "Transaction", "Debit", "Credit", "Balance"],
        end: &[
            EndAnchor::line("CLOSING BALANCE"),
            EndAnchor::line("Continued on next page"),
        ],
        to_page_end: true,
    },
    carry_markers: &["OPENING BALANCE"],
};

const AMOUNTS: AmountColumns = AmountColumns {
    debit: "Debit",
    credit: "Credit",
    balance: "Balance",
};

const SUMMARY_LABELS: [&str; 4] = [
    "Opening balance",
    "Total debits",
    "Total credits",
    "Closing balance",
];

/// Commonwealth Bank transaction accounts.
///
/// Rows read `DD Mon  description  debit | credit  balance`; the sign comes
/// from the column the amount sits under.
pub struct Commbank;

impl StatementAdapter for Commbank {
    fn provider(&self) -> Provider {
        Provider::Commbank
    }

    fn month_range(&self, pages: &[PageContent]) -> Result<MonthRange, ReconError> {
        day_month_year_period(&first_page(pages)?.text, "Period")
    }

    /// Opening balance, total debits, total credits and closing balance, in
    /// that order, on the line under the summary headings.
    fn control_totals(&self, pages: &[PageContent]) -> Result<ControlTotals, ReconError> {
        let summary = page_with(pages, &SUMMARY_LABELS)?;
        let values = money_row_after(&summary.text, "Closing balance")?;
        let [opening, debits, credits, closing] = values.as_slice() else {
            return Err(ReconError::field(
                "account summary",
                format!("expected 4 amounts, found {}", values.len()),
            ));
        };
        Ok(ControlTotals {
            opening: Some(parse_balance(opening)?),
            total_debits: Some(parse_balance(debits)?.abs()),
            total_credits: Some(parse_balance(credits)?.abs()),
            closing: Some(parse_balance(closing)?),
            ..Default::default()
        })
    }

    fn layout(&self) -> &Layout {
        &LAYOUT
    }

    fn read_line(&self, line: &RegionLine<'_>) -> Result<LineKind, ReconError> {
        let first = columns(line.text).first().map(|c| c.text);
        let Some(caps) = first.and_then(|f| DAY_MONTH.captures(f)) else {
            return Ok(LineKind::Continuation(line.text.trim().to_string()));
        };
        let date = DateToken::DayMonth {
            day: caps[1]
                .parse()
                .map_err(|_| ReconError::date(&caps[0], "bad day"))?,
            month: caps[2].to_string(),
        };

        let row = AMOUNTS.read(line, 1)?;
        let amount = row.amount.ok_or_else(|| missing_amount(line))?;
        Ok(LineKind::Start(RawRecord::new(Some(date), row.description, amount)))
    }

    fn rules(&self) -> Vec<Rule> {
        vec![Rule::contains("Transfer", Outcome::TRANSFER)]
    }

    fn fallback(&self) -> Fallback {
        Fallback::SPENDING
    }

    /// Credit, Transfer In, Salary and Interest are credits; the rest debits.
    fn partition(&self) -> Partition {
        Partition::STANDARD
    }
}
