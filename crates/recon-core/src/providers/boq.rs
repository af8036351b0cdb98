use regex::Regex;
use std::sync::LazyLock;

use crate::classify::{Fallback, Outcome, Rule};
use crate::error::ReconError;
use crate::extraction::PageContent;
use crate::model::{Provider, TransactionType};
use crate::parsing::assemble::{DateToken, LineKind, RawRecord};
use crate::parsing::columns::columns;
use crate::parsing::header::{day_month_year_period, money_after};
use crate::parsing::segment::{Anchors, EndAnchor, Layout, RegionLine};
use crate::parsing::values::{looks_like_money, parse_money};
use crate::period::MonthRange;
use crate::providers::{first_page, missing_amount, StatementAdapter};
use crate::validate::{ControlTotals, Partition};

static DASH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})-([A-Z][a-z]{2})$").expect("valid date regex"));

const LAYOUT: Layout = Layout {
    page_keywords: &["Date", "Processed", "Description", "Debits"],
    anchors: Anchors {
        start: &["Date", "Description", "Balance ($)"],
        end: &[
            EndAnchor::line("Bank of Queensland Limited ABN"),
            EndAnchor::line("Continued overleaf"),
            EndAnchor::line("Page"),
        ],
        to_page_end: false,
    },
    carry_markers: &["Opening balance", "OPENING BALANCE"],
};

/// Bank of Queensland everyday and savings accounts.
///
/// Rows read `DD-Mon  [processed]  description  amount  [balance]`, with
/// debits printed negative. `NA` columns are blanks.
pub struct Boq;

impl StatementAdapter for Boq {
    fn provider(&self) -> Provider {
        Provider::Boq
    }

    fn month_range(&self, pages: &[PageContent]) -> Result<MonthRange, ReconError> {
        day_month_year_period(&first_page(pages)?.text, "Statement period")
    }

    fn control_totals(&self, pages: &[PageContent]) -> Result<ControlTotals, ReconError> {
        let text = &first_page(pages)?.text;
        Ok(ControlTotals {
            opening: Some(money_after(text, "Opening balance")?),
            total_credits: Some(money_after(text, "Total credits")?),
            total_debits: Some(money_after(text, "Total debits")?),
            closing: Some(money_after(text, "Closing balance")?),
            ..Default::default()
        })
    }

    fn layout(&self) -> &Layout {
        &LAYOUT
    }

    fn read_line(&self, line: &RegionLine<'_>) -> Result<LineKind, ReconError> {
        let cols: Vec<&str> = columns(line.text)
            .into_iter()
            .map(|c| c.text)
            .filter(|t| *t != "NA" && *t != "N/A")
            .collect();

        let Some(caps) = cols.first().and_then(|first| DASH_DATE.captures(first)) else {
            return Ok(LineKind::Continuation(line.text.trim().to_string()));
        };
        let date = DateToken::DayMonth {
            day: caps[1]
                .parse()
                .map_err(|_| ReconError::date(&caps[0], "bad day"))?,
            month: caps[2].to_string(),
        };

        let mut rest = &cols[1..];
        if rest.first().is_some_and(|c| DASH_DATE.is_match(c)) {
            rest = &rest[1..];
        }

        let trailing = rest
            .iter()
            .rev()
            .take(2)
            .take_while(|c| looks_like_money(c))
            .count();
        let amount = match trailing {
            0 => return Err(missing_amount(line)),
            1 => rest[rest.len() - 1],
            _ => rest[rest.len() - 2],
        };

        Ok(LineKind::Start(RawRecord::new(
            Some(date),
            rest[..rest.len() - trailing].join(" "),
            parse_money(amount)?,
        )))
    }

    fn rules(&self) -> Vec<Rule> {
        vec![Rule::contains("Interest", Outcome::Always(TransactionType::Interest))]
    }

    fn fallback(&self) -> Fallback {
        Fallback::SPENDING
    }

    fn partition(&self) -> Partition {
        Partition::STANDARD
    }
}
