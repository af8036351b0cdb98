use regex::Regex;
use std::sync::LazyLock;

use crate::classify::{Fallback, Outcome, Rule};
use crate::error::ReconError;
use crate::extraction::PageContent;
use crate::model::{Provider, TransactionType};
use crate::parsing::assemble::{DateToken, LineKind, RawRecord};
use crate::parsing::columns::columns;
use crate::parsing::header::{money_row_after, slash_period};
use crate::parsing::segment::{Anchors, EndAnchor, Layout, RegionLine};
use crate::parsing::values::parse_money;
use crate::period::MonthRange;
use crate::providers::{first_page, missing_amount, AmountColumns, StatementAdapter};
use crate::validate::{ControlTotals, Partition};

static SLASH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid date regex"));

const LAYOUT: Layout = Layout {
    page_keywords: &["Money out $", "Money in $"],
    anchors: Anchors {
        start: &["Date", "Money out $", "Money in $", "Balance $"],
        end: &[
            EndAnchor::line("Total Cashback Financial Year to Date:"),
            EndAnchor::line("Interest rate at end of statement period:"),
            EndAnchor::line("Statement continued over"),
        ],
        to_page_end: false,
    },
    carry_markers: &[],
};

const AMOUNTS: AmountColumns = AmountColumns {
    debit: "Money out $",
    credit: "Money in $",
    balance: "Balance $",
};

/// ING Orange Everyday accounts.
///
/// Rows read `DD/MM/YYYY  description  money out | money in  balance`.
/// Interest is reported apart from the money in/out totals.
pub struct Ing;

impl StatementAdapter for Ing {
    fn provider(&self) -> Provider {
        Provider::Ing
    }

    fn month_range(&self, pages: &[PageContent]) -> Result<MonthRange, ReconError> {
        slash_period(&first_page(pages)?.text, "Statement from:")
    }

    /// Opening balance, money in, money out and closing balance, in that
    /// order, on the first line under the summary headings of page one.
    fn control_totals(&self, pages: &[PageContent]) -> Result<ControlTotals, ReconError> {
        let values = money_row_after(&first_page(pages)?.text, "Closing balance")?;
        let [opening, money_in, money_out, closing] = values.as_slice() else {
            return Err(ReconError::field(
                "account summary",
                format!("expected 4 amounts, found {}", values.len()),
            ));
        };
        Ok(ControlTotals {
            opening: Some(parse_money(opening)?),
            total_credits: Some(parse_money(money_in)?.abs()),
            total_debits: Some(parse_money(money_out)?.abs()),
            closing: Some(parse_money(closing)?),
            ..Default::default()
        })
    }

    fn layout(&self) -> &Layout {
        &LAYOUT
    }

    fn read_line(&self, line: &RegionLine<'_>) -> Result<LineKind, ReconError> {
        let first = columns(line.text).first().map(|c| c.text);
        let Some(caps) = first.and_then(|f| SLASH_DATE.captures(f)) else {
            return Ok(LineKind::Continuation(line.text.trim().to_string()));
        };
        let number = |i: usize| {
            caps[i]
                .parse::<u32>()
                .map_err(|_| ReconError::date(&caps[0], "bad date field"))
        };
        let date = DateToken::Numeric {
            day: number(1)?,
            month: number(2)?,
            year: number(3)? as i32,
        };

        let row = AMOUNTS.read(line, 1)?;
        let amount = row.amount.ok_or_else(|| missing_amount(line))?;
        Ok(LineKind::Start(RawRecord::new(Some(date), row.description, amount)))
    }

    fn rules(&self) -> Vec<Rule> {
        vec![
            Rule::contains("Interest", Outcome::Always(TransactionType::Interest)),
            Rule::contains("Osko Deposit", Outcome::TRANSFER),
            Rule::contains("Internal Transfer", Outcome::TRANSFER),
        ]
    }

    fn fallback(&self) -> Fallback {
        Fallback::SPENDING
    }

    fn partition(&self) -> Partition {
        Partition {
            debit: Partition::STANDARD.debit,
            excluded: &[TransactionType::Interest],
        }
    }
}
