use regex::Regex;
use std::sync::LazyLock;

use crate::classify::{Fallback, Matcher, Outcome, Rule};
use crate::error::ReconError;
use crate::extraction::PageContent;
use crate::model::{Provider, TransactionType};
use crate::parsing::assemble::{DateToken, LineKind, RawRecord};
use crate::parsing::columns::columns;
use crate::parsing::dates::month_number;
use crate::parsing::header::labelled_month;
use crate::parsing::segment::{Anchors, EndAnchor, Layout, RegionLine};
use crate::parsing::values::{looks_like_money, parse_money};
use crate::period::MonthRange;
use crate::providers::{missing_amount, page_with, StatementAdapter};
use crate::validate::{ControlTotals, Partition};

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][a-z]{2}) (\d{1,2})(?: (.+))?$").expect("valid date regex")
});

const LAYOUT: Layout = Layout {
    page_keywords: &["Transaction Details"],
    anchors: Anchors {
        start: &["Date", "Transaction Details", "Amount"],
        end: &[
            EndAnchor::line("Closing Balance"),
            EndAnchor::above("(Continued next page)", 1),
            EndAnchor::above("Important Information", 3),
        ],
        to_page_end: false,
    },
    carry_markers: &["Opening Balance"],
};

/// Coles Mastercard credit card statements.
///
/// Rows read `Mon DD  description  amount`. Charges are printed positive and
/// payments negative, so amounts are negated to the account's point of view.
/// The statement declares no control totals.
pub struct Coles;

impl StatementAdapter for Coles {
    fn provider(&self) -> Provider {
        Provider::Coles
    }

    fn month_range(&self, pages: &[PageContent]) -> Result<MonthRange, ReconError> {
        let text = &page_with(pages, &["Statement Begins", "Statement Ends"])?.text;
        let (start_year, start_month) = labelled_month(text, "Statement Begins")?;
        let (end_year, end_month) = labelled_month(text, "Statement Ends")?;
        MonthRange::from_months(start_year, start_month, end_year, end_month)
    }

    fn control_totals(&self, _pages: &[PageContent]) -> Result<ControlTotals, ReconError> {
        Ok(ControlTotals::default())
    }

    fn layout(&self) -> &Layout {
        &LAYOUT
    }

    fn read_line(&self, line: &RegionLine<'_>) -> Result<LineKind, ReconError> {
        let cols: Vec<&str> = columns(line.text).into_iter().map(|c| c.text).collect();

        let caps = match cols.first().and_then(|first| MONTH_DAY.captures(first)) {
            Some(caps) if month_number(&caps[1]).is_some() => caps,
            _ => return Ok(LineKind::Continuation(line.text.trim().to_string())),
        };
        let date = DateToken::DayMonth {
            day: caps[2]
                .parse()
                .map_err(|_| ReconError::date(&caps[0], "bad day"))?,
            month: caps[1].to_string(),
        };

        let last = match cols.as_slice() {
            [_, .., last] if looks_like_money(last) => *last,
            _ => return Err(missing_amount(line)),
        };

        let mut description: Vec<&str> = caps.get(3).map(|m| m.as_str()).into_iter().collect();
        description.extend(&cols[1..cols.len() - 1]);

        Ok(LineKind::Start(RawRecord::new(
            Some(date),
            description.join(" "),
            -parse_money(last)?,
        )))
    }

    fn rules(&self) -> Vec<Rule> {
        vec![Rule::new(
            Matcher::Equals("Bpay Payments".into()),
            Outcome::Always(TransactionType::TransferIn),
        )]
    }

    fn fallback(&self) -> Fallback {
        Fallback::SPENDING
    }

    fn partition(&self) -> Partition {
        Partition::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn read(text: &str) -> Result<LineKind, ReconError> {
        let line = RegionLine {
            text,
            header: "Date      Transaction Details        Amount",
            page_number: 2,
        };
        Coles.read_line(&line)
    }

    #[test]
    fn test_charge_becomes_negative() {
        let LineKind::Start(record) = read("Nov 05    WOOLWORTHS 1234 SYDNEY      82.15").unwrap() else {
            panic!("expected a record start");
        };
        assert_eq!(record.date, Some(DateToken::DayMonth { day: 5, month: "Nov".into() }));
        assert_eq!(record.description, "WOOLWORTHS 1234 SYDNEY");
        assert_eq!(record.amount, dec!(-82.15));
    }

    #[test]
    fn test_payment_becomes_positive() {
        let LineKind::Start(record) = read("Nov 20 Bpay Payments      -500.00").unwrap() else {
            panic!("expected a record start");
        };
        assert_eq!(record.description, "Bpay Payments");
        assert_eq!(record.amount, dec!(500.00));
    }

    #[test]
    fn test_non_month_prefix_is_continuation() {
        assert!(matches!(read("Ref 12 foreign fee"), Ok(LineKind::Continuation(_))));
        assert!(matches!(read("   USD 12.00"), Ok(LineKind::Continuation(_))));
    }

    #[test]
    fn test_dated_row_without_amount() {
        assert!(matches!(read("Nov 05    WOOLWORTHS"), Err(ReconError::Field { .. })));
    }

    #[test]
    fn test_dated_row_with_single_column() {
        assert!(matches!(read("Nov 05"), Err(ReconError::Field { .. })));
        assert!(matches!(read("Nov 05 12.50"), Err(ReconError::Field { .. })));
    }

    #[test]
    fn test_month_range_from_labels() {
        let pages = vec![PageContent::new(
            1,
            "Statement Begins   1 November 2024\nStatement Ends   30 November 2024\n",
        )];
        assert_eq!(Coles.month_range(&pages).unwrap(), MonthRange::single(2024, 11).unwrap());
        assert!(Coles.control_totals(&pages).unwrap().is_empty());
    }
}
