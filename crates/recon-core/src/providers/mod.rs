//! Per-provider statement layouts.
//!
//! Every provider is a fixed set of anchor strings and positional rules plugged
//! into the one generic [`Pipeline`](crate::pipeline::Pipeline).

pub mod boq;
pub mod coles;
pub mod commbank;
pub mod hsbc;
pub mod ing;

use rust_decimal::Decimal;

use crate::classify::{Fallback, Rule};
use crate::error::ReconError;
use crate::extraction::PageContent;
use crate::model::Provider;
use crate::parsing::assemble::LineKind;
use crate::parsing::columns::{columns, ColumnGuide};
use crate::parsing::segment::{self, Layout, RegionLine};
use crate::parsing::values::{looks_like_money, parse_money};
use crate::period::MonthRange;
use crate::validate::{ControlTotals, Partition};

/// Everything the pipeline needs to know about one provider's statements.
pub trait StatementAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    /// The statement period printed in the header.
    fn month_range(&self, pages: &[PageContent]) -> Result<MonthRange, ReconError>;

    /// Control totals the statement declares. Empty when it declares none.
    fn control_totals(&self, pages: &[PageContent]) -> Result<ControlTotals, ReconError>;

    fn layout(&self) -> &Layout;

    /// Transaction lines of the whole statement, in document order.
    fn region_lines<'a>(&self, pages: &'a [PageContent]) -> Result<Vec<RegionLine<'a>>, ReconError> {
        segment::region_lines(pages, self.layout())
    }

    /// Decide whether a line starts a record or continues the open one.
    fn read_line(&self, line: &RegionLine<'_>) -> Result<LineKind, ReconError>;

    /// Built-in classification rules, first match wins.
    fn rules(&self) -> Vec<Rule>;

    fn fallback(&self) -> Fallback;

    fn partition(&self) -> Partition;

    /// Final clean-up of a classified description.
    fn tidy_description(&self, description: &str) -> String {
        description.to_string()
    }
}

pub fn adapter_for(provider: Provider) -> Box<dyn StatementAdapter> {
    match provider {
        Provider::Boq => Box::new(boq::Boq),
        Provider::Coles => Box::new(coles::Coles),
        Provider::Commbank => Box::new(commbank::Commbank),
        Provider::Hsbc => Box::new(hsbc::Hsbc),
        Provider::Ing => Box::new(ing::Ing),
    }
}

pub(crate) fn first_page(pages: &[PageContent]) -> Result<&PageContent, ReconError> {
    pages
        .first()
        .ok_or_else(|| ReconError::structure("first page", "document has no pages"))
}

/// The first page holding every one of `labels`.
pub(crate) fn page_with<'a>(
    pages: &'a [PageContent],
    labels: &[&str],
) -> Result<&'a PageContent, ReconError> {
    pages
        .iter()
        .find(|p| p.contains_all(labels))
        .ok_or_else(|| ReconError::structure(labels.join(" + "), "no page holds these labels"))
}

/// Debit, credit and balance headings of a column-aligned statement.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AmountColumns {
    pub debit: &'static str,
    pub credit: &'static str,
    pub balance: &'static str,
}

/// A row read against [`AmountColumns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GuidedRow {
    pub description: String,
    /// Negative under the debit heading, positive under the credit heading.
    pub amount: Option<Decimal>,
}

impl AmountColumns {
    /// Read a row, skipping its first `skip` columns (the date).
    pub fn read(&self, line: &RegionLine<'_>, skip: usize) -> Result<GuidedRow, ReconError> {
        let guide = ColumnGuide::from_header(line.header, &[self.debit, self.credit, self.balance])?;
        let mut description = Vec::new();
        let mut amount = None;

        for column in columns(line.text).iter().skip(skip) {
            if !looks_like_money(column.text) {
                description.push(column.text);
                continue;
            }
            let value = match guide.label_for(column) {
                Some(label) if label == self.debit => -parse_money(column.text)?.abs(),
                Some(label) if label == self.credit => parse_money(column.text)?.abs(),
                _ => continue,
            };
            if amount.replace(value).is_some() {
                return Err(ReconError::field(
                    "amount",
                    format!("both debit and credit on '{}'", line.text.trim()),
                ));
            }
        }

        Ok(GuidedRow {
            description: description.join(" "),
            amount,
        })
    }
}

pub(crate) fn missing_amount(line: &RegionLine<'_>) -> ReconError {
    ReconError::field(
        "amount",
        format!("page {}: no amount on '{}'", line.page_number, line.text.trim()),
    )
}
