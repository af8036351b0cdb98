use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::ReconError;
use crate::parsing::assemble::{DateToken, RawRecord};
use crate::period::MonthRange;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Month number for a three-letter abbreviation. Case-sensitive.
pub fn month_number(abbreviation: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == abbreviation)
        .map(|i| i as u32 + 1)
}

pub fn month_abbreviation(month: u32) -> Option<&'static str> {
    MONTHS.get(month.checked_sub(1)? as usize).copied()
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Resolve a day and month abbreviation to a date inside the statement period.
pub fn resolve(day: u32, abbreviation: &str, range: &MonthRange) -> Result<NaiveDate, ReconError> {
    let token = format!("{day:02} {abbreviation}");
    let month = month_number(abbreviation)
        .ok_or_else(|| ReconError::date(&token, "unknown month abbreviation"))?;
    let year = range.resolve_year(month);
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ReconError::date(&token, format!("day out of range for {abbreviation} {year}")))
}

pub fn resolve_token(token: &DateToken, range: &MonthRange) -> Result<NaiveDate, ReconError> {
    match token {
        DateToken::DayMonth { day, month } => resolve(*day, month, range),
        DateToken::Numeric { day, month, year } => NaiveDate::from_ymd_opt(*year, *month, *day)
            .ok_or_else(|| {
                ReconError::date(format!("{day:02}/{month:02}/{year}"), "not a calendar date")
            }),
    }
}

/// A record whose date is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedRecord {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
}

/// Resolve every record's date. A record without a date token takes the
/// date of the record before it.
pub fn resolve_record_dates(
    records: Vec<RawRecord>,
    range: &MonthRange,
) -> Result<Vec<DatedRecord>, ReconError> {
    let mut dated: Vec<DatedRecord> = Vec::with_capacity(records.len());
    for record in records {
        let date = match &record.date {
            Some(token) => resolve_token(token, range)?,
            None => dated.last().map(|r| r.date).ok_or_else(|| {
                ReconError::date(
                    record.description.clone(),
                    "first transaction has no date to carry forward",
                )
            })?,
        };
        dated.push(DatedRecord {
            date,
            description: record.description,
            amount: record.amount,
        });
    }
    Ok(dated)
}

/// Upper-case `MMMYY` references (e.g. `NOV24`) for every month of a range.
pub fn month_references(range: &MonthRange) -> Vec<String> {
    range
        .months()
        .iter()
        .filter_map(|m| {
            let start = m.start();
            let name = month_abbreviation(start.month())?;
            Some(format!("{}{:02}", name.to_uppercase(), start.year() % 100))
        })
        .collect()
}
