//! Statement header fields: the period and the declared control totals.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

use crate::error::ReconError;
use crate::parsing::columns::columns;
use crate::parsing::dates::month_number;
use crate::parsing::scan::{find, line_at, line_end, next_non_blank_line};
use crate::parsing::values::{looks_like_money, parse_money};
use crate::period::MonthRange;

static DAY_MON_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2}) ([A-Z][a-z]{2})[a-z]* (\d{4})\b").expect("valid date regex")
});

static SLASH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2})/(\d{2})/(\d{4})\b").expect("valid date regex"));

static MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-z]{2})[a-z]* (\d{4})\b").expect("valid month regex")
});

/// Position of `anchor` and the line it sits on.
fn anchor_line<'a>(text: &'a str, anchor: &str) -> Result<(usize, &'a str), ReconError> {
    let position = find(text, anchor, 0)
        .ok_or_else(|| ReconError::structure(anchor, "statement header not found"))?;
    Ok((position, line_at(text, position)))
}

/// The anchor line and the line after it, where a wrapped header value may sit.
fn anchor_window<'a>(text: &'a str, anchor: &str) -> Result<&'a str, ReconError> {
    let (position, _) = anchor_line(text, anchor)?;
    let start = position;
    let first_end = line_end(text, position);
    let end = if first_end < text.len() {
        line_end(text, first_end + 1)
    } else {
        first_end
    };
    Ok(&text[start..end])
}

/// Two `DD Mon YYYY` dates after `anchor`, e.g. `Statement period 01 Nov 2024 to 30 Nov 2024`.
pub fn day_month_year_period(text: &str, anchor: &str) -> Result<MonthRange, ReconError> {
    let window = anchor_window(text, anchor)?;
    let dates = DAY_MON_YEAR
        .captures_iter(window)
        .take(2)
        .map(|c| {
            let token = c[0].to_string();
            let day: u32 = c[1].parse().map_err(|_| ReconError::date(&token, "bad day"))?;
            let month = month_number(&c[2])
                .ok_or_else(|| ReconError::date(&token, "unknown month abbreviation"))?;
            let year: i32 = c[3].parse().map_err(|_| ReconError::date(&token, "bad year"))?;
            NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| ReconError::date(&token, "not a calendar date"))
        })
        .collect::<Result<Vec<NaiveDate>, ReconError>>()?;
    period_from(&dates, anchor, window)
}

/// Two `DD/MM/YYYY` dates after `anchor`, e.g. `Statement from: 01/11/2024 to 30/11/2024`.
pub fn slash_period(text: &str, anchor: &str) -> Result<MonthRange, ReconError> {
    let window = anchor_window(text, anchor)?;
    let dates = SLASH_DATE
        .captures_iter(window)
        .take(2)
        .map(|c| {
            let token = c[0].to_string();
            let day: u32 = c[1].parse().map_err(|_| ReconError::date(&token, "bad day"))?;
            let month: u32 = c[2].parse().map_err(|_| ReconError::date(&token, "bad month"))?;
            let year: i32 = c[3].parse().map_err(|_| ReconError::date(&token, "bad year"))?;
            NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| ReconError::date(&token, "not a calendar date"))
        })
        .collect::<Result<Vec<NaiveDate>, ReconError>>()?;
    period_from(&dates, anchor, window)
}

fn period_from(dates: &[NaiveDate], anchor: &str, window: &str) -> Result<MonthRange, ReconError> {
    match dates {
        [start, end] => MonthRange::new(*start, *end),
        _ => Err(ReconError::date(
            window.trim(),
            format!("expected two dates after '{anchor}'"),
        )),
    }
}

/// The `Month YYYY` printed last on the line labelled `label`, as (year, month).
pub fn labelled_month(text: &str, label: &str) -> Result<(i32, u32), ReconError> {
    let (_, line) = anchor_line(text, label)?;
    let caps = MONTH_YEAR
        .captures_iter(line)
        .last()
        .ok_or_else(|| ReconError::date(line.trim(), format!("no month after '{label}'")))?;
    let month = month_number(&caps[1])
        .ok_or_else(|| ReconError::date(&caps[0], "unknown month name"))?;
    let year: i32 = caps[2]
        .parse()
        .map_err(|_| ReconError::date(&caps[0], "bad year"))?;
    Ok((year, month))
}

/// The `$` amount printed after `label` on the same line.
pub fn money_after(text: &str, label: &str) -> Result<Decimal, ReconError> {
    let (position, _) = anchor_line(text, label)?;
    let end = line_end(text, position);
    let dollar = find(&text[..end], "$", position)
        .ok_or_else(|| ReconError::field(label, "no $ amount on the same line"))?;
    parse_money(&text[dollar..end])
        .map_err(|e| ReconError::field(label, e.to_string()))
}

/// Money columns of the first non-blank line after the line holding `label`.
pub fn money_row_after(text: &str, label: &str) -> Result<Vec<String>, ReconError> {
    let (position, _) = anchor_line(text, label)?;
    let row = next_non_blank_line(text, position)
        .ok_or_else(|| ReconError::field(label, "no values after the label"))?;
    Ok(money_columns(row))
}

/// The money-looking columns of a line, in order.
pub fn money_columns(line: &str) -> Vec<String> {
    columns(line)
        .into_iter()
        .filter(|c| looks_like_money(c.text))
        .map(|c| c.text.to_string())
        .collect()
}
