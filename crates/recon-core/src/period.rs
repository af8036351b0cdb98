use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ReconError;
use crate::parsing::dates::{last_day_of_month, month_abbreviation};

/// Longest statement window accepted, in calendar months.
const MAX_MONTHS: i32 = 13;

/// The calendar window a statement covers, from the first day of its first
/// month to the last day of its last month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl MonthRange {
    /// Build a range covering the months of `start` and `end` (days are ignored).
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReconError> {
        Self::from_months(start.year(), start.month(), end.year(), end.month())
    }

    pub fn from_months(
        start_year: i32,
        start_month: u32,
        end_year: i32,
        end_month: u32,
    ) -> Result<Self, ReconError> {
        let token = format!("{start_year}-{start_month:02} to {end_year}-{end_month:02}");
        let start = NaiveDate::from_ymd_opt(start_year, start_month, 1)
            .ok_or_else(|| ReconError::date(&token, "invalid start month"))?;
        let end = last_day_of_month(end_year, end_month)
            .ok_or_else(|| ReconError::date(&token, "invalid end month"))?;

        if start > end {
            return Err(ReconError::date(&token, "range starts after it ends"));
        }

        let span = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32 + 1;
        if span > MAX_MONTHS {
            return Err(ReconError::date(
                &token,
                format!("statement spans {span} months (at most {MAX_MONTHS} supported)"),
            ));
        }

        Ok(MonthRange { start, end })
    }

    /// A range covering exactly one month.
    pub fn single(year: i32, month: u32) -> Result<Self, ReconError> {
        Self::from_months(year, month, year, month)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Year a bare month number belongs to inside this range.
    ///
    /// Cross-year ranges assign months at or after the starting month to the
    /// start year and everything else to the end year.
    pub fn resolve_year(&self, month: u32) -> i32 {
        if self.start.year() == self.end.year() {
            return self.start.year();
        }
        if month >= self.start.month() {
            self.start.year()
        } else {
            self.end.year()
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn overlaps(&self, other: &MonthRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Every single-month range inside this one, in order.
    pub fn months(&self) -> Vec<MonthRange> {
        let mut out = Vec::new();
        let (mut year, mut month) = (self.start.year(), self.start.month());
        loop {
            if let Ok(m) = MonthRange::single(year, month) {
                out.push(m);
            }
            if year == self.end.year() && month == self.end.month() {
                break;
            }
            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
        }
        out
    }

    /// File stem for this range, e.g. `2024-11 to 2025-02`.
    pub fn to_filename(&self) -> String {
        format!(
            "{}-{:02} to {}-{:02}",
            self.start.year(),
            self.start.month(),
            self.end.year(),
            self.end.month()
        )
    }

    /// Parse a file name produced by [`MonthRange::to_filename`], with or
    /// without an extension.
    pub fn from_filename(filename: &str) -> Option<MonthRange> {
        let stem = match filename.rfind('.') {
            Some(dot) => &filename[..dot],
            None => filename,
        };
        let (low, high) = stem.split_once(" to ")?;
        let (start_year, start_month) = parse_year_month(low)?;
        let (end_year, end_month) = parse_year_month(high)?;
        MonthRange::from_months(start_year, start_month, end_year, end_month).ok()
    }
}

fn parse_year_month(s: &str) -> Option<(i32, u32)> {
    let (year, month) = s.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    Some((year.parse().ok()?, month.parse().ok()?))
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |d: NaiveDate| month_abbreviation(d.month()).unwrap_or("???");
        write!(
            f,
            "{} {} to {} {}",
            name(self.start),
            self.start.year(),
            name(self.end),
            self.end.year()
        )
    }
}
