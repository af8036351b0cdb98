use rust_decimal::Decimal;

use crate::error::ReconError;

/// A date as printed on a transaction row, before the statement year is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateToken {
    /// `05 Nov`, `05-Nov`, `Nov 05`: the year comes from the statement period.
    DayMonth { day: u32, month: String },
    /// `05/11/2024`.
    Numeric { day: u32, month: u32, year: i32 },
}

/// One logical transaction reassembled from its physical lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// `None` when the row inherits the date of the row above it.
    pub date: Option<DateToken>,
    pub description: String,
    /// Signed: negative leaves the account, positive enters it.
    pub amount: Decimal,
}

impl RawRecord {
    pub fn new(date: Option<DateToken>, description: impl Into<String>, amount: Decimal) -> Self {
        RawRecord {
            date,
            description: description.into(),
            amount,
        }
    }

    fn extend(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.description.is_empty() {
            self.description.push(' ');
        }
        self.description.push_str(text);
    }
}

/// How a provider reads one physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// The line opens a new record.
    Start(RawRecord),
    /// The line extends the open record's description.
    Continuation(String),
}

/// Merge physical lines into logical records.
///
/// Each `Start` closes the open record and opens a new one; each
/// `Continuation` is space-joined onto the open record. Record order follows
/// line order.
pub fn assemble<L, F>(lines: impl IntoIterator<Item = L>, mut read: F) -> Result<Vec<RawRecord>, ReconError>
where
    F: FnMut(L) -> Result<LineKind, ReconError>,
{
    let mut records = Vec::new();
    let mut open: Option<RawRecord> = None;

    for line in lines {
        match read(line)? {
            LineKind::Start(record) => {
                if let Some(done) = open.replace(record) {
                    records.push(done);
                }
            }
            LineKind::Continuation(text) => match open.as_mut() {
                Some(record) => record.extend(&text),
                None => return Err(ReconError::Sequence { line: text }),
            },
        }
    }

    records.extend(open);
    Ok(records)
}
