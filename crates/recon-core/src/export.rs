//! CSV persistence of transaction ledgers.
//!
//! Columns are `Date,Description,Amount,Type`, with dates as `YYYY-MM-DD` and
//! the type as its display string (e.g. `Card Payment`).

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::ReconError;
use crate::model::Transaction;

pub fn write_transactions<W: Write>(writer: W, transactions: &[Transaction]) -> Result<(), ReconError> {
    let mut csv = csv::Writer::from_writer(writer);
    for transaction in transactions {
        csv.serialize(transaction)?;
    }
    // An empty ledger still gets its header row.
    if transactions.is_empty() {
        csv.write_record(["Date", "Description", "Amount", "Type"])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn read_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>, ReconError> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut out = Vec::new();
    for row in csv.deserialize() {
        out.push(row?);
    }
    Ok(out)
}

pub fn write_csv_file(path: &Path, transactions: &[Transaction]) -> Result<(), ReconError> {
    write_transactions(File::create(path)?, transactions)
}

pub fn read_csv_file(path: &Path) -> Result<Vec<Transaction>, ReconError> {
    read_transactions(File::open(path)?)
}
