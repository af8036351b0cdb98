use colored::Colorize;
use recon_core::config::load_config;
use recon_core::error::ReconError;
use recon_core::export::{read_csv_file, write_csv_file};
use recon_core::model::Transaction;
use recon_core::period::MonthRange;
use recon_core::summary::{collate, Summary};
use std::path::Path;
use std::process::ExitCode;

use super::{file_name, files_with_extension};
use crate::output;

pub fn run(config_path: &Path, from: &str, to: Option<&str>) -> Result<ExitCode, ReconError> {
    let config = load_config(config_path)?;
    let (start_year, start_month) = parse_month(from)?;
    let (end_year, end_month) = parse_month(to.unwrap_or(from))?;
    let span = MonthRange::from_months(start_year, start_month, end_year, end_month)?;

    let mut ledgers: Vec<(MonthRange, Vec<Transaction>)> = Vec::new();
    for account in &config.accounts {
        for path in files_with_extension(&account.folder, "csv")? {
            if let Some(range) = MonthRange::from_filename(&file_name(&path)) {
                if range.overlaps(&span) {
                    ledgers.push((range, read_csv_file(&path)?));
                }
            }
        }
    }
    tracing::debug!(ledgers = ledgers.len(), %span, "ledgers loaded");

    std::fs::create_dir_all(&config.output_dir)?;
    for month in span.months() {
        let transactions = collate(ledgers.iter().map(|(r, t)| (r, t.as_slice())), &month);
        let name = format!("{}.csv", month.to_filename());
        write_csv_file(&config.output_dir.join(&name), &transactions)?;

        println!("{}", month.to_string().blue().bold());
        println!(
            "{}",
            format!("{name} written, {} transactions", transactions.len()).green()
        );
        output::table::print_summary(&Summary::of(&transactions));
        println!();
    }

    Ok(ExitCode::SUCCESS)
}

/// Parse a `YYYY-MM` argument.
fn parse_month(s: &str) -> Result<(i32, u32), ReconError> {
    let invalid = |reason: &str| ReconError::Date {
        token: s.to_string(),
        reason: reason.to_string(),
    };
    let (year, month) = s.trim().split_once('-').ok_or_else(|| invalid("expected YYYY-MM"))?;
    let year: i32 = year.parse().map_err(|_| invalid("bad year"))?;
    let month: u32 = month.parse().map_err(|_| invalid("bad month"))?;
    if !(1..=12).contains(&month) {
        return Err(invalid("month must be 01 to 12"));
    }
    Ok((year, month))
}
