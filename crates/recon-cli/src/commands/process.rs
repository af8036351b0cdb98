use colored::Colorize;
use recon_core::config::{load_config, AccountConfig};
use recon_core::error::ReconError;
use recon_core::export::write_csv_file;
use recon_core::extraction::pdftotext::PdftotextExtractor;
use recon_core::extraction::PdfExtractor;
use recon_core::period::MonthRange;
use recon_core::pipeline::Pipeline;
use std::path::Path;
use std::process::ExitCode;

use super::{file_name, files_with_extension};
use crate::output;

#[derive(Debug, Clone, Copy)]
pub struct ProcessOptions {
    pub force: bool,
    pub quick: bool,
    pub log: bool,
}

#[derive(Debug, Default)]
struct Tally {
    written: usize,
    skipped: usize,
    failed: usize,
}

pub fn run(
    config_path: &Path,
    account: Option<&str>,
    options: ProcessOptions,
) -> Result<ExitCode, ReconError> {
    let config = load_config(config_path)?;
    let accounts: Vec<&AccountConfig> = match account {
        Some(name) => vec![config.account(name)?],
        None => config.accounts.iter().collect(),
    };

    let extractor = PdftotextExtractor::new();
    let mut tally = Tally::default();

    for account in accounts {
        println!(
            "{}",
            format!("{} ({})", account.name, account.provider).blue().bold()
        );
        process_account(account, &extractor, options, &mut tally)?;
        println!();
    }

    println!(
        "{} written, {} skipped, {} failed",
        tally.written, tally.skipped, tally.failed
    );
    Ok(if tally.failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn process_account(
    account: &AccountConfig,
    extractor: &dyn PdfExtractor,
    options: ProcessOptions,
    tally: &mut Tally,
) -> Result<(), ReconError> {
    let raw_dir = account.raw_dir();
    let pipeline = Pipeline::for_account(account);

    for path in files_with_extension(&raw_dir, "pdf")? {
        let name = file_name(&path);
        if !options.force && !options.quick && MonthRange::from_filename(&name).is_some() {
            println!("{}", format!("{name} skipped").yellow());
            tally.skipped += 1;
            continue;
        }

        match process_file(&path, &name, account, extractor, &pipeline, options) {
            Ok(true) => tally.written += 1,
            Ok(false) => tally.skipped += 1,
            Err(e) => {
                tracing::debug!(file = %path.display(), error = ?e, "statement failed");
                let stage = e
                    .stage()
                    .map(|s| format!(" [{s}]"))
                    .unwrap_or_default();
                println!("{}", format!("{name}{stage}: {e}").red());
                tally.failed += 1;
            }
        }
    }
    Ok(())
}

/// Reconcile one PDF. Returns false when it was skipped.
fn process_file(
    path: &Path,
    name: &str,
    account: &AccountConfig,
    extractor: &dyn PdfExtractor,
    pipeline: &Pipeline,
    options: ProcessOptions,
) -> Result<bool, ReconError> {
    let bytes = std::fs::read(path)?;
    let pages = extractor.extract_pages(&bytes, account.password.as_deref())?;

    let range = pipeline.month_range(&pages)?;
    let stem = range.to_filename();
    let pdf_name = format!("{stem}.pdf");
    if options.quick && pdf_name == name {
        println!("{}", format!("{stem} skipped").yellow());
        return Ok(false);
    }

    let statement = pipeline.run(&pages)?;
    if options.log {
        output::table::print_transactions(&statement.transactions);
    }
    output::table::print_checks(&statement.checks);

    std::fs::rename(path, account.raw_dir().join(&pdf_name))?;

    let csv_name = format!("{stem}.csv");
    let csv_path = account.folder.join(&csv_name);
    if csv_path.is_file() {
        println!("{}", format!("{csv_name} replaced").yellow());
    }
    write_csv_file(&csv_path, &statement.transactions)?;
    println!(
        "{}",
        format!("{csv_name} written, {} transactions", statement.transactions.len()).green()
    );
    Ok(true)
}
