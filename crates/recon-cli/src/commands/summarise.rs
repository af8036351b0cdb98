use recon_core::error::ReconError;
use recon_core::export::read_csv_file;
use recon_core::summary::Summary;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::output;

pub fn run(files: &[PathBuf], output_format: &str) -> Result<ExitCode, ReconError> {
    let mut transactions = Vec::new();
    for path in files {
        transactions.extend(read_csv_file(path)?);
    }
    let summary = Summary::of(&transactions);

    match output_format {
        "json" => output::json::print(&summary)?,
        _ => output::table::print_summary(&summary),
    }

    Ok(ExitCode::SUCCESS)
}
