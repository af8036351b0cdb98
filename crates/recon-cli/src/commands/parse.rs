use recon_core::error::ReconError;
use recon_core::export::write_transactions;
use recon_core::extraction::pdftotext::PdftotextExtractor;
use recon_core::model::Provider;
use recon_core::pipeline::Pipeline;
use std::path::Path;
use std::process::ExitCode;

use crate::output;

pub fn run(
    pdf_file: &Path,
    provider: Provider,
    password: Option<&str>,
    output_format: &str,
) -> Result<ExitCode, ReconError> {
    let pdf_bytes = std::fs::read(pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let pipeline = Pipeline::for_provider(provider);
    let statement = recon_core::reconcile_pdf(&pdf_bytes, &extractor, &pipeline, password)?;

    match output_format {
        "json" => output::json::print(&statement)?,
        "csv" => write_transactions(std::io::stdout().lock(), &statement.transactions)?,
        _ => output::table::print_statement(&statement),
    }

    Ok(ExitCode::SUCCESS)
}
