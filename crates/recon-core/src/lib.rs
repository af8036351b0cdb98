pub mod category;
pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod period;
pub mod pipeline;
pub mod providers;
pub mod summary;
pub mod validate;

use error::ReconError;
use extraction::PdfExtractor;
use model::Statement;
use pipeline::Pipeline;

/// Main API entry point: reconstruct and reconcile one statement PDF.
///
/// Extraction failures are returned as-is; anything after extraction carries
/// the pipeline stage that rejected the document.
pub fn reconcile_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    pipeline: &Pipeline,
    password: Option<&str>,
) -> Result<Statement, ReconError> {
    let pages = extractor.extract_pages(pdf_bytes, password)?;
    tracing::debug!(
        backend = extractor.backend_name(),
        pages = pages.len(),
        "pages extracted"
    );
    pipeline.run(&pages)
}
