pub mod pdftotext;

use crate::error::ReconError;

/// Layout-preserving text of a single statement page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub page_number: usize,
    pub text: String,
}

impl PageContent {
    pub fn new(page_number: usize, text: impl Into<String>) -> Self {
        PageContent {
            page_number,
            text: text.into(),
        }
    }

    /// True when every keyword occurs somewhere on the page.
    pub fn contains_all(&self, keywords: &[&str]) -> bool {
        keywords.iter().all(|k| self.text.contains(k))
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract layout text from PDF bytes, returning one PageContent per page.
    ///
    /// `password` is the user password for encrypted statements.
    fn extract_pages(
        &self,
        pdf_bytes: &[u8],
        password: Option<&str>,
    ) -> Result<Vec<PageContent>, ReconError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
