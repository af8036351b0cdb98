use crate::error::ReconError;
use crate::extraction::{PageContent, PdfExtractor};
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` so statement columns keep their alignment.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(
        &self,
        pdf_bytes: &[u8],
        password: Option<&str>,
    ) -> Result<Vec<PageContent>, ReconError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| ReconError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| ReconError::Extraction(e.to_string()))?;

        let mut command = Command::new("pdftotext");
        command.arg("-layout");
        if let Some(password) = password {
            command.arg("-upw").arg(password);
        }
        let output = command
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ReconError::PdftotextNotFound
                } else {
                    ReconError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(failure(code, stderr, password.is_some()));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(split_pages(&text))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Split pdftotext output into pages on the form feed separator.
fn split_pages(text: &str) -> Vec<PageContent> {
    text.split('\x0c')
        .enumerate()
        .map(|(i, page_text)| PageContent::new(i + 1, page_text))
        .filter(|p| !p.text.trim().is_empty() || p.page_number == 1)
        .collect()
}

fn failure(code: i32, stderr: String, had_password: bool) -> ReconError {
    if stderr.to_lowercase().contains("password") {
        let reason = if had_password {
            "incorrect password"
        } else {
            "document is encrypted and no password is configured"
        };
        return ReconError::Decryption(reason.into());
    }
    ReconError::PdftotextFailed { code, stderr }
}
