use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::pipeline::Stage;

#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("anchor not found: {anchor} ({context})")]
    Structure { anchor: String, context: String },

    #[error("continuation line with no open record: '{line}'")]
    Sequence { line: String },

    #[error("missing or malformed {field}: {detail}")]
    Field { field: String, detail: String },

    #[error("invalid date '{token}': {reason}")]
    Date { token: String, reason: String },

    #[error("{check} mismatch: computed {computed}, declared {declared} (off by {difference})")]
    Reconciliation {
        check: String,
        computed: Decimal,
        declared: Decimal,
        difference: Decimal,
    },

    #[error("{stage} stage failed: {source}")]
    Pipeline {
        stage: Stage,
        #[source]
        source: Box<ReconError>,
    },

    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("document could not be decrypted: {0}")]
    Decryption(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("no account named '{0}' in config")]
    UnknownAccount(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ReconError {
    pub(crate) fn structure(anchor: impl Into<String>, context: impl Into<String>) -> Self {
        ReconError::Structure {
            anchor: anchor.into(),
            context: context.into(),
        }
    }

    pub(crate) fn field(field: impl Into<String>, detail: impl Into<String>) -> Self {
        ReconError::Field {
            field: field.into(),
            detail: detail.into(),
        }
    }

    pub(crate) fn date(token: impl Into<String>, reason: impl Into<String>) -> Self {
        ReconError::Date {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Tag an error with the pipeline stage it came from.
    pub fn at(self, stage: Stage) -> Self {
        match self {
            already @ ReconError::Pipeline { .. } => already,
            other => ReconError::Pipeline {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The pipeline stage that failed, if the error came out of a pipeline run.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ReconError::Pipeline { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
