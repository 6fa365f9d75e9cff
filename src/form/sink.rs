use thiserror::Error;

use super::document::FormDocument;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("failed to serialize form: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination of a finalized form.
#[cfg_attr(test, mockall::automock)]
pub trait SubmissionSink: Send + Sync {
    fn submit(&self, document: FormDocument) -> Result<(), SubmissionError>;
}

/// Writes every submitted form to the log as a single JSON record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl SubmissionSink for LogSink {
    fn submit(&self, document: FormDocument) -> Result<(), SubmissionError> {
        let payload = serde_json::to_string(&document)?;
        tracing::info!(form = %payload, "form received");
        Ok(())
    }
}
