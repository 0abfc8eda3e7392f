use std::path::PathBuf;

use thiserror::Error;

/// Per-document failures. None of these abort a batch; the document is
/// skipped and counted.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{source_name}: markup has no usable text ({reason})")]
    MarkupParse { source_name: String, reason: String },

    #[error("{source_name}: no chorus found")]
    ChorusAbsent { source_name: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub fn markup(source_name: &str, reason: impl Into<String>) -> Self {
        IngestError::MarkupParse {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }

    /// Short label used in skip summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::MarkupParse { .. } => "markup",
            IngestError::ChorusAbsent { .. } => "no_chorus",
            IngestError::Io { .. } => "io",
        }
    }
}
