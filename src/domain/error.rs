// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Structural problems (missing columns, missing files, an
// unresolvable tokenizer, an unreadable mapping) are typed here
// so the application layer can decide whether to skip a split
// or abort the run.
//
// Row-level problems (missing text, unmapped label) never
// become errors: the SplitProcessor drops and counts them.
//
// Reference: thiserror crate documentation

use std::path::PathBuf;
use thiserror::Error;

/// Every error a pipeline stage can raise.
#[derive(Debug, Error)]
pub enum PrepError {
    /// A required column is absent from a loaded table.
    #[error("[{split}] required column '{column}' not found")]
    Schema { split: String, column: String },

    /// A split's source file does not exist.
    #[error("[{split}] file not found: {}", path.display())]
    MissingSplit { split: String, path: PathBuf },

    /// The tokenization scheme could not be resolved.
    #[error("tokenization scheme '{scheme}' is unavailable: {reason}")]
    SchemeUnavailable { scheme: String, reason: String },

    /// The persisted label mapping could not be read or is inconsistent.
    #[error("cannot load label mapping from '{}': {reason}", path.display())]
    MappingLoad { path: PathBuf, reason: String },

    /// A label column cell is not an integer.
    #[error("[{split}] column '{column}' row {row}: '{value}' is not an integer label")]
    InvalidLabelValue {
        split:  String,
        column: String,
        row:    usize,
        value:  String,
    },

    /// The run configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The tokenizer failed on an input text.
    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PrepError {
    /// Errors that skip the current split instead of aborting the stage.
    pub fn is_skippable(&self) -> bool {
        matches!(self, PrepError::MissingSplit { .. })
    }
}

pub type PrepResult<T> = Result<T, PrepError>;
