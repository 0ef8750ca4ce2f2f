//! Error taxonomy for extraction.

/// Errors produced while loading naming rules.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("invalid rules json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid rule pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("io error reading rules: {0}")]
    Io(#[from] std::io::Error),
}

/// Extraction errors.
///
/// Everything except [`ExtractError::MnemonicMismatch`] is fatal for the
/// action being extracted.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("mnemonic does not match: {actual:?} != {expected:?}")]
    MnemonicMismatch { actual: String, expected: String },

    #[error("extra action does not have spawn info")]
    MissingSpawnInfo,

    #[error("reading params file {path:?}: {source}")]
    ResponseFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to read input {path:?}: {source}")]
    InputFetch {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("input fetch task failed: {0}")]
    FetchTask(String),
}

impl ExtractError {
    /// True when the action was skipped rather than rejected.
    pub fn is_skip(&self) -> bool {
        matches!(self, ExtractError::MnemonicMismatch { .. })
    }
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
