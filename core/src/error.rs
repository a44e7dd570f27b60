use thiserror::Error;

/// Errors the retrieval engine can surface to a caller.
///
/// Zero-norm vectors are deliberately absent from this taxonomy: a query with
/// no vocabulary overlap, or an empty document, scores 0 and stays in the
/// result ordering rather than failing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The corpus has no documents, or every document normalized to an empty
    /// token stream. Fatal for that corpus's build only.
    #[error("corpus '{0}' has no indexable documents")]
    EmptyCorpus(String),

    /// Requested result count must be at least 1.
    #[error("top_n must be positive, got {0}")]
    InvalidTopN(usize),

    /// Search targeted a corpus name that was never loaded.
    #[error("unknown corpus '{0}'")]
    UnknownCorpus(String),
}
