//! Multi-corpus vector-space retrieval: bag-of-words count vectors per
//! corpus, cosine-similarity ranking, and a global aggregator over all
//! loaded corpora.

pub mod engine;
pub mod error;
pub mod index;
pub mod persist;
pub mod rank;
pub mod tokenizer;
pub mod vocab;

use serde::{Deserialize, Serialize};

/// Dense column index into a corpus's vocabulary.
pub type TermId = u32;
/// 0-based position of a document within its corpus, in load order.
pub type DocId = u32;

/// Raw input document as handed over by a loader. The body is normalized at
/// index-build time; the core never re-reads it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub title: String,
    pub body: String,
}

pub use engine::{RetrievalEngine, Statistics};
pub use error::EngineError;
pub use index::CorpusIndex;
pub use rank::ScoredHit;
