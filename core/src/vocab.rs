use crate::error::EngineError;
use crate::TermId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Term dictionary for one corpus: a bidirectional mapping between normalized
/// terms and dense column indices in `[0, len)`.
///
/// Terms are sorted lexicographically before ids are assigned, so the same
/// token streams always produce the same mapping. Queries and tests depend on
/// that determinism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: Vec<String>,
    ids: HashMap<String, TermId>,
}

impl Vocabulary {
    /// Build the vocabulary from the per-document token streams of a corpus.
    ///
    /// Fails with [`EngineError::EmptyCorpus`] when there are no documents or
    /// every token stream is empty.
    pub fn build(corpus_name: &str, doc_tokens: &[Vec<String>]) -> Result<Self, EngineError> {
        // BTreeSet both dedups and yields the sorted assignment order.
        let distinct: BTreeSet<&str> = doc_tokens
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();
        if distinct.is_empty() {
            return Err(EngineError::EmptyCorpus(corpus_name.to_string()));
        }

        let terms: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        let ids = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as TermId))
            .collect();
        Ok(Self { terms, ids })
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.ids.get(term).copied()
    }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
