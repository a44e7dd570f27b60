use crate::error::EngineError;
use crate::index::CorpusIndex;
use crate::rank::{rank, vectorize_query, ScoredHit};
use crate::tokenizer::normalize;
use crate::Document;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-engine document counts, as reported by [`RetrievalEngine::statistics`].
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub corpora: BTreeMap<String, usize>,
    pub total_docs: usize,
}

/// The set of loaded corpora and the search operations over them.
///
/// Owns one immutable [`CorpusIndex`] per corpus name. Loading is an explicit
/// up-front phase; searches are read-only and the per-corpus ranking passes of
/// [`search_all`](Self::search_all) run in parallel, since no corpus is ever
/// mutated after its build.
#[derive(Debug, Default)]
pub struct RetrievalEngine {
    corpora: BTreeMap<String, CorpusIndex>,
}

impl RetrievalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and register `docs` as the corpus `name`, replacing any previous
    /// index under that name. The replacement is atomic: on a failed build the
    /// old index (if any) stays visible.
    pub fn load_corpus(&mut self, name: &str, docs: &[Document]) -> Result<(), EngineError> {
        let index = CorpusIndex::build(name, docs)?;
        tracing::info!(
            corpus = name,
            docs = index.doc_count(),
            terms = index.vocab().len(),
            "corpus indexed"
        );
        self.corpora.insert(name.to_string(), index);
        Ok(())
    }

    /// Register an index built elsewhere (e.g. restored from disk).
    pub fn insert_index(&mut self, index: CorpusIndex) {
        self.corpora.insert(index.name.clone(), index);
    }

    pub fn corpus_names(&self) -> impl Iterator<Item = &str> {
        self.corpora.keys().map(String::as_str)
    }

    pub fn corpus(&self, name: &str) -> Option<&CorpusIndex> {
        self.corpora.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.corpora.is_empty()
    }

    /// Search every loaded corpus and merge the per-corpus top-`top_n` lists
    /// into one globally ranked page of at most `top_n` hits.
    ///
    /// The query is normalized once and re-vectorized against each corpus's
    /// own vocabulary. Global ordering: score descending, then corpus name,
    /// then doc id — fully deterministic for a fixed engine state.
    pub fn search_all(&self, query: &str, top_n: usize) -> Result<Vec<ScoredHit>, EngineError> {
        if top_n == 0 {
            return Err(EngineError::InvalidTopN(top_n));
        }
        let tokens = normalize(query);

        let mut merged: Vec<ScoredHit> = self
            .corpora
            .par_iter()
            .flat_map(|(_, index)| {
                let q = vectorize_query(&tokens, index);
                // top_n was validated above; per-corpus rank cannot fail.
                rank(&q, index, top_n).unwrap_or_default()
            })
            .collect();

        merged.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.corpus.cmp(&b.corpus))
                .then(a.doc_id.cmp(&b.doc_id))
        });
        merged.truncate(top_n);
        Ok(merged)
    }

    /// Same pipeline as [`search_all`](Self::search_all), restricted to one
    /// named corpus.
    pub fn search_single(
        &self,
        query: &str,
        corpus_name: &str,
        top_n: usize,
    ) -> Result<Vec<ScoredHit>, EngineError> {
        if top_n == 0 {
            return Err(EngineError::InvalidTopN(top_n));
        }
        let index = self
            .corpora
            .get(corpus_name)
            .ok_or_else(|| EngineError::UnknownCorpus(corpus_name.to_string()))?;
        let q = vectorize_query(&normalize(query), index);
        rank(&q, index, top_n)
    }

    /// Document counts per corpus plus the total across the engine.
    pub fn statistics(&self) -> Statistics {
        let corpora: BTreeMap<String, usize> = self
            .corpora
            .iter()
            .map(|(name, idx)| (name.clone(), idx.doc_count()))
            .collect();
        let total_docs = corpora.values().sum();
        Statistics { corpora, total_docs }
    }
}
