use crate::error::EngineError;
use crate::tokenizer::normalize;
use crate::vocab::Vocabulary;
use crate::{DocId, Document, TermId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How much of a document's raw text is kept for result previews.
const PREVIEW_CHARS: usize = 200;

/// Sparse non-negative term-count vector, entries sorted by term id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountVector {
    entries: Vec<(TermId, u32)>,
}

impl CountVector {
    /// Count `tokens` against `vocab`. Tokens outside the vocabulary are
    /// silently dropped; that is the query-side "no lexical overlap" policy,
    /// and a no-op for a corpus's own documents by construction.
    pub fn from_tokens(tokens: &[String], vocab: &Vocabulary) -> Self {
        let mut counts: HashMap<TermId, u32> = HashMap::new();
        for tok in tokens {
            if let Some(tid) = vocab.term_id(tok) {
                *counts.entry(tid).or_insert(0) += 1;
            }
        }
        let mut entries: Vec<(TermId, u32)> = counts.into_iter().collect();
        entries.sort_unstable_by_key(|&(tid, _)| tid);
        Self { entries }
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(TermId, u32)] {
        &self.entries
    }

    /// Dot product of two sorted sparse vectors (merge join).
    pub fn dot(&self, other: &CountVector) -> f64 {
        let mut sum = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a_id, a_n) = self.entries[i];
            let (b_id, b_n) = other.entries[j];
            match a_id.cmp(&b_id) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += f64::from(a_n) * f64::from(b_n);
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|&(_, n)| f64::from(n) * f64::from(n))
            .sum::<f64>()
            .sqrt()
    }
}

/// Per-document metadata carried alongside the count matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMeta {
    pub title: String,
    pub preview: String,
}

/// One named corpus: its vocabulary, one count vector per document (row index
/// = 0-based load order), precomputed vector norms, and display metadata.
///
/// Immutable once built. Reloading a corpus builds a fresh `CorpusIndex` and
/// swaps it in wholesale; there are no partial updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusIndex {
    pub name: String,
    vocab: Vocabulary,
    rows: Vec<CountVector>,
    norms: Vec<f64>,
    metas: Vec<DocMeta>,
}

impl CorpusIndex {
    /// Normalize and index `docs` as the corpus `name`.
    ///
    /// Fails with [`EngineError::EmptyCorpus`] when `docs` is empty or no
    /// document yields any tokens. Individual documents that normalize to
    /// nothing are kept as zero vectors; they rank with similarity 0.
    pub fn build(name: &str, docs: &[Document]) -> Result<Self, EngineError> {
        let doc_tokens: Vec<Vec<String>> = docs.iter().map(|d| normalize(&d.body)).collect();
        let vocab = Vocabulary::build(name, &doc_tokens)?;

        let rows: Vec<CountVector> = doc_tokens
            .iter()
            .map(|tokens| CountVector::from_tokens(tokens, &vocab))
            .collect();
        let norms = rows.iter().map(CountVector::norm).collect();
        let metas = docs
            .iter()
            .map(|d| DocMeta {
                title: d.title.clone(),
                preview: preview_of(&d.body),
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            vocab,
            rows,
            norms,
            metas,
        })
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn doc_count(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn row(&self, doc_id: DocId) -> (&CountVector, f64) {
        (&self.rows[doc_id as usize], self.norms[doc_id as usize])
    }

    pub fn meta(&self, doc_id: DocId) -> Option<&DocMeta> {
        self.metas.get(doc_id as usize)
    }
}

fn preview_of(body: &str) -> String {
    let mut out: String = body.chars().take(PREVIEW_CHARS).collect();
    if body.chars().count() > PREVIEW_CHARS {
        out.push('…');
    }
    out
}
