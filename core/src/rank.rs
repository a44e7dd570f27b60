use crate::error::EngineError;
use crate::index::{CorpusIndex, CountVector};
use crate::DocId;
use serde::Serialize;

/// One ranked hit, tagged with the corpus it came from.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredHit {
    pub corpus: String,
    pub doc_id: DocId,
    pub score: f32,
    pub title: String,
    pub preview: String,
}

/// Project normalized query tokens into `index`'s vector space.
///
/// Out-of-vocabulary tokens contribute nothing; a query with no lexical
/// overlap yields the zero vector, which ranks everything at 0.
pub fn vectorize_query(tokens: &[String], index: &CorpusIndex) -> CountVector {
    CountVector::from_tokens(tokens, index.vocab())
}

/// Cosine similarity of two count vectors with precomputed norms, defined as
/// 0 whenever either norm is 0.
fn cosine(q: &CountVector, q_norm: f64, d: &CountVector, d_norm: f64) -> f64 {
    if q_norm == 0.0 || d_norm == 0.0 {
        return 0.0;
    }
    q.dot(d) / (q_norm * d_norm)
}

/// Score every document of `index` against `query` and return the `top_n`
/// best, sorted by score descending, ties broken by ascending doc id.
///
/// Always returns exactly `min(top_n, doc_count)` hits; zero scores are kept
/// so an all-zero query still produces a deterministic page of results.
pub fn rank(
    query: &CountVector,
    index: &CorpusIndex,
    top_n: usize,
) -> Result<Vec<ScoredHit>, EngineError> {
    if top_n == 0 {
        return Err(EngineError::InvalidTopN(top_n));
    }
    let q_norm = query.norm();

    let mut hits: Vec<ScoredHit> = (0..index.doc_count() as DocId)
        .map(|doc_id| {
            let (row, d_norm) = index.row(doc_id);
            let score = cosine(query, q_norm, row, d_norm) as f32;
            let meta = index.meta(doc_id);
            ScoredHit {
                corpus: index.name.clone(),
                doc_id,
                score,
                title: meta.map(|m| m.title.clone()).unwrap_or_default(),
                preview: meta.map(|m| m.preview.clone()).unwrap_or_default(),
            }
        })
        .collect();

    // total_cmp keeps the ordering total; counts can never produce NaN but
    // the sort must not be able to panic either way.
    hits.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
    hits.truncate(top_n);
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn build(bodies: &[&str]) -> CorpusIndex {
        let docs: Vec<Document> = bodies
            .iter()
            .map(|b| Document {
                title: String::new(),
                body: b.to_string(),
            })
            .collect();
        CorpusIndex::build("test", &docs).unwrap()
    }

    fn query(index: &CorpusIndex, q: &str) -> CountVector {
        vectorize_query(&crate::tokenizer::normalize(q), index)
    }

    #[test]
    fn self_similarity_is_one() {
        let idx = build(&["mesin belajar statistik", "informasi dokumen"]);
        for doc_id in 0..idx.doc_count() as DocId {
            let (row, norm) = idx.row(doc_id);
            assert!((cosine(row, norm, row, norm) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn machine_learning_scenario() {
        // Three documents over the vocabulary {data, learn, machine, model}.
        let idx = build(&["machine learn", "data model", "machine learn model"]);
        let q = query(&idx, "machine learn");

        let hits = rank(&q, &idx, 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].doc_id, 0);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
        assert_eq!(hits[1].doc_id, 2);
        assert!((hits[1].score - 0.816_f32).abs() < 1e-3);
        assert_eq!(hits[2].doc_id, 1);
        assert_eq!(hits[2].score, 0.0);
    }

    #[test]
    fn scores_stay_in_unit_interval_and_sorted() {
        let idx = build(&["alpha beta gamma", "beta beta", "gamma delta", "epsilon"]);
        let q = query(&idx, "beta gamma beta");
        let hits = rank(&q, &idx, 10).unwrap();
        assert_eq!(hits.len(), 4);
        for w in hits.windows(2) {
            assert!(w[0].score >= w[1].score);
        }
        for h in &hits {
            assert!((0.0..=1.0).contains(&h.score));
        }
    }

    #[test]
    fn out_of_vocabulary_query_ranks_everything_zero() {
        let idx = build(&["mesin belajar", "informasi dokumen"]);
        let q = query(&idx, "zzzunknownzzz");
        assert!(q.is_zero());
        let hits = rank(&q, &idx, 5).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!((hits[0].doc_id, hits[1].doc_id), (0, 1));
        assert!(hits.iter().all(|h| h.score == 0.0));
    }

    #[test]
    fn top_n_truncates_and_zero_is_rejected() {
        let idx = build(&["satu kata", "kata kata", "tiga kata"]);
        let q = query(&idx, "kata");
        assert_eq!(rank(&q, &idx, 2).unwrap().len(), 2);
        assert_eq!(rank(&q, &idx, 99).unwrap().len(), 3);
        assert_eq!(rank(&q, &idx, 0).unwrap_err(), EngineError::InvalidTopN(0));
    }
}
