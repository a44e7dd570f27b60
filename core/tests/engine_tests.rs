use telusur_core::persist::{load_engine, save_engine, SnapshotPaths};
use telusur_core::{Document, EngineError, RetrievalEngine};

fn doc(title: &str, body: &str) -> Document {
    Document {
        title: title.to_string(),
        body: body.to_string(),
    }
}

fn two_corpus_engine() -> RetrievalEngine {
    let mut engine = RetrievalEngine::new();
    engine
        .load_corpus(
            "etd",
            &[
                doc("Skripsi A", "klasifikasi citra digital metode konvolusi"),
                doc("Skripsi B", "analisis sentimen media sosial"),
            ],
        )
        .unwrap();
    engine
        .load_corpus(
            "kompas",
            &[
                doc("Berita 1", "analisis sentimen"),
                doc("Berita 2", "ekonomi nasional tumbuh"),
            ],
        )
        .unwrap();
    engine
}

#[test]
fn best_corpus_wins_the_global_merge() {
    let engine = two_corpus_engine();
    // Exact lexical match lives in "kompas"; "etd" only overlaps partially.
    let hits = engine.search_all("analisis sentimen", 1).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].corpus, "kompas");
    assert_eq!(hits[0].doc_id, 0);
    assert!((hits[0].score - 1.0).abs() < 1e-6);
}

#[test]
fn merged_page_is_globally_ordered_and_tagged() {
    let engine = two_corpus_engine();
    let hits = engine.search_all("analisis sentimen", 4).unwrap();
    assert_eq!(hits.len(), 4);
    for w in hits.windows(2) {
        assert!(w[0].score >= w[1].score);
    }
    assert!(hits.iter().any(|h| h.corpus == "etd"));
    assert!(hits.iter().any(|h| h.corpus == "kompas"));
    // Metadata travels with the hit.
    assert_eq!(hits[0].title, "Berita 1");
    assert!(hits[0].preview.contains("analisis sentimen"));
}

#[test]
fn empty_corpus_fails_alone_and_search_continues() {
    let mut engine = two_corpus_engine();
    let err = engine.load_corpus("tempo", &[]).unwrap_err();
    assert_eq!(err, EngineError::EmptyCorpus("tempo".into()));

    // The failed corpus contributed nothing; the others still answer.
    let hits = engine.search_all("ekonomi nasional", 5).unwrap();
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|h| h.corpus != "tempo"));
    assert_eq!(engine.statistics().total_docs, 4);
}

#[test]
fn unknown_corpus_is_a_search_error() {
    let engine = two_corpus_engine();
    let err = engine.search_single("ekonomi", "mojok", 5).unwrap_err();
    assert_eq!(err, EngineError::UnknownCorpus("mojok".into()));
}

#[test]
fn reload_replaces_a_corpus_wholesale() {
    let mut engine = two_corpus_engine();
    engine
        .load_corpus("kompas", &[doc("Berita 3", "teknologi pangan")])
        .unwrap();
    let stats = engine.statistics();
    assert_eq!(stats.corpora["kompas"], 1);

    let hits = engine.search_single("teknologi pangan", "kompas", 5).unwrap();
    assert_eq!(hits.len(), 1);
    assert!((hits[0].score - 1.0).abs() < 1e-6);
}

#[test]
fn snapshot_round_trip_ranks_identically() {
    let engine = two_corpus_engine();
    let dir = tempfile::tempdir().unwrap();
    let paths = SnapshotPaths::new(dir.path());
    save_engine(&paths, &engine).unwrap();

    let restored = load_engine(&paths).unwrap();
    assert_eq!(
        restored.statistics().total_docs,
        engine.statistics().total_docs
    );

    let before = engine.search_all("analisis sentimen ekonomi", 4).unwrap();
    let after = restored.search_all("analisis sentimen ekonomi", 4).unwrap();
    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(&after) {
        assert_eq!((b.corpus.as_str(), b.doc_id), (a.corpus.as_str(), a.doc_id));
        assert_eq!(b.score, a.score);
    }
}
