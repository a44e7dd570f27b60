use crate::engine::RetrievalEngine;
use crate::index::CorpusIndex;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const SNAPSHOT_VERSION: u32 = 1;

/// Header written next to the per-corpus snapshots.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub version: u32,
    pub corpora: Vec<String>,
}

/// File layout of a saved engine: one `<name>.corpus.bin` per corpus plus a
/// `meta.json` header listing them.
pub struct SnapshotPaths {
    pub root: PathBuf,
}

impl SnapshotPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn corpus(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.corpus.bin"))
    }

    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
}

pub fn save_corpus(paths: &SnapshotPaths, index: &CorpusIndex) -> Result<()> {
    create_dir_all(&paths.root)?;
    let file = paths.corpus(&index.name);
    let f = File::create(&file).with_context(|| format!("create {}", file.display()))?;
    bincode::serialize_into(BufWriter::new(f), index)?;
    Ok(())
}

pub fn load_corpus(paths: &SnapshotPaths, name: &str) -> Result<CorpusIndex> {
    let file = paths.corpus(name);
    let f = File::open(&file).with_context(|| format!("open {}", file.display()))?;
    let index = bincode::deserialize_from(BufReader::new(f))?;
    Ok(index)
}

pub fn save_meta(paths: &SnapshotPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    f.write_all(serde_json::to_string_pretty(meta)?.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &SnapshotPaths) -> Result<MetaFile> {
    let f = File::open(paths.meta()).context("snapshot meta.json not found")?;
    let meta: MetaFile = serde_json::from_reader(BufReader::new(f))?;
    Ok(meta)
}

/// Write every loaded corpus of `engine` under `paths.root`.
pub fn save_engine(paths: &SnapshotPaths, engine: &RetrievalEngine) -> Result<()> {
    let mut names = Vec::new();
    for name in engine.corpus_names() {
        // corpus_names comes from the engine's own map; the lookup holds.
        if let Some(index) = engine.corpus(name) {
            save_corpus(paths, index)?;
            names.push(name.to_string());
        }
    }
    save_meta(
        paths,
        &MetaFile {
            version: SNAPSHOT_VERSION,
            corpora: names,
        },
    )
}

/// Restore an engine from a snapshot directory. Every corpus named by the
/// header must load; a torn snapshot is an error, not a partial engine.
pub fn load_engine(paths: &SnapshotPaths) -> Result<RetrievalEngine> {
    let meta = load_meta(paths)?;
    anyhow::ensure!(
        meta.version == SNAPSHOT_VERSION,
        "unsupported snapshot version {}",
        meta.version
    );
    let mut engine = RetrievalEngine::new();
    for name in &meta.corpora {
        let index = load_corpus(paths, name)
            .with_context(|| format!("load snapshot for corpus '{name}'"))?;
        engine.insert_index(index);
    }
    Ok(engine)
}
