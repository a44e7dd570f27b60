use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use telusur_core::persist::{load_engine, save_engine, SnapshotPaths};
use telusur_core::{Document, RetrievalEngine, ScoredHit};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "telusur")]
#[command(about = "Interactive multi-corpus vector-space search", long_about = None)]
struct Cli {
    /// Directory with one .json/.jsonl document file per corpus
    #[arg(long, default_value = "./dataset")]
    data: PathBuf,
    /// Snapshot directory; when it holds a saved engine it is loaded instead
    /// of re-indexing, and (re)written after every indexing run
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Default number of results per search
    #[arg(long, default_value_t = 5)]
    top_n: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let mut engine = RetrievalEngine::new();
    if let Some(dir) = &cli.snapshot {
        if dir.join("meta.json").exists() {
            engine = load_engine(&SnapshotPaths::new(dir))?;
            tracing::info!(snapshot = %dir.display(), "engine restored from snapshot");
        }
    }

    run_menu(&cli, &mut engine, &mut io::stdin().lock())
}

fn run_menu(cli: &Cli, engine: &mut RetrievalEngine, input: &mut impl BufRead) -> Result<()> {
    loop {
        println!();
        println!("==================== TELUSUR ====================");
        println!("[1] Load & index corpora");
        println!("[2] Search all corpora");
        println!("[3] Search one corpus");
        println!("[4] Corpus statistics");
        println!("[5] Exit");
        // End of input terminates the session like an explicit exit.
        let Some(choice) = prompt(input, "Select option [1-5]: ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => {
                // A bad data directory is a per-run mishap, not a reason to
                // leave the menu.
                if let Err(e) = load_corpora(&cli.data, engine) {
                    println!("Load failed: {e}");
                    continue;
                }
                if let Some(dir) = &cli.snapshot {
                    save_engine(&SnapshotPaths::new(dir), engine)?;
                    tracing::info!(snapshot = %dir.display(), "snapshot written");
                }
            }
            "2" => {
                if require_loaded(engine) {
                    let Some(query) = prompt(input, "Query: ")? else {
                        return Ok(());
                    };
                    if query.is_empty() {
                        println!("Query cannot be empty.");
                        continue;
                    }
                    let Some(top_n) = prompt_top_n(input, cli.top_n)? else {
                        return Ok(());
                    };
                    match engine.search_all(&query, top_n) {
                        Ok(hits) => display(&hits),
                        Err(e) => println!("Search failed: {e}"),
                    }
                }
            }
            "3" => {
                if require_loaded(engine) {
                    let names: Vec<String> =
                        engine.corpus_names().map(str::to_string).collect();
                    println!("Available corpora:");
                    for (i, name) in names.iter().enumerate() {
                        println!("[{}] {name}", i + 1);
                    }
                    let Some(picked) = prompt(input, "Select corpus: ")? else {
                        return Ok(());
                    };
                    let Some(name) = picked
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| i.checked_sub(1))
                        .and_then(|i| names.get(i))
                    else {
                        println!("Invalid choice.");
                        continue;
                    };
                    let Some(query) = prompt(input, "Query: ")? else {
                        return Ok(());
                    };
                    if query.is_empty() {
                        println!("Query cannot be empty.");
                        continue;
                    }
                    let Some(top_n) = prompt_top_n(input, cli.top_n)? else {
                        return Ok(());
                    };
                    match engine.search_single(&query, name, top_n) {
                        Ok(hits) => display(&hits),
                        Err(e) => println!("Search failed: {e}"),
                    }
                }
            }
            "4" => show_statistics(engine),
            "5" => return Ok(()),
            _ => println!("Invalid option, select 1-5."),
        }
    }
}

/// Discover corpus files under `data` and (re)index each one. A corpus that
/// fails to load or build is reported and skipped; the rest stay available.
fn load_corpora(data: &Path, engine: &mut RetrievalEngine) -> Result<()> {
    let mut files: Vec<PathBuf> = WalkDir::new(data)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| {
            p.is_file()
                && matches!(
                    p.extension().and_then(|s| s.to_str()),
                    Some("json") | Some("jsonl")
                )
        })
        .collect();
    files.sort();
    anyhow::ensure!(
        !files.is_empty(),
        "no .json/.jsonl corpus files under {}",
        data.display()
    );

    let mut loaded = 0usize;
    for file in &files {
        let name = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("corpus")
            .to_string();
        let result = read_documents(file).and_then(|docs| {
            engine
                .load_corpus(&name, &docs)
                .map_err(anyhow::Error::from)
        });
        match result {
            Ok(()) => loaded += 1,
            Err(e) => tracing::warn!(corpus = %name, error = %e, "skipping corpus"),
        }
    }
    let stats = engine.statistics();
    println!(
        "Indexed {loaded}/{} corpora, {} documents total.",
        files.len(),
        stats.total_docs
    );
    Ok(())
}

/// Read one corpus file: JSONL (one document per line) or a JSON array.
fn read_documents(file: &Path) -> Result<Vec<Document>> {
    let f = File::open(file).with_context(|| format!("open {}", file.display()))?;
    let reader = BufReader::new(f);
    if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        let mut docs = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            docs.push(serde_json::from_str(&line)?);
        }
        Ok(docs)
    } else {
        let docs: Vec<Document> = serde_json::from_reader(reader)
            .with_context(|| format!("parse {}", file.display()))?;
        Ok(docs)
    }
}

fn require_loaded(engine: &RetrievalEngine) -> bool {
    if engine.is_empty() {
        println!("No corpora loaded. Run option [1] first.");
        return false;
    }
    true
}

fn show_statistics(engine: &RetrievalEngine) {
    let stats = engine.statistics();
    if stats.corpora.is_empty() {
        println!("No corpora loaded. Run option [1] first.");
        return;
    }
    println!("-------------------------------------------------");
    for (name, count) in &stats.corpora {
        println!("{name:<30} {count:>6} documents");
    }
    println!("-------------------------------------------------");
    println!("Total: {} documents in {} corpora", stats.total_docs, stats.corpora.len());
}

/// Print ranked hits. Zero-score entries mean no lexical overlap; they are
/// not worth showing, matching the original system's result listing.
fn display(hits: &[ScoredHit]) {
    let relevant: Vec<&ScoredHit> = hits.iter().filter(|h| h.score > 0.0).collect();
    if relevant.is_empty() {
        println!("No results found.");
        return;
    }
    println!("Found {} relevant documents:", relevant.len());
    for (i, hit) in relevant.iter().enumerate() {
        println!("-------------------------------------------------");
        println!("Rank #{}", i + 1);
        println!("Corpus:   {}", hit.corpus);
        println!("Document: {} {}", hit.doc_id, hit.title);
        println!("Score:    {:.4}", hit.score);
        println!("Preview:  {}", hit.preview);
    }
}

/// Read one trimmed line. `None` means the input is exhausted; interactive
/// callers must treat that as "exit", not as an answer.
fn prompt(input: &mut impl BufRead, text: &str) -> Result<Option<String>> {
    print!("{text}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt_top_n(input: &mut impl BufRead, default: usize) -> Result<Option<usize>> {
    let Some(raw) = prompt(input, &format!("Number of results [{default}]: "))? else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(Some(default));
    }
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => {
            println!("Not a positive number, using {default}.");
            Ok(Some(default))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn args(data: &str) -> Cli {
        Cli {
            data: PathBuf::from(data),
            snapshot: None,
            top_n: 5,
        }
    }

    #[test]
    fn prompt_signals_exhausted_input() {
        let mut input = Cursor::new("");
        assert_eq!(prompt(&mut input, "> ").unwrap(), None);

        let mut input = Cursor::new("  hello \n");
        assert_eq!(prompt(&mut input, "> ").unwrap(), Some("hello".to_string()));
        // The line is consumed; the next read hits end of input.
        assert_eq!(prompt(&mut input, "> ").unwrap(), None);
    }

    #[test]
    fn menu_terminates_when_input_ends() {
        let mut engine = RetrievalEngine::new();

        let mut input = Cursor::new("");
        run_menu(&args("./no-such-dir"), &mut engine, &mut input).unwrap();

        // Invalid selections followed by end of input must terminate too,
        // not spin on the banner.
        let mut input = Cursor::new("9\n0\nx\n");
        run_menu(&args("./no-such-dir"), &mut engine, &mut input).unwrap();
    }

    #[test]
    fn menu_terminates_when_input_ends_mid_search() {
        let mut engine = RetrievalEngine::new();
        engine
            .load_corpus(
                "berita",
                &[Document {
                    title: String::new(),
                    body: "ekonomi nasional".into(),
                }],
            )
            .unwrap();

        // Option 2 selected, then the input ends before a query arrives.
        let mut input = Cursor::new("2\n");
        run_menu(&args("./no-such-dir"), &mut engine, &mut input).unwrap();
    }

    #[test]
    fn failed_load_returns_to_the_menu() {
        let mut engine = RetrievalEngine::new();
        let mut input = Cursor::new("1\n5\n");
        run_menu(&args("./no-such-dir"), &mut engine, &mut input).unwrap();
        assert!(engine.is_empty());
    }

    #[test]
    fn prompt_top_n_defaults_and_bounds() {
        let mut input = Cursor::new("\n0\n7\n");
        assert_eq!(prompt_top_n(&mut input, 5).unwrap(), Some(5));
        assert_eq!(prompt_top_n(&mut input, 5).unwrap(), Some(5));
        assert_eq!(prompt_top_n(&mut input, 5).unwrap(), Some(7));
        assert_eq!(prompt_top_n(&mut input, 5).unwrap(), None);
    }
}
