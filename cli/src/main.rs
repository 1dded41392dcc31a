use anyhow::Result;
use clap::{Parser, Subcommand};
use qgram_core::{load_from_path, CandidateFilter, EngineConfig, QGramIndex, SearchHit};
use tracing_subscriber::{fmt, EnvFilter};

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qgram")]
#[command(about = "Typo-tolerant prefix search over a tab-separated entity list", long_about = None)]
struct Cli {
    /// Corpus file, one `name<TAB>score` record per line
    #[arg(long, env = "QGRAM_CORPUS")]
    corpus: PathBuf,
    /// q-gram length
    #[arg(long, env = "QGRAM_Q", default_value_t = 3)]
    q: usize,
    /// Candidate filter: loose (count >= threshold) or pigeonhole
    #[arg(long, env = "QGRAM_FILTER", default_value_t = CandidateFilter::Loose)]
    filter: CandidateFilter,
    /// Fail instead of skipping malformed corpus lines
    #[arg(long, default_value_t = false)]
    strict: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print its size
    Stats,
    /// Run a single query
    Search {
        query: String,
        /// Number of hits to print
        #[arg(long, default_value_t = 5)]
        limit: usize,
        /// Print hits as a JSON array
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Read queries from stdin until EOF or `:q`
    Repl {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let config = EngineConfig { q: cli.q, filter: cli.filter };

    let started = Instant::now();
    let (index, skipped) = load_index(&cli.corpus, config, cli.strict)?;
    tracing::info!(entities = index.len(), skipped, took_ms = started.elapsed().as_millis() as u64, "index ready");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Stats => {
            writeln!(out, "entities\t{}", index.len())?;
            writeln!(out, "qgrams\t{}", index.num_qgrams())?;
            writeln!(out, "skipped\t{skipped}")?;
        }
        Commands::Search { query, limit, json } => {
            let hits = index.search(&query);
            write_hits(&mut out, &hits, limit, json)?;
        }
        Commands::Repl { limit } => {
            let stdin = io::stdin();
            repl(&index, stdin.lock(), &mut out, limit)?;
        }
    }
    Ok(())
}

/// Returns the index and the number of skipped lines.
fn load_index(path: &Path, config: EngineConfig, strict: bool) -> Result<(QGramIndex, usize)> {
    let loaded = load_from_path(path, config)?;
    if strict {
        return Ok((loaded.strict()?, 0));
    }
    let skipped = loaded.skipped.len();
    if skipped > 0 {
        tracing::warn!(skipped, "some corpus lines were skipped");
    }
    Ok((loaded.index, skipped))
}

fn write_hits<W: Write>(out: &mut W, hits: &[SearchHit<'_>], limit: usize, json: bool) -> Result<()> {
    let shown = &hits[..hits.len().min(limit)];
    if json {
        serde_json::to_writer_pretty(&mut *out, shown)?;
        writeln!(out)?;
        return Ok(());
    }
    for hit in shown {
        writeln!(out, "{}\t{}\tped={}", hit.name, hit.score, hit.ped)?;
    }
    Ok(())
}

fn repl<R: BufRead, W: Write>(index: &QGramIndex, input: R, out: &mut W, limit: usize) -> Result<()> {
    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let query = line.trim();
        if query == ":q" {
            break;
        }
        if query.is_empty() {
            continue;
        }
        let start = Instant::now();
        let hits = index.search(query);
        let elapsed = start.elapsed();
        write_hits(out, &hits, limit, false)?;
        writeln!(out, "({} of {} hits, {:.3} ms)", hits.len().min(limit), hits.len(), elapsed.as_secs_f64() * 1e3)?;
    }
    writeln!(out)?;
    Ok(())
}
