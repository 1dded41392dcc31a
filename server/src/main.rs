use anyhow::Result;
use axum::Router;
use clap::Parser;
use qgram_core::{CandidateFilter, EngineConfig};
use qgram_server::{build_app, load_index, AppOptions};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Corpus file, one `name<TAB>score` record per line
    #[arg(long, env = "QGRAM_CORPUS")]
    corpus: PathBuf,
    /// Host to bind
    #[arg(long, env = "QGRAM_HOST", default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, env = "QGRAM_PORT", default_value_t = 8080)]
    port: u16,
    /// q-gram length
    #[arg(long, env = "QGRAM_Q", default_value_t = 3)]
    q: usize,
    /// Candidate filter: loose or pigeonhole
    #[arg(long, env = "QGRAM_FILTER", default_value_t = CandidateFilter::Loose)]
    filter: CandidateFilter,
    /// Refuse to start if any corpus line is malformed
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Directory with a static front end to serve alongside the API
    #[arg(long, env = "QGRAM_STATIC_DIR")]
    static_dir: Option<PathBuf>,
    /// Comma-separated origins allowed to call the API (default: any)
    #[arg(long, env = "CORS_ALLOW_ORIGIN")]
    cors_allow_origin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = EngineConfig { q: args.q, filter: args.filter };
    let index = Arc::new(load_index(&args.corpus, config, args.strict)?);
    tracing::info!(entities = index.len(), qgrams = index.num_qgrams(), "index loaded");
    let app: Router = build_app(index, AppOptions { static_dir: args.static_dir, cors_allow_origin: args.cors_allow_origin });

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
