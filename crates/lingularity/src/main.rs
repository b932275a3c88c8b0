use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use lingua_corpus::{LoadMode, Metadata};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lingularity::{AppState, DataPaths, SessionOptions, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_REFERENCE_LANGUAGE: &str = "English";
const DEFAULT_MAX_SENTENCES: usize = 50;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("binding to {}:{}", config.host, config.port);
    info!(
        "using data at {} (corpus mode: {:?})",
        config.data_dir.display(),
        config.corpus_mode
    );
    info!("reference language: {}", config.reference_language);
    if config.disable_cache {
        info!("cache headers disabled");
    }

    let start = Instant::now();
    let metadata = Metadata::load(config.data_dir.join("metadata"))?;
    info!(
        "metadata for {} languages loaded in {} ms",
        metadata.languages().len(),
        start.elapsed().as_millis()
    );

    let state = AppState::new(
        DataPaths::from_root(&config.data_dir),
        metadata,
        SessionOptions {
            reference_language: config.reference_language,
            load_mode: config.corpus_mode,
            persist_maps: true,
        },
        config.max_sentences,
        config.disable_cache,
    );

    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid listen address")?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    data_dir: PathBuf,
    corpus_mode: LoadMode,
    reference_language: String,
    max_sentences: usize,
    disable_cache: bool,
}

fn load_config() -> Config {
    let mut disable_cache = false;
    let mut cli_data_dir: Option<PathBuf> = None;
    let mut cli_corpus_mode: Option<LoadMode> = None;
    let mut args = env::args().skip(1).peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-cache" => disable_cache = true,
            "--data-dir" => {
                if let Some(path) = args.next() {
                    cli_data_dir = Some(PathBuf::from(path));
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--data-dir=") {
                    cli_data_dir = Some(PathBuf::from(path));
                } else if let Some(mode) = arg.strip_prefix("--corpus-mode=") {
                    cli_corpus_mode = parse_load_mode(mode);
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let data_dir = cli_data_dir
        .or_else(|| env::var("LINGULARITY_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let corpus_mode = cli_corpus_mode
        .or_else(|| {
            env::var("CORPUS_LOAD_MODE")
                .ok()
                .as_deref()
                .and_then(parse_load_mode)
        })
        .unwrap_or(LoadMode::Mmap);
    let reference_language = env::var("REFERENCE_LANGUAGE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REFERENCE_LANGUAGE.to_string());
    let max_sentences = env::var("MAX_SENTENCES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_MAX_SENTENCES);

    Config {
        host,
        port,
        data_dir,
        corpus_mode,
        reference_language,
        max_sentences,
        disable_cache,
    }
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => None,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .init();
}
