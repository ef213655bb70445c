//! `hifz` server binary.
//!
//! Reads `hifz.toml` (or the path given with `--config`) plus `HIFZ_*`
//! environment variables, opens the SQLite store, and either serves the API
//! or runs the one-time corpus import.
//!
//! ```text
//! hifz                      # serve on 127.0.0.1:3000
//! hifz setup                # create the schema and import the corpus once
//! hifz setup --file q.json  # import from a local copy of the corpus
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use hifz_api::ApiState;
use hifz_import::{FileSource, HttpSource, ImportJob, Importer};
use hifz_server::ServerConfig;
use hifz_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Hifz memorization tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "hifz.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the JSON API and the static frontend (the default).
  Serve,
  /// Create the schema and import the corpus unless the store already has data.
  Setup {
    /// Read the corpus from this file instead of downloading it.
    #[arg(long)]
    file: Option<PathBuf>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = ServerConfig::load(&cli.config)?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  tracing::info!(path = ?cfg.store_path, "store opened");
  let store = Arc::new(store);

  let result = match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(&cfg, store.clone()).await,
    Command::Setup { file } => setup(&cfg, store.clone(), file).await,
  };

  // Background imports may still hold clones; closing here ends them too.
  SqliteStore::clone(&store)
    .close()
    .await
    .context("failed to close store")?;
  tracing::info!("store closed");

  result
}

async fn serve(cfg: &ServerConfig, store: Arc<SqliteStore>) -> anyhow::Result<()> {
  let source = HttpSource::new(&cfg.corpus_url, Duration::from_secs(cfg.fetch_timeout_secs))
    .context("failed to build HTTP client")?;

  let state = ApiState {
    store:  store.clone(),
    roster: Arc::new(cfg.users.clone()),
    import: ImportJob::new(Importer::new(store, source)),
  };
  let app = hifz_server::router(state, &cfg.static_dir);

  let address = cfg.address();
  tracing::info!(users = ?cfg.users.users(), "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn setup(
  cfg:   &ServerConfig,
  store: Arc<SqliteStore>,
  file:  Option<PathBuf>,
) -> anyhow::Result<()> {
  let result = match file {
    Some(path) => hifz_server::setup(store, FileSource::new(path)).await,
    None => {
      let source =
        HttpSource::new(&cfg.corpus_url, Duration::from_secs(cfg.fetch_timeout_secs))
          .context("failed to build HTTP client")?;
      hifz_server::setup(store, source).await
    }
  };

  match result {
    Ok(report) if report.skipped_populated => {
      tracing::info!("store already populated; nothing to do");
      Ok(())
    }
    Ok(report) => {
      tracing::info!(
        surahs = report.surahs_inserted,
        ayahs = report.ayahs_inserted,
        "setup complete"
      );
      Ok(())
    }
    Err(e) => {
      tracing::error!(error = %e, "import aborted");
      Err(e).context("setup failed")
    }
  }
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}
