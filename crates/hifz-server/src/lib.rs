//! HTTP server assembly for Hifz.
//!
//! Mounts the JSON API under `/api`, serves the static frontend at `/`, and
//! provides the standalone setup routine used by `hifz setup`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use hifz_api::{ApiState, api_router};
use hifz_core::{roster::Roster, store::MemorizationStore};
use hifz_import::{CorpusSource, DEFAULT_CORPUS_URL, ImportMode, ImportReport, Importer};
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration: built-in defaults, then the optional TOML file,
/// then `HIFZ_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  /// Directory served at `/` (the frontend).
  pub static_dir:         PathBuf,
  pub corpus_url:         String,
  pub fetch_timeout_secs: u64,
  /// Recognized users; the three built-in names when unset.
  #[serde(default)]
  pub users:              Roster,
}

impl ServerConfig {
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 3000)?
      .set_default("store_path", "hub_coran.db")?
      .set_default("static_dir", "public")?
      .set_default("corpus_url", DEFAULT_CORPUS_URL)?
      .set_default("fetch_timeout_secs", 120)?
      .add_source(config::File::from(file).required(false))
      .add_source(
        config::Environment::with_prefix("HIFZ")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("users"),
      )
      .build()
      .context("failed to read configuration")?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.static_dir = expand_tilde(&cfg.static_dir);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API under `/api`, everything else from `static_dir`.
pub fn router<S, C>(state: ApiState<S, C>, static_dir: &Path) -> Router
where
  S: MemorizationStore + 'static,
  C: CorpusSource + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .fallback_service(ServeDir::new(static_dir))
    .layer(TraceLayer::new_for_http())
}

// ─── Setup ────────────────────────────────────────────────────────────────────

/// The standalone import: skipped entirely when any surah is already stored.
pub async fn setup<S, C>(store: Arc<S>, source: C) -> hifz_import::Result<ImportReport>
where
  S: MemorizationStore,
  C: CorpusSource,
{
  Importer::new(store, source).run(ImportMode::SkipIfPopulated).await
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use hifz_import::{FileSource, ImportJob};
  use hifz_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  const CORPUS: &str = r#"[
    {"surah_number": 1, "surah_name": "Al-Fatiha", "revelation_place": "Meccan",
     "verses": [{"verse_number": 1, "verse_text": "a"}, {"verse_number": 2, "verse_text": "b"}]},
    null,
    {"surah_number": 2, "revelation_place": "Medinan", "verses": []}
  ]"#;

  fn corpus_file() -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(CORPUS.as_bytes()).unwrap();
    f
  }

  #[tokio::test]
  async fn setup_imports_once_then_skips() {
    let dir = tempfile::tempdir().unwrap();
    let file = corpus_file();
    let store = Arc::new(SqliteStore::open(dir.path().join("hifz.db")).await.unwrap());

    let first = setup(store.clone(), FileSource::new(file.path())).await.unwrap();
    assert_eq!(first.surahs_inserted, 1);
    assert_eq!(first.ayahs_inserted, 2);
    assert_eq!(first.chapters_skipped, 2);

    let second = setup(store.clone(), FileSource::new(file.path())).await.unwrap();
    assert!(second.skipped_populated);
    assert_eq!(store.count_surahs().await.unwrap(), 1);
    assert_eq!(store.count_ayahs(1).await.unwrap(), 2);
  }

  #[tokio::test]
  async fn router_serves_api_and_static_assets() {
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<h1>hifz</h1>").unwrap();
    let file = corpus_file();

    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    setup(store.clone(), FileSource::new(file.path())).await.unwrap();
    let state = ApiState {
      store:  store.clone(),
      roster: Arc::new(Roster::default()),
      import: ImportJob::new(Importer::new(store, FileSource::new(file.path()))),
    };
    let app = router(state, static_dir.path());

    let resp = app
      .clone()
      .oneshot(Request::get("/api/surahs").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["surahs"][0]["name"], "Al-Fatiha");

    let resp = app
      .clone()
      .oneshot(Request::get("/").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>hifz</h1>");

    let resp = app
      .oneshot(Request::get("/missing.js").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn config_defaults_apply_without_a_file() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/hifz.toml")).unwrap();
    assert_eq!(cfg.port, 3000);
    assert_eq!(cfg.store_path, PathBuf::from("hub_coran.db"));
    assert_eq!(cfg.users, Roster::default());
    assert_eq!(cfg.corpus_url, DEFAULT_CORPUS_URL);
  }

  #[test]
  fn config_file_overrides_defaults() {
    let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(f, "port = 8080\nusers = [\"Amina\", \"Yusuf\"]\nstatic_dir = \"web\"").unwrap();

    let cfg = ServerConfig::load(f.path()).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.users.users(), &["Amina", "Yusuf"]);
    assert_eq!(cfg.static_dir, PathBuf::from("web"));
    assert_eq!(cfg.address(), "127.0.0.1:8080");
  }
}
