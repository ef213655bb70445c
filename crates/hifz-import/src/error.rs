//! Error type for `hifz-import`.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("download failed: {0}")]
  Fetch(#[from] reqwest::Error),

  #[error("reading {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("corpus is not a JSON array of chapters: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("import {0} is already running")]
  AlreadyRunning(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
