//! Where the corpus document comes from.

use std::{future::Future, path::PathBuf, time::Duration};

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Produces the raw corpus document: a JSON array of chapter elements.
pub trait CorpusSource: Send + Sync {
  fn fetch(&self) -> impl Future<Output = Result<Vec<Value>>> + Send + '_;

  /// Human-readable origin, for logs.
  fn describe(&self) -> String;
}

// ─── HTTP ────────────────────────────────────────────────────────────────────

/// Downloads the corpus with a single GET.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpSource {
  client: Client,
  url:    String,
}

impl HttpSource {
  pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, url: url.into() })
  }
}

impl CorpusSource for HttpSource {
  async fn fetch(&self) -> Result<Vec<Value>> {
    let resp = self.client.get(&self.url).send().await?.error_for_status()?;
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
  }

  fn describe(&self) -> String { self.url.clone() }
}

// ─── File ────────────────────────────────────────────────────────────────────

/// Reads a previously downloaded corpus from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
  path: PathBuf,
}

impl FileSource {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
}

impl CorpusSource for FileSource {
  async fn fetch(&self) -> Result<Vec<Value>> {
    let bytes = tokio::fs::read(&self.path)
      .await
      .map_err(|source| Error::Io { path: self.path.clone(), source })?;
    Ok(serde_json::from_slice(&bytes)?)
  }

  fn describe(&self) -> String { self.path.display().to_string() }
}
