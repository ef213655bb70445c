//! JSON REST API for Hifz.
//!
//! Exposes an axum [`Router`] backed by any
//! [`hifz_core::store::MemorizationStore`]. Static assets, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", hifz_api::api_router(state))
//! ```

pub mod error;
pub mod import;
pub mod notes;
pub mod progress;
pub mod surahs;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use hifz_core::{roster::Roster, store::MemorizationStore};
use hifz_import::{CorpusSource, ImportJob};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all API handlers.
pub struct ApiState<S, C> {
  pub store:  Arc<S>,
  pub roster: Arc<Roster>,
  pub import: ImportJob<S, C>,
}

impl<S, C> Clone for ApiState<S, C> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      roster: self.roster.clone(),
      import: self.import.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, C>(state: ApiState<S, C>) -> Router<()>
where
  S: MemorizationStore + 'static,
  C: CorpusSource + 'static,
{
  Router::new()
    // Chapters
    .route("/surahs", get(surahs::list::<S, C>))
    .route("/surah/{id}/progress", get(surahs::progress::<S, C>))
    .route("/surah/{id}/verses", get(surahs::verses::<S, C>))
    // Progress
    .route("/progress", post(progress::set::<S, C>))
    // Notes
    .route("/ayah/{id}/notes", get(notes::list::<S, C>))
    .route("/notes", post(notes::create::<S, C>))
    // Import
    .route(
      "/populate-database",
      get(import::status::<S, C>).post(import::trigger::<S, C>),
    )
    .with_state(state)
}

/// Path ids that are not integers match no row.
pub(crate) fn row_id(raw: &str) -> Option<i64> { raw.parse().ok() }

// ─── Integration tests ────────────────────────────────────────────────────────
