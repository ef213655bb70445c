//! Handlers for `/populate-database`.
//!
//! `POST` starts a forced import in the background and answers `202` at once;
//! `GET` reports how the latest run went.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use hifz_core::store::MemorizationStore;
use hifz_import::{CorpusSource, ImportMode, JobSnapshot};
use serde::Serialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct ImportAccepted {
  pub message: String,
  pub job:     JobSnapshot,
}

#[derive(Debug, Serialize)]
pub struct ImportStatus {
  pub job: JobSnapshot,
}

/// `POST /populate-database`
///
/// Does not check whether the store is already populated; `409` if a run is
/// still in flight.
pub async fn trigger<S, C>(
  State(state): State<ApiState<S, C>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MemorizationStore + 'static,
  C: CorpusSource + 'static,
{
  let handle = state.import.start(ImportMode::Force)?;
  let body = ImportAccepted {
    message: "import started; poll GET /api/populate-database for its outcome".into(),
    job:     handle.snapshot.clone(),
  };
  // The run continues detached.
  drop(handle);
  Ok((StatusCode::ACCEPTED, Json(body)))
}

/// `GET /populate-database`
pub async fn status<S, C>(State(state): State<ApiState<S, C>>) -> Json<ImportStatus>
where
  S: MemorizationStore + 'static,
  C: CorpusSource + 'static,
{
  Json(ImportStatus { job: state.import.snapshot() })
}
