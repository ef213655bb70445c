//! On-demand imports as an observable background job.
//!
//! A job moves `Idle → Running → Succeeded | Failed`. Only one run may be in
//! flight; a finished job can be started again. Runs cannot be cancelled.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use hifz_core::store::MemorizationStore;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  importer::{ImportMode, ImportReport, Importer},
  source::CorpusSource,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, strum::Display)]
#[serde(tag = "state", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobState {
  Idle,
  Running,
  Succeeded { report: ImportReport },
  Failed { error: String },
}

/// Point-in-time view of the job, as returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSnapshot {
  /// Id of the most recent run; `None` while idle.
  pub job_id:      Option<Uuid>,
  #[serde(flatten)]
  pub state:       JobState,
  pub started_at:  Option<DateTime<Utc>>,
  pub finished_at: Option<DateTime<Utc>>,
}

impl JobSnapshot {
  fn idle() -> Self {
    Self { job_id: None, state: JobState::Idle, started_at: None, finished_at: None }
  }

  pub fn is_running(&self) -> bool { self.state == JobState::Running }
}

/// Returned by [`ImportJob::start`]. Dropping it detaches the run.
pub struct JobHandle {
  pub snapshot: JobSnapshot,
  task:         JoinHandle<()>,
}

impl JobHandle {
  /// Wait for the background run to finish.
  pub async fn finished(self) {
    if let Err(e) = self.task.await {
      error!(error = %e, "import task panicked");
    }
  }
}

pub struct ImportJob<S, C> {
  importer: Arc<Importer<S, C>>,
  status:   Arc<Mutex<JobSnapshot>>,
}

impl<S, C> Clone for ImportJob<S, C> {
  fn clone(&self) -> Self {
    Self { importer: self.importer.clone(), status: self.status.clone() }
  }
}

impl<S, C> ImportJob<S, C>
where
  S: MemorizationStore + 'static,
  C: CorpusSource + 'static,
{
  pub fn new(importer: Importer<S, C>) -> Self {
    Self {
      importer: Arc::new(importer),
      status:   Arc::new(Mutex::new(JobSnapshot::idle())),
    }
  }

  pub fn snapshot(&self) -> JobSnapshot { self.lock().clone() }

  /// Mark the job running and spawn the import on the tokio runtime.
  ///
  /// Fails with [`Error::AlreadyRunning`] if a previous run has not finished.
  pub fn start(&self, mode: ImportMode) -> Result<JobHandle> {
    let job_id = Uuid::new_v4();
    let snapshot = {
      let mut status = self.lock();
      if status.is_running() {
        return Err(Error::AlreadyRunning(status.job_id.unwrap_or(job_id)));
      }
      *status = JobSnapshot {
        job_id:      Some(job_id),
        state:       JobState::Running,
        started_at:  Some(Utc::now()),
        finished_at: None,
      };
      status.clone()
    };
    info!(%job_id, ?mode, "import started");

    let importer = self.importer.clone();
    let status = self.status.clone();
    let task = tokio::spawn(async move {
      let state = match importer.run(mode).await {
        Ok(report) => JobState::Succeeded { report },
        Err(e) => {
          error!(%job_id, error = %e, "import failed");
          JobState::Failed { error: e.to_string() }
        }
      };
      let mut guard = status.lock().unwrap_or_else(PoisonError::into_inner);
      info!(%job_id, state = %state, "import finished");
      guard.state = state;
      guard.finished_at = Some(Utc::now());
    });

    Ok(JobHandle { snapshot, task })
  }

  fn lock(&self) -> MutexGuard<'_, JobSnapshot> {
    self.status.lock().unwrap_or_else(PoisonError::into_inner)
  }
}
