use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HubApiError, Result};
use crate::models::entity::{Entity, Materialize};

// ---------------------------------------------------------------------------
// Task status & progress
// ---------------------------------------------------------------------------

/// Server-side status of an asynchronous task.
///
/// `Running` is the initial state of any freshly created task-backed entity.
/// `Finished`, `Error` and `Skipped` are terminal: within one polling session
/// no transition out of them is expected (the server remains the source of
/// truth across sessions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Running,
    Finished,
    Error,
    Skipped,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Finished => "finished",
            TaskStatus::Error => "error",
            TaskStatus::Skipped => "skipped",
        }
    }
}

/// Progress of an asynchronous task. On the wire the status is carried under
/// the `state` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgress {
    #[serde(rename = "state")]
    pub status: TaskStatus,
    #[serde(default)]
    pub current: u64,
    #[serde(default)]
    pub total: u64,
    /// Non-null only when `status` is `Error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Materialize for TaskProgress {
    const WIRE_NAME: &'static str = "task progress";
}

// ---------------------------------------------------------------------------
// Task-backed entities
// ---------------------------------------------------------------------------

/// An entity whose server-side creation triggers asynchronous work
/// (evaluation runs, scans, knowledge-base ingestion).
///
/// Such an entity is stale immediately after creation: fields the server
/// fills in asynchronously (metrics, grade, topics) cannot be trusted until
/// at least one [`refresh`](TaskBacked::refresh).
pub trait TaskBacked: Entity {
    /// Cached progress, if the server has reported any.
    fn progress(&self) -> Option<&TaskProgress>;

    /// Fetch the entity's own resource and overwrite every public field of
    /// `self` in place from the fresh copy. Requires an attached client and a
    /// known id; fails with [`HubApiError::DetachedEntity`] otherwise, before
    /// any network call.
    fn refresh(&mut self) -> Result<()>;

    /// Pure predicate over the cached progress; never performs I/O.
    fn is_running(&self) -> bool {
        matches!(self.progress().map(|p| p.status), Some(TaskStatus::Running))
    }

    /// Pure predicate over the cached progress; never performs I/O.
    fn is_finished(&self) -> bool {
        matches!(self.progress().map(|p| p.status), Some(TaskStatus::Finished))
    }

    /// Pure predicate over the cached progress; never performs I/O.
    fn is_errored(&self) -> bool {
        matches!(self.progress().map(|p| p.status), Some(TaskStatus::Error))
    }

    /// Block until the task reaches a terminal state or the deadline fires.
    ///
    /// If the cached state is still `Running`, an immediate refresh is issued
    /// first so a just-finished task is seen without waiting a full interval.
    /// The loop then sleeps `poll_interval` between refreshes while the
    /// wall-clock elapsed time stays below `timeout`. A transport error
    /// during a refresh propagates immediately and terminates the wait.
    ///
    /// Exit classification, in order:
    /// - `Finished` -> `Ok(())`
    /// - `Error` -> [`HubApiError::TaskFailed`] carrying the server's message
    /// - still `Running` at the deadline -> [`HubApiError::TaskTimeout`]
    /// - anything else (skipped, no progress) -> [`HubApiError::TaskAborted`]
    fn wait_for_completion(&mut self, timeout: Duration, poll_interval: Duration) -> Result<()> {
        let started = Instant::now();

        if self.is_running() {
            self.refresh()?;
        }

        while started.elapsed() < timeout && self.is_running() {
            debug!(
                kind = self.kind_name(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "task still running, polling again"
            );
            std::thread::sleep(poll_interval);
            self.refresh()?;
        }

        if self.is_finished() {
            return Ok(());
        }

        if self.is_errored() {
            let message = self
                .progress()
                .and_then(|p| p.error.clone())
                .unwrap_or_else(|| "task ended in error state".to_string());
            return Err(HubApiError::TaskFailed {
                kind: self.kind_name(),
                message,
            });
        }

        if self.is_running() {
            return Err(HubApiError::TaskTimeout {
                kind: self.kind_name(),
                timeout: timeout.as_secs_f64(),
            });
        }

        let state = self
            .progress()
            .map(|p| p.status.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Err(HubApiError::TaskAborted {
            kind: self.kind_name(),
            state,
        })
    }
}
