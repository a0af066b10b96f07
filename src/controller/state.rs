use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::api::models::{JobId, TranscriptionMethod};
use crate::controller::events::{ComposedResult, PollSettled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    Idle,
    Polling,
    Completed,
    Failed,
}

/// Cancellable reference to the single scheduled status poll.
///
/// Each handle is stamped with the job it polls and a generation number;
/// settlements that do not carry both are stale.
#[derive(Debug)]
pub struct PollHandle {
    job_id: JobId,
    generation: u64,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub(crate) fn new(job_id: JobId, generation: u64, task: JoinHandle<()>) -> Self {
        Self {
            job_id,
            generation,
            task,
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn owns(&self, settled: &PollSettled) -> bool {
        self.generation == settled.generation && self.job_id == settled.job_id
    }

    /// Consumes the handle; a handle can only ever be cancelled once.
    pub fn cancel(self) {
        self.task.abort();
    }
}

/// The one mutable record of the active job. Owned by the orchestrator.
#[derive(Debug)]
pub struct JobState {
    job_id: Option<JobId>,
    method: Option<TranscriptionMethod>,
    is_processing: bool,
    result: Option<ComposedResult>,
    poll_handle: Option<PollHandle>,
    phase: WorkflowPhase,
    polling_since: Option<Instant>,
    last_status: Option<String>,
}

impl Default for JobState {
    fn default() -> Self {
        Self {
            job_id: None,
            method: None,
            is_processing: false,
            result: None,
            poll_handle: None,
            phase: WorkflowPhase::Idle,
            polling_since: None,
            last_status: None,
        }
    }
}

impl JobState {
    pub fn job_id(&self) -> Option<&JobId> {
        self.job_id.as_ref()
    }

    pub fn method(&self) -> Option<TranscriptionMethod> {
        self.method
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn result(&self) -> Option<&ComposedResult> {
        self.result.as_ref()
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn poll_handle(&self) -> Option<&PollHandle> {
        self.poll_handle.as_ref()
    }

    pub fn has_live_poll(&self) -> bool {
        self.poll_handle.is_some()
    }

    pub fn polling_since(&self) -> Option<Instant> {
        self.polling_since
    }

    /// Starts tracking a freshly submitted job. Any previous poll is cancelled.
    pub fn begin(&mut self, job_id: JobId, method: TranscriptionMethod, now: Instant) {
        self.cancel_poll();
        self.job_id = Some(job_id);
        self.method = Some(method);
        self.is_processing = true;
        self.result = None;
        self.phase = WorkflowPhase::Polling;
        self.polling_since = Some(now);
        self.last_status = None;
    }

    /// Installs the next scheduled poll, cancelling the one it replaces so at
    /// most one handle is ever live.
    pub fn install_poll(&mut self, handle: PollHandle) {
        if let Some(previous) = self.poll_handle.replace(handle) {
            previous.cancel();
        }
    }

    /// Cancels and clears the live poll handle. Returns whether one existed.
    pub fn cancel_poll(&mut self) -> bool {
        match self.poll_handle.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether a settlement belongs to the current job's live poll.
    pub fn accepts(&self, settled: &PollSettled) -> bool {
        self.is_processing
            && self.job_id.as_ref() == Some(&settled.job_id)
            && self
                .poll_handle
                .as_ref()
                .is_some_and(|handle| handle.owns(settled))
    }

    /// Records the status text; returns true when it differs from the last one.
    pub fn note_status(&mut self, status: &str) -> bool {
        if self.last_status.as_deref() == Some(status) {
            return false;
        }
        self.last_status = Some(status.to_owned());
        true
    }

    /// Ends the current job: poll cancelled, identifiers cleared, processing off.
    pub fn finish(&mut self, phase: WorkflowPhase) {
        self.cancel_poll();
        self.job_id = None;
        self.method = None;
        self.is_processing = false;
        self.phase = phase;
        self.polling_since = None;
        self.last_status = None;
    }

    pub fn store_result(&mut self, result: ComposedResult) {
        self.result = Some(result);
    }
}
