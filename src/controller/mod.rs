pub mod composer;
pub mod events;
pub mod poller;
pub mod state;
pub mod submitter;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::client::TranscriberApi;
use crate::api::models::{JobId, JobRequest, TranscriptionResult};
use crate::config::AppConfig;
use crate::controller::composer::{ResultComposer, TranscriptView};
use crate::controller::events::{ComposedResult, PollSettled, SinkUpdate, Sinks, WorkflowOutcome};
use crate::controller::poller::{PollStep, StatusPoller};
use crate::controller::state::{JobState, WorkflowPhase};
use crate::controller::submitter::{JobSubmitter, UrlValidator};
use crate::error::{AppResult, Priority, WorkflowError};

pub const TRANSCRIPTION_STARTED: &str = "Transcription started";
pub const TRANSCRIPTION_COMPLETE: &str = "Transcription complete";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorSettings {
    pub poll_interval: Duration,
    pub max_wait: Option<Duration>,
    pub summaries_enabled: bool,
    pub accepted_hosts: Vec<String>,
}

impl OrchestratorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            poll_interval: config.polling.interval(),
            max_wait: config.polling.max_wait(),
            summaries_enabled: config.summaries.enabled,
            accepted_hosts: config.validation.accepted_hosts.clone(),
        }
    }
}

/// Requests cancellation of the job being polled. Requests made once the
/// transcript is in do not interrupt the summary stage.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    requested: Arc<Notify>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.requested.notify_one();
    }
}

/// Drives one job at a time through submit, poll and compose.
///
/// The orchestrator is the only writer of [`JobState`]. Polls run as spawned
/// one-shot tasks and report back over a channel; the next poll is scheduled
/// only once the previous one has been handled here.
pub struct Orchestrator {
    state: JobState,
    submitter: JobSubmitter,
    poller: StatusPoller,
    composer: ResultComposer,
    sinks: Sinks,
    summaries_enabled: bool,
    settled_rx: UnboundedReceiver<PollSettled>,
    cancel_requested: Arc<Notify>,
    generation: u64,
}

impl Orchestrator {
    pub fn new(
        api: Arc<dyn TranscriberApi>,
        sinks: Sinks,
        settings: OrchestratorSettings,
    ) -> AppResult<Self> {
        let validator = UrlValidator::new(&settings.accepted_hosts)?;
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();

        Ok(Self {
            state: JobState::default(),
            submitter: JobSubmitter::new(api.clone(), validator),
            poller: StatusPoller::new(
                api.clone(),
                settings.poll_interval,
                settings.max_wait,
                settled_tx,
            ),
            composer: ResultComposer::new(
                api,
                sinks.key_summary.clone(),
                sinks.curator_summary.clone(),
            ),
            sinks,
            summaries_enabled: settings.summaries_enabled,
            settled_rx,
            cancel_requested: Arc::new(Notify::new()),
            generation: 0,
        })
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            requested: self.cancel_requested.clone(),
        }
    }

    /// Submits a new job. A job that is still being polled is abandoned first.
    pub async fn submit(&mut self, request: JobRequest) -> Result<JobId, WorkflowError> {
        if self.state.is_processing() {
            if let Some(previous) = self.state.job_id() {
                info!(job_id = %previous, "superseding active job");
            }
            self.state.finish(WorkflowPhase::Idle);
        }

        let job_id = match self.submitter.submit(&request).await {
            Ok(job_id) => job_id,
            Err(error) => {
                self.report_error(&error);
                return Err(error);
            }
        };

        self.state
            .begin(job_id.clone(), request.method, Instant::now());
        self.sinks
            .status
            .show_status(&format!("Job {job_id} submitted"));
        self.sinks
            .announcer
            .announce(TRANSCRIPTION_STARTED, Priority::Polite);
        self.schedule_poll(job_id.clone(), Duration::ZERO);

        Ok(job_id)
    }

    /// Waits for poll settlements until the active job reaches a terminal
    /// state. Returns `None` when no job is being processed.
    ///
    /// A [`CancelHandle`] request is honoured only while polling; once the
    /// transcript has arrived the summaries run to completion.
    pub async fn run_until_settled(&mut self) -> Option<WorkflowOutcome> {
        while self.state.is_processing() {
            tokio::select! {
                settled = self.settled_rx.recv() => {
                    if let Some(outcome) = self.handle_settlement(settled?).await {
                        return Some(outcome);
                    }
                }
                () = self.cancel_requested.notified() => {
                    if self.cancel() {
                        return Some(WorkflowOutcome::Failed(WorkflowError::Cancelled));
                    }
                }
            }
        }
        None
    }

    /// Applies one poll settlement. Settlements for a superseded job, an old
    /// generation, or a job that already finished are ignored.
    pub async fn handle_settlement(&mut self, settled: PollSettled) -> Option<WorkflowOutcome> {
        if !self.state.accepts(&settled) {
            debug!(
                job_id = %settled.job_id,
                generation = settled.generation,
                "ignoring stale poll settlement"
            );
            return None;
        }
        let method = self.state.method()?;
        let job_id = settled.job_id;

        match StatusPoller::classify(settled.response, method) {
            PollStep::Pending { status } => {
                self.show_status(&status);
                let limit = self
                    .state
                    .polling_since()
                    .and_then(|since| self.poller.wait_exceeded(since, Instant::now()));
                if let Some(limit) = limit {
                    let error = WorkflowError::TimedOut(limit.as_secs());
                    self.report_error(&error);
                    return Some(WorkflowOutcome::Failed(error));
                }
                debug!(job_id = %job_id, status = %status, "job still running");
                self.schedule_poll(job_id, self.poller.interval());
                None
            }
            PollStep::Failed { status, error } => {
                if let Some(status) = status {
                    self.sinks.status.show_status(&status);
                }
                self.report_error(&error);
                Some(WorkflowOutcome::Failed(error))
            }
            PollStep::Completed { status, result } => {
                self.sinks.status.show_status(&status);
                Some(WorkflowOutcome::Completed(self.complete(job_id, result).await))
            }
        }
    }

    /// Aborts the active job. Returns false when nothing was running.
    pub fn cancel(&mut self) -> bool {
        if !self.state.is_processing() {
            return false;
        }
        self.report_error(&WorkflowError::Cancelled);
        true
    }

    async fn complete(&mut self, job_id: JobId, result: TranscriptionResult) -> ComposedResult {
        self.state.cancel_poll();
        let view = TranscriptView::from_result(&result);
        self.sinks.transcript.update(SinkUpdate::Ready(&view));
        self.sinks
            .announcer
            .announce(TRANSCRIPTION_COMPLETE, Priority::Polite);
        self.state.finish(WorkflowPhase::Completed);
        info!(job_id = %job_id, "transcription complete");

        let summaries = if self.summaries_enabled {
            Some(self.composer.compose(result.summary_text()).await)
        } else {
            None
        };

        let composed = ComposedResult {
            job_id,
            transcription: result,
            summaries,
        };
        self.state.store_result(composed.clone());
        composed
    }

    fn schedule_poll(&mut self, job_id: JobId, delay: Duration) {
        self.generation += 1;
        debug!(job_id = %job_id, generation = self.generation, ?delay, "scheduling status poll");
        let handle = self.poller.schedule(job_id, self.generation, delay);
        self.state.install_poll(handle);
    }

    fn show_status(&mut self, status: &str) {
        self.sinks.status.show_status(status);
        if self.state.note_status(status) {
            self.sinks.announcer.announce(status, Priority::Polite);
        }
    }

    fn report_error(&mut self, error: &WorkflowError) {
        warn!(kind = error.kind(), error = %error, "transcription workflow ended");
        let phase = if self.state.phase() == WorkflowPhase::Polling {
            WorkflowPhase::Failed
        } else {
            WorkflowPhase::Idle
        };
        self.state.finish(phase);

        let message = error.user_message();
        self.sinks.status.show_error(&message);
        self.sinks.announcer.announce(&message, error.priority());
    }
}
