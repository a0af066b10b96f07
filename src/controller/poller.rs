use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tracing::debug;

use crate::api::client::{ApiResult, TranscriberApi};
use crate::api::models::{JobId, JobStatus, TranscriptionMethod, TranscriptionResult};
use crate::controller::events::PollSettled;
use crate::controller::state::PollHandle;
use crate::error::WorkflowError;

/// What a single status response means for the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    Pending {
        status: String,
    },
    Completed {
        status: String,
        result: TranscriptionResult,
    },
    Failed {
        status: Option<String>,
        error: WorkflowError,
    },
}

/// Schedules one status query at a time; the orchestrator reschedules only
/// after the previous query has settled.
pub struct StatusPoller {
    api: Arc<dyn TranscriberApi>,
    interval: Duration,
    max_wait: Option<Duration>,
    settled_tx: UnboundedSender<PollSettled>,
}

impl StatusPoller {
    pub fn new(
        api: Arc<dyn TranscriberApi>,
        interval: Duration,
        max_wait: Option<Duration>,
        settled_tx: UnboundedSender<PollSettled>,
    ) -> Self {
        Self {
            api,
            interval,
            max_wait,
            settled_tx,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait
    }

    /// Spawns a single poll that fires after `delay`.
    pub fn schedule(&self, job_id: JobId, generation: u64, delay: Duration) -> PollHandle {
        let api = self.api.clone();
        let settled_tx = self.settled_tx.clone();
        let polled_job = job_id.clone();

        let task = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            debug!(job_id = %polled_job, generation, "polling job status");
            let response = api.job_status(&polled_job).await;
            let _ = settled_tx.send(PollSettled {
                job_id: polled_job,
                generation,
                response,
            });
        });

        PollHandle::new(job_id, generation, task)
    }

    pub fn wait_exceeded(&self, since: Instant, now: Instant) -> Option<Duration> {
        self.max_wait
            .filter(|limit| now.saturating_duration_since(since) >= *limit)
    }

    pub fn classify(response: ApiResult<JobStatus>, method: TranscriptionMethod) -> PollStep {
        let status = match response {
            Ok(status) => status,
            Err(error) => {
                return PollStep::Failed {
                    status: None,
                    error: WorkflowError::Poll(error.to_string()),
                }
            }
        };

        if !status.completed {
            return PollStep::Pending {
                status: status.status,
            };
        }

        if status.success != Some(true) {
            let detail = status
                .error
                .filter(|error| !error.trim().is_empty())
                .unwrap_or_else(|| "unknown error".to_owned());
            return PollStep::Failed {
                status: Some(status.status),
                error: WorkflowError::JobFailed(detail),
            };
        }

        match status.result {
            Some(result) if result.matches_method(method) => PollStep::Completed {
                status: status.status,
                result,
            },
            Some(_) => PollStep::Failed {
                status: Some(status.status),
                error: WorkflowError::Poll(format!(
                    "result shape does not match requested method `{}`",
                    method.as_str()
                )),
            },
            None => PollStep::Failed {
                status: Some(status.status),
                error: WorkflowError::Poll("job completed without a result".to_owned()),
            },
        }
    }
}
