use std::sync::Arc;

use serde::Serialize;

use crate::api::client::ApiResult;
use crate::api::models::{
    CuratorSummary, JobId, JobStatus, KeySummary, SummaryResult, TranscriptionResult,
};
use crate::controller::composer::TranscriptView;
use crate::error::{Priority, WorkflowError};

/// Announcement channel for non-visual clients.
pub trait Announcer: Send + Sync {
    fn announce(&self, message: &str, priority: Priority);
}

/// Progress line and terminal error display.
pub trait StatusSink: Send + Sync {
    fn show_status(&self, status: &str);
    fn show_error(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkUpdate<'a, T> {
    Ready(&'a T),
    Error(&'a str),
}

impl<'a, T> From<&'a SummaryResult<T>> for SinkUpdate<'a, T> {
    fn from(result: &'a SummaryResult<T>) -> Self {
        match result {
            SummaryResult::Ready(value) => SinkUpdate::Ready(value),
            SummaryResult::Failed { error } => SinkUpdate::Error(error.as_str()),
        }
    }
}

/// An independent display target updated at most once per settlement.
pub trait DisplaySink<T>: Send + Sync {
    fn update(&self, update: SinkUpdate<'_, T>);
}

/// Everything the orchestrator writes to, injected at construction.
#[derive(Clone)]
pub struct Sinks {
    pub announcer: Arc<dyn Announcer>,
    pub status: Arc<dyn StatusSink>,
    pub transcript: Arc<dyn DisplaySink<TranscriptView>>,
    pub key_summary: Arc<dyn DisplaySink<KeySummary>>,
    pub curator_summary: Arc<dyn DisplaySink<CuratorSummary>>,
}

/// A status poll that has finished, delivered back to the orchestrator.
#[derive(Debug)]
pub struct PollSettled {
    pub job_id: JobId,
    pub generation: u64,
    pub response: ApiResult<JobStatus>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SummaryPair {
    pub key_summary: SummaryResult<KeySummary>,
    pub curator_summary: SummaryResult<CuratorSummary>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ComposedResult {
    pub job_id: JobId,
    pub transcription: TranscriptionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries: Option<SummaryPair>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Completed(ComposedResult),
    Failed(WorkflowError),
}
