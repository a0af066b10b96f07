use async_trait::async_trait;
use thiserror::Error;

use crate::api::models::{CuratorSummary, JobId, JobRequest, JobStatus, KeySummary};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("request was not successful"))]
    Status { status: u16, detail: Option<String> },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Server-reported detail, if the failure carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Remote transcription service boundary consumed by the controller.
#[async_trait]
pub trait TranscriberApi: Send + Sync {
    /// `POST /transcribe`
    async fn create_job(&self, request: &JobRequest) -> ApiResult<JobId>;

    /// `GET /status/{job_id}`
    async fn job_status(&self, job_id: &JobId) -> ApiResult<JobStatus>;

    /// `POST /summarize/key_summary`
    async fn key_summary(&self, text: &str) -> ApiResult<KeySummary>;

    /// `POST /summarize/curator`
    async fn curator_summary(&self, text: &str) -> ApiResult<CuratorSummary>;
}
