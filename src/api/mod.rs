pub mod client;
pub mod http;
pub mod models;

pub use client::{ApiError, ApiResult, TranscriberApi};
pub use http::HttpTranscriberApi;
pub use models::{
    AudioFormat, CuratorSummary, JobId, JobRequest, JobStatus, KeySummary, SummaryResult,
    TranscriptionMethod, TranscriptionResult, WhisperModel,
};
