use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::client::{ApiError, ApiResult, TranscriberApi};
use crate::api::models::{
    CreateJobResponse, CuratorSummary, ErrorBody, JobId, JobRequest, JobStatus, KeySummary,
    SummarizeRequest,
};
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// reqwest-backed client for the transcription service.
#[derive(Debug, Clone)]
pub struct HttpTranscriberApi {
    client: Client,
    base_url: Url,
}

impl HttpTranscriberApi {
    pub fn new(config: &ServerConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|error| AppError::Config(format!("server.base_url is invalid: {error}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "server.base_url `{}` cannot carry request paths",
                config.base_url
            )));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        debug!(base_url = %base_url, "transcription api client ready");
        Ok(Self { client, base_url })
    }

    /// Appends `segments` below the base path, one encoded segment each.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::Transport(format!("base url {} cannot carry request paths", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post_summary<T>(&self, segments: &[&str], text: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        debug!(url = %url, chars = text.len(), "requesting summary");
        let response = self
            .client
            .post(url)
            .json(&SummarizeRequest { text })
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }
}

#[async_trait]
impl TranscriberApi for HttpTranscriberApi {
    async fn create_job(&self, request: &JobRequest) -> ApiResult<JobId> {
        let url = self.endpoint(&["transcribe"])?;
        debug!(url = %url, method = request.method.as_str(), "creating transcription job");
        let response = self
            .client
            .post(url)
            .form(&request.form_fields())
            .send()
            .await
            .map_err(transport)?;
        let created: CreateJobResponse = decode(response).await?;
        Ok(created.job_id)
    }

    async fn job_status(&self, job_id: &JobId) -> ApiResult<JobStatus> {
        let url = self.endpoint(&["status", job_id.as_str()])?;
        let response = self.client.get(url).send().await.map_err(transport)?;
        decode(response).await
    }

    async fn key_summary(&self, text: &str) -> ApiResult<KeySummary> {
        self.post_summary(&["summarize", "key_summary"], text).await
    }

    async fn curator_summary(&self, text: &str) -> ApiResult<CuratorSummary> {
        self.post_summary(&["summarize", "curator"], text).await
    }
}

fn transport(error: reqwest::Error) -> ApiError {
    ApiError::Transport(error.to_string())
}

async fn decode<T>(response: Response) -> ApiResult<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.text().await.map_err(transport)?;

    if status.is_success() {
        serde_json::from_str(&body).map_err(|error| ApiError::Decode(error.to_string()))
    } else {
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.detail)
            .filter(|detail| !detail.trim().is_empty());
        Err(ApiError::Status {
            status: status.as_u16(),
            detail,
        })
    }
}
