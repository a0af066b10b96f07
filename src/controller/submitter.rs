use std::sync::Arc;

use regex::Regex;
use tracing::{info, warn};

use crate::api::client::{ApiError, TranscriberApi};
use crate::api::models::{JobId, JobRequest};
use crate::error::{AppError, AppResult, WorkflowError};

pub const URL_REQUIRED: &str = "YouTube URL is required";

/// Local pre-network check of the submitted URL against the accepted hosts.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    pattern: Regex,
    hosts: Vec<String>,
}

impl UrlValidator {
    pub fn new(accepted_hosts: &[String]) -> AppResult<Self> {
        let hosts: Vec<String> = accepted_hosts
            .iter()
            .map(|host| host.trim().to_ascii_lowercase())
            .filter(|host| !host.is_empty())
            .collect();
        if hosts.is_empty() {
            return Err(AppError::Config(
                "at least one accepted host is required".to_owned(),
            ));
        }

        let alternatives = hosts
            .iter()
            .map(|host| regex::escape(host))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(
            r"(?i)^(?:https?://)?(?:[a-z0-9-]+\.)*(?:{alternatives})(?:[/?#:]|$)"
        ))
        .map_err(|error| AppError::Config(format!("invalid accepted host pattern: {error}")))?;

        Ok(Self { pattern, hosts })
    }

    pub fn validate(&self, url: &str) -> Result<(), Vec<String>> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(vec![URL_REQUIRED.to_owned()]);
        }

        let mut messages = Vec::new();
        if trimmed.chars().any(char::is_whitespace) {
            messages.push("YouTube URL must not contain spaces".to_owned());
        }
        if !self.pattern.is_match(trimmed) {
            messages.push(format!(
                "Please enter a valid YouTube URL ({})",
                self.hosts.join(", ")
            ));
        }

        if messages.is_empty() {
            Ok(())
        } else {
            Err(messages)
        }
    }
}

pub struct JobSubmitter {
    api: Arc<dyn TranscriberApi>,
    validator: UrlValidator,
}

impl JobSubmitter {
    pub fn new(api: Arc<dyn TranscriberApi>, validator: UrlValidator) -> Self {
        Self { api, validator }
    }

    /// Validates locally, then issues exactly one creation request.
    pub async fn submit(&self, request: &JobRequest) -> Result<JobId, WorkflowError> {
        self.validator
            .validate(&request.url)
            .map_err(WorkflowError::Validation)?;

        let normalized = JobRequest {
            url: request.url.trim().to_owned(),
            ..request.clone()
        };

        match self.api.create_job(&normalized).await {
            Ok(job_id) => {
                info!(job_id = %job_id, method = normalized.method.as_str(), "transcription job created");
                Ok(job_id)
            }
            Err(error) => {
                warn!(error = %error, "transcription job was not created");
                Err(WorkflowError::Submission(submission_message(&error)))
            }
        }
    }
}

fn submission_message(error: &ApiError) -> String {
    if let Some(detail) = error.detail() {
        return detail.to_owned();
    }
    match error {
        ApiError::Status { status, .. } => {
            format!("the server rejected the request (HTTP {status})")
        }
        ApiError::Transport(message) => format!("could not reach the server: {message}"),
        ApiError::Decode(message) => format!("the server returned an unexpected response: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{JobSubmitter, UrlValidator, URL_REQUIRED};
    use crate::api::client::ApiError;
    use crate::api::models::{
        AudioFormat, JobId, JobRequest, TranscriptionMethod, WhisperModel,
    };
    use crate::error::{AppError, WorkflowError};
    use crate::test_support::FakeApi;
    use std::sync::Arc;

    fn default_validator() -> UrlValidator {
        UrlValidator::new(&["youtube.com".to_owned(), "youtu.be".to_owned()]).expect("validator")
    }

    fn request(url: &str) -> JobRequest {
        JobRequest {
            url: url.to_owned(),
            format: AudioFormat::Mp3,
            method: TranscriptionMethod::Whisper,
            model: WhisperModel::Base,
        }
    }

    #[test]
    fn accepts_known_hosts_with_and_without_scheme() {
        let validator = default_validator();
        for url in [
            "https://youtu.be/abc",
            "https://www.youtube.com/watch?v=abc",
            "http://m.youtube.com/watch?v=abc",
            "youtube.com/watch?v=abc",
            "  https://YOUTU.BE/abc  ",
            "https://music.youtube.com",
        ] {
            assert!(validator.validate(url).is_ok(), "{url}");
        }
    }

    #[test]
    fn rejects_empty_and_foreign_hosts() {
        let validator = default_validator();
        assert_eq!(validator.validate(""), Err(vec![URL_REQUIRED.to_owned()]));
        assert_eq!(validator.validate("   "), Err(vec![URL_REQUIRED.to_owned()]));

        for url in [
            "https://vimeo.com/123",
            "https://notyoutube.com/watch?v=abc",
            "https://youtube.com.evil.example/watch",
            "ftp://youtube.com/abc",
        ] {
            let messages = validator.validate(url).expect_err(url);
            assert!(
                messages.iter().any(|message| message.starts_with("Please enter a valid YouTube URL")),
                "{url}: {messages:?}"
            );
        }
    }

    #[test]
    fn reports_every_violation() {
        let messages = default_validator()
            .validate("https://vimeo.com/a b")
            .expect_err("invalid");
        assert_eq!(messages.len(), 2, "{messages:?}");
    }

    #[test]
    fn empty_host_list_is_a_config_error() {
        let error = UrlValidator::new(&[" ".to_owned()]).expect_err("must fail");
        assert!(matches!(error, AppError::Config(_)));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_network() {
        let api = Arc::new(FakeApi::default());
        let submitter = JobSubmitter::new(api.clone(), default_validator());

        for url in ["", "https://example.com/video", "not a url"] {
            let error = submitter.submit(&request(url)).await.expect_err(url);
            assert!(matches!(error, WorkflowError::Validation(_)), "{url}");
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn successful_submission_returns_server_job_id() {
        let api = Arc::new(FakeApi::default().with_created(Ok(JobId::new("job-42"))));
        let submitter = JobSubmitter::new(api.clone(), default_validator());

        let job_id = submitter
            .submit(&request("  https://youtu.be/abc "))
            .await
            .expect("submit");
        assert_eq!(job_id, JobId::new("job-42"));
        assert_eq!(api.calls(), ["create"]);
        assert_eq!(
            api.submitted_urls(),
            ["https://youtu.be/abc".to_owned()]
        );
    }

    #[tokio::test]
    async fn server_detail_is_surfaced_or_replaced_by_generic_message() {
        let api = Arc::new(FakeApi::default().with_created(Err(ApiError::Status {
            status: 400,
            detail: Some("유효한 YouTube URL을 입력해주세요".to_owned()),
        })));
        let submitter = JobSubmitter::new(api, default_validator());
        let error = submitter
            .submit(&request("https://youtu.be/abc"))
            .await
            .expect_err("rejected");
        assert_eq!(
            error,
            WorkflowError::Submission("유효한 YouTube URL을 입력해주세요".to_owned())
        );

        let api = Arc::new(FakeApi::default().with_created(Err(ApiError::Status {
            status: 503,
            detail: None,
        })));
        let submitter = JobSubmitter::new(api, default_validator());
        let error = submitter
            .submit(&request("https://youtu.be/abc"))
            .await
            .expect_err("rejected");
        assert_eq!(
            error,
            WorkflowError::Submission("the server rejected the request (HTTP 503)".to_owned())
        );
    }
}
