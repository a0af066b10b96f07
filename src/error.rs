use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("toml serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("runtime error: {0}")]
    Runtime(String),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

pub type AppResult<T> = Result<T, AppError>;

/// Announcement urgency understood by the announcement channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Polite,
    Assertive,
}

/// Every way a transcription workflow can end short of a full result.
///
/// All variants flow through the orchestrator's single error-reporting path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("status check failed: {0}")]
    Poll(String),

    #[error("transcription failed: {0}")]
    JobFailed(String),

    #[error("summary failed: {0}")]
    Summary(String),

    #[error("job did not finish within {0} seconds")]
    TimedOut(u64),

    #[error("transcription cancelled")]
    Cancelled,
}

impl WorkflowError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Submission(_) => "submission",
            Self::Poll(_) => "poll",
            Self::JobFailed(_) => "job_failed",
            Self::Summary(_) => "summary",
            Self::TimedOut(_) => "timed_out",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            Self::Summary(_) => Priority::Polite,
            _ => Priority::Assertive,
        }
    }

    /// Text shown to the user and announced on the announcement channel.
    pub fn user_message(&self) -> String {
        format!("Error: {self}")
    }
}
