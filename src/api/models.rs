use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionMethod {
    Whisper,
    Google,
    Both,
}

impl TranscriptionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Whisper => "whisper",
            Self::Google => "google",
            Self::Both => "both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WhisperModel {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl WhisperModel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Base => "base",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// Parameters for `POST /transcribe`, sent form-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub url: String,
    pub format: AudioFormat,
    pub method: TranscriptionMethod,
    pub model: WhisperModel,
}

impl JobRequest {
    pub fn form_fields(&self) -> [(&'static str, &str); 4] {
        [
            ("url", self.url.as_str()),
            ("format", self.format.as_str()),
            ("method", self.method.as_str()),
            ("model", self.model.as_str()),
        ]
    }
}

/// Opaque job identifier assigned by the remote system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobResponse {
    pub job_id: JobId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
}

/// Body of `GET /status/{job_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobStatus {
    pub status: String,
    pub completed: bool,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub result: Option<TranscriptionResult>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MethodTranscript {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Either a dual-method payload or a single-method payload, never both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TranscriptionResult {
    Dual {
        whisper: MethodTranscript,
        google: MethodTranscript,
    },
    Single {
        text: String,
        #[serde(default)]
        language: Option<String>,
    },
}

impl TranscriptionResult {
    pub fn is_dual(&self) -> bool {
        matches!(self, Self::Dual { .. })
    }

    pub fn matches_method(&self, method: TranscriptionMethod) -> bool {
        self.is_dual() == (method == TranscriptionMethod::Both)
    }

    /// Text handed to the summary branches. Dual results prefer the whisper
    /// transcript and fall back to google when whisper produced nothing.
    pub fn summary_text(&self) -> Option<&str> {
        let text = match self {
            Self::Single { text, .. } => Some(text.as_str()),
            Self::Dual { whisper, google } => whisper
                .text
                .as_deref()
                .filter(|text| !text.trim().is_empty())
                .or(google.text.as_deref()),
        };
        text.filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummarizeRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParagraphSummary {
    pub paragraph_summary: String,
}

/// `POST /summarize/key_summary` success body.
pub type KeySummary = Vec<ParagraphSummary>;

/// `POST /summarize/curator` success body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CuratorSummary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub one_line_summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// Outcome of one summary branch: its own payload or an `{ "error": ... }` marker.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SummaryResult<T> {
    Ready(T),
    Failed { error: String },
}

impl<T> SummaryResult<T> {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            error: message.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }
}
