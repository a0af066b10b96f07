use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::models::{AudioFormat, TranscriptionMethod, WhisperModel};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub polling: PollingConfig,
    pub transcription: TranscriptionConfig,
    pub summaries: SummariesConfig,
    pub validation: ValidationConfig,
    pub output: OutputConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_owned(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
    /// Zero disables the overall bound.
    pub max_wait_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            max_wait_seconds: 1_800,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn max_wait(&self) -> Option<Duration> {
        (self.max_wait_seconds > 0).then(|| Duration::from_secs(self.max_wait_seconds))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub format: AudioFormat,
    pub method: TranscriptionMethod,
    pub model: WhisperModel,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            format: AudioFormat::Mp3,
            method: TranscriptionMethod::Whisper,
            model: WhisperModel::Base,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummariesConfig {
    pub enabled: bool,
}

impl Default for SummariesConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub accepted_hosts: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            accepted_hosts: vec!["youtube.com".to_owned(), "youtu.be".to_owned()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub save_transcripts: bool,
    pub directory: Option<PathBuf>,
    pub enable_notifications: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_transcripts: true,
            directory: None,
            enable_notifications: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub log_level: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
        }
    }
}
