use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::api::client::{ApiResult, TranscriberApi};
use crate::api::models::{
    CuratorSummary, KeySummary, MethodTranscript, SummaryResult, TranscriptionResult,
};
use crate::controller::events::{DisplaySink, SinkUpdate, SummaryPair};
use crate::error::WorkflowError;

pub const TRANSCRIPTION_FAILED: &str = "Transcription failed";
const NOTHING_TO_SUMMARIZE: &str = "no transcript text to summarize";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptSection {
    pub label: Option<String>,
    pub text: String,
    pub language: Option<String>,
}

/// Display form of a transcription result: one section per method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptView {
    pub sections: Vec<TranscriptSection>,
}

impl TranscriptView {
    pub fn from_result(result: &TranscriptionResult) -> Self {
        let sections = match result {
            TranscriptionResult::Single { text, language } => vec![TranscriptSection {
                label: None,
                text: text.clone(),
                language: language.clone(),
            }],
            TranscriptionResult::Dual { whisper, google } => vec![
                labelled("Whisper", whisper),
                labelled("Google", google),
            ],
        };
        Self { sections }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for (index, section) in self.sections.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            if let Some(label) = &section.label {
                out.push_str(&format!("[{label}]\n"));
            }
            out.push_str(section.text.trim_end());
            out.push('\n');
            if let Some(language) = &section.language {
                out.push_str(&format!("Language: {language}\n"));
            }
        }
        out
    }
}

fn labelled(label: &str, transcript: &MethodTranscript) -> TranscriptSection {
    let text = transcript
        .text
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(TRANSCRIPTION_FAILED);
    TranscriptSection {
        label: Some(label.to_owned()),
        text: text.to_owned(),
        language: transcript.language.clone(),
    }
}

/// Runs both summary branches concurrently; neither branch waits on or
/// fails because of the other.
pub struct ResultComposer {
    api: Arc<dyn TranscriberApi>,
    key_sink: Arc<dyn DisplaySink<KeySummary>>,
    curator_sink: Arc<dyn DisplaySink<CuratorSummary>>,
}

impl ResultComposer {
    pub fn new(
        api: Arc<dyn TranscriberApi>,
        key_sink: Arc<dyn DisplaySink<KeySummary>>,
        curator_sink: Arc<dyn DisplaySink<CuratorSummary>>,
    ) -> Self {
        Self {
            api,
            key_sink,
            curator_sink,
        }
    }

    pub async fn compose(&self, text: Option<&str>) -> SummaryPair {
        let Some(text) = text else {
            warn!("transcript is empty; skipping summaries");
            let key_summary = SummaryResult::failed(summary_error(NOTHING_TO_SUMMARIZE));
            let curator_summary = SummaryResult::failed(summary_error(NOTHING_TO_SUMMARIZE));
            self.key_sink.update(SinkUpdate::from(&key_summary));
            self.curator_sink.update(SinkUpdate::from(&curator_summary));
            return SummaryPair {
                key_summary,
                curator_summary,
            };
        };

        let key_branch = settle("key_summary", self.api.key_summary(text), &*self.key_sink);
        let curator_branch = settle("curator", self.api.curator_summary(text), &*self.curator_sink);
        let (key_summary, curator_summary) = tokio::join!(key_branch, curator_branch);

        SummaryPair {
            key_summary,
            curator_summary,
        }
    }
}

async fn settle<T, F>(branch: &'static str, request: F, sink: &dyn DisplaySink<T>) -> SummaryResult<T>
where
    F: std::future::Future<Output = ApiResult<T>>,
{
    let result = match request.await {
        Ok(value) => {
            info!(branch, "summary ready");
            SummaryResult::Ready(value)
        }
        Err(error) => {
            warn!(branch, error = %error, "summary failed");
            SummaryResult::failed(summary_error(&error.to_string()))
        }
    };
    sink.update(SinkUpdate::from(&result));
    result
}

fn summary_error(detail: &str) -> String {
    WorkflowError::Summary(detail.to_owned()).to_string()
}
