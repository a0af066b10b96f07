use chrono::{DateTime, Local};

use crate::api::models::{CuratorSummary, KeySummary, MethodTranscript, TranscriptionResult};
use crate::controller::composer::TRANSCRIPTION_FAILED;
use crate::controller::events::ComposedResult;
use crate::error::AppResult;

const SEPARATOR_WIDTH: usize = 50;

/// What the saved transcript file says about where it came from.
#[derive(Debug, Clone)]
pub struct DocumentHeader<'a> {
    pub url: &'a str,
    pub method: &'a str,
    pub generated_at: DateTime<Local>,
}

pub fn render_key_summary(summary: &KeySummary) -> String {
    summary
        .iter()
        .enumerate()
        .map(|(index, paragraph)| format!("{}. {}\n", index + 1, paragraph.paragraph_summary.trim()))
        .collect()
}

pub fn render_curator_summary(summary: &CuratorSummary) -> String {
    let mut out = String::new();
    if !summary.title.trim().is_empty() {
        out.push_str(summary.title.trim());
        out.push('\n');
    }
    if !summary.one_line_summary.trim().is_empty() {
        out.push_str(summary.one_line_summary.trim());
        out.push('\n');
    }
    for point in &summary.key_points {
        out.push_str(&format!("- {}\n", point.trim()));
    }
    out
}

/// Plain-text download format: header, separator, transcript, then any
/// summaries that succeeded.
pub fn render_document(header: &DocumentHeader<'_>, composed: &ComposedResult) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    let mut out = String::new();
    out.push_str(&format!("YouTube URL: {}\n", header.url));
    out.push_str(&format!("Method: {}\n", header.method));
    out.push_str(&format!("Job: {}\n", composed.job_id));
    out.push_str(&format!(
        "Generated: {}\n",
        header.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&separator);
    out.push_str("\n\n");

    match &composed.transcription {
        TranscriptionResult::Single { text, language } => {
            out.push_str(text.trim_end());
            out.push('\n');
            if let Some(language) = language {
                out.push_str(&format!("\nLanguage: {language}\n"));
            }
        }
        TranscriptionResult::Dual { whisper, google } => {
            push_method(&mut out, "Whisper", whisper);
            out.push('\n');
            push_method(&mut out, "Google", google);
        }
    }

    if let Some(summaries) = &composed.summaries {
        if let Some(key_summary) = summaries.key_summary.ready() {
            out.push_str(&format!("\n{separator}\nKey summary\n\n"));
            out.push_str(&render_key_summary(key_summary));
        }
        if let Some(curator) = summaries.curator_summary.ready() {
            out.push_str(&format!("\n{separator}\nCurator summary\n\n"));
            out.push_str(&render_curator_summary(curator));
        }
    }

    out
}

fn push_method(out: &mut String, label: &str, transcript: &MethodTranscript) {
    let text = transcript
        .text
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(TRANSCRIPTION_FAILED);
    out.push_str(&format!("{label}:\n{}\n", text.trim_end()));
}

pub fn render_json(composed: &ComposedResult) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(composed)?)
}
