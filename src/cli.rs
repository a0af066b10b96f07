use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::api::models::{AudioFormat, TranscriptionMethod, WhisperModel};
use crate::config::CliOverrides;

#[derive(Debug, Parser)]
#[command(name = "yt-scribe")]
#[command(about = "Submit YouTube transcription jobs and collect transcripts with summaries")]
pub struct Cli {
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    #[arg(long, global = true)]
    pub request_timeout_seconds: Option<u64>,

    /// Give up on a job after this many seconds (0 waits forever).
    #[arg(long, global = true)]
    pub max_wait_seconds: Option<u64>,

    #[arg(long, global = true)]
    pub notifications: Option<bool>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a URL, wait for the transcript, then fetch both summaries.
    Transcribe(TranscribeArgs),
    /// Query a job's status once.
    Status {
        job_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Summarize an existing transcript file.
    Summarize {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct TranscribeArgs {
    pub url: String,

    #[arg(long, value_enum)]
    pub format: Option<AudioFormat>,

    #[arg(long, value_enum)]
    pub method: Option<TranscriptionMethod>,

    #[arg(long, value_enum)]
    pub model: Option<WhisperModel>,

    /// Write the transcript here instead of the transcripts directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub json: bool,

    #[arg(long)]
    pub no_summaries: bool,
}

impl Cli {
    pub fn to_overrides(&self) -> CliOverrides {
        CliOverrides {
            config_path: self.config.clone(),
            base_url: self.base_url.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
            poll_interval_ms: self.poll_interval_ms,
            max_wait_seconds: self.max_wait_seconds,
            enable_notifications: self.notifications,
        }
    }
}
