pub mod app;

pub use app::{build_runtime, run_status, run_summarize, run_transcribe, status_report};
