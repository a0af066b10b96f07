use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tokio::runtime::Runtime;
use tracing::info;

use crate::api::client::TranscriberApi;
use crate::api::http::HttpTranscriberApi;
use crate::api::models::{JobId, JobRequest, JobStatus};
use crate::bootstrap::AppPaths;
use crate::cli::TranscribeArgs;
use crate::config::AppConfig;
use crate::controller::composer::{ResultComposer, TranscriptView};
use crate::controller::events::{ComposedResult, WorkflowOutcome};
use crate::controller::{Orchestrator, OrchestratorSettings};
use crate::error::{AppError, AppResult, WorkflowError};
use crate::output::{default_file_name, render_document, render_json, write_transcript, DocumentHeader};
use crate::ui::{console_sinks, DisplayMode, Notifier};

/// Every network call runs on one cooperative thread.
pub fn build_runtime() -> AppResult<Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

fn display_mode(json: bool) -> DisplayMode {
    if json {
        DisplayMode::Quiet
    } else {
        DisplayMode::Text
    }
}

fn http_api(config: &AppConfig) -> AppResult<Arc<dyn TranscriberApi>> {
    Ok(Arc::new(HttpTranscriberApi::new(&config.server)?))
}

pub fn run_transcribe(config: AppConfig, paths: AppPaths, args: TranscribeArgs) -> AppResult<()> {
    build_runtime()?.block_on(transcribe(config, paths, args))
}

async fn transcribe(config: AppConfig, paths: AppPaths, args: TranscribeArgs) -> AppResult<()> {
    let api = http_api(&config)?;
    let sinks = console_sinks(
        Notifier::new(config.output.enable_notifications),
        display_mode(args.json),
    );
    let mut settings = OrchestratorSettings::from_config(&config);
    if args.no_summaries {
        settings.summaries_enabled = false;
    }
    let mut orchestrator = Orchestrator::new(api, sinks, settings)?;

    let request = JobRequest {
        url: args.url.clone(),
        format: args.format.unwrap_or(config.transcription.format),
        method: args.method.unwrap_or(config.transcription.method),
        model: args.model.unwrap_or(config.transcription.model),
    };
    orchestrator.submit(request.clone()).await?;

    let cancel = orchestrator.cancel_handle();
    let interrupt = tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received");
            cancel.cancel();
        }
    });
    let outcome = orchestrator.run_until_settled().await;
    interrupt.abort();

    let composed = match outcome {
        Some(WorkflowOutcome::Completed(composed)) => composed,
        Some(WorkflowOutcome::Failed(error)) => return Err(error.into()),
        None => {
            return Err(AppError::Runtime(
                "job finished without a recorded outcome".to_owned(),
            ))
        }
    };

    let destination = args.output.clone().or_else(|| {
        config
            .output
            .save_transcripts
            .then(|| paths.transcripts_dir_for(&config).join(default_file_name(&composed.job_id)))
    });
    if let Some(path) = destination {
        save_document(&path, &request, &composed)?;
        eprintln!("Transcript saved to {}", path.display());
    }

    if args.json {
        println!("{}", render_json(&composed)?);
    }
    Ok(())
}

fn save_document(path: &Path, request: &JobRequest, composed: &ComposedResult) -> AppResult<PathBuf> {
    let header = DocumentHeader {
        url: &request.url,
        method: request.method.as_str(),
        generated_at: Local::now(),
    };
    write_transcript(path, &render_document(&header, composed))
}

pub fn run_status(config: AppConfig, job_id: String, json: bool) -> AppResult<()> {
    build_runtime()?.block_on(async move {
        let api = http_api(&config)?;
        let status = api
            .job_status(&JobId::new(job_id))
            .await
            .map_err(|error| WorkflowError::Poll(error.to_string()))?;

        if json {
            println!("{}", serde_json::to_string_pretty(&status)?);
        } else {
            print!("{}", status_report(&status));
        }
        Ok(())
    })
}

pub fn status_report(status: &JobStatus) -> String {
    let mut lines = vec![
        format!("Status: {}", status.status),
        format!("Completed: {}", status.completed),
    ];
    if let Some(success) = status.success {
        lines.push(format!("Success: {success}"));
    }
    if let Some(error) = &status.error {
        lines.push(format!("Error: {error}"));
    }
    let mut report = lines.join("\n");
    report.push('\n');
    if let Some(result) = &status.result {
        report.push('\n');
        report.push_str(&TranscriptView::from_result(result).render_text());
    }
    report
}

pub fn run_summarize(config: AppConfig, file: PathBuf, json: bool) -> AppResult<()> {
    let text = std::fs::read_to_string(&file)?;
    build_runtime()?.block_on(async move {
        let api = http_api(&config)?;
        let sinks = console_sinks(
            Notifier::new(config.output.enable_notifications),
            display_mode(json),
        );
        let composer = ResultComposer::new(api, sinks.key_summary, sinks.curator_summary);

        info!(file = %file.display(), "summarizing transcript file");
        let trimmed = text.trim();
        let pair = composer
            .compose((!trimmed.is_empty()).then_some(trimmed))
            .await;

        if json {
            println!("{}", serde_json::to_string_pretty(&pair)?);
        }
        Ok(())
    })
}
