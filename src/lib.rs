pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod output;
pub mod runtime;
#[cfg(test)]
mod test_support;
pub mod ui;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::bootstrap::AppPaths;
use crate::cli::{Cli, Command, TranscribeArgs};
use crate::config::{load_config, AppConfig};
use crate::error::AppResult;
use crate::runtime::{run_status, run_summarize, run_transcribe};

trait CommandExecutor {
    fn transcribe(&self, config: AppConfig, paths: AppPaths, args: TranscribeArgs) -> AppResult<()>;
    fn status(&self, config: AppConfig, job_id: String, json: bool) -> AppResult<()>;
    fn summarize(&self, config: AppConfig, file: PathBuf, json: bool) -> AppResult<()>;
}

struct DefaultCommandExecutor;

impl CommandExecutor for DefaultCommandExecutor {
    fn transcribe(&self, config: AppConfig, paths: AppPaths, args: TranscribeArgs) -> AppResult<()> {
        run_transcribe(config, paths, args)
    }

    fn status(&self, config: AppConfig, job_id: String, json: bool) -> AppResult<()> {
        run_status(config, job_id, json)
    }

    fn summarize(&self, config: AppConfig, file: PathBuf, json: bool) -> AppResult<()> {
        run_summarize(config, file, json)
    }
}

fn execute_command<E: CommandExecutor>(
    command: Command,
    paths: AppPaths,
    config: AppConfig,
    executor: &E,
) -> AppResult<()> {
    match command {
        Command::Transcribe(args) => executor.transcribe(config, paths, args),
        Command::Status { job_id, json } => executor.status(config, job_id, json),
        Command::Summarize { file, json } => executor.summarize(config, file, json),
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.diagnostics.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact()
        .init();
}

pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let paths = AppPaths::resolve()?;
    paths.ensure_dirs()?;

    let config = load_config(&paths, &cli.to_overrides())?;
    init_tracing(&config);

    execute_command(cli.command, paths, config, &DefaultCommandExecutor)
}
