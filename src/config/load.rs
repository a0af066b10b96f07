use std::path::PathBuf;

use reqwest::Url;

use crate::api::models::{AudioFormat, TranscriptionMethod, WhisperModel};
use crate::bootstrap::AppPaths;
use crate::config::schema::AppConfig;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub request_timeout_seconds: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub max_wait_seconds: Option<u64>,
    pub enable_notifications: Option<bool>,
}

pub fn load_config(paths: &AppPaths, overrides: &CliOverrides) -> AppResult<AppConfig> {
    let config_path = overrides
        .config_path
        .clone()
        .unwrap_or_else(|| paths.config_file.clone());

    let mut config = if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)?;
        toml::from_str::<AppConfig>(&raw)?
    } else {
        let defaults = AppConfig::default();
        write_default_config(&config_path, &defaults)?;
        defaults
    };

    apply_env_overrides(&mut config);
    apply_cli_overrides(&mut config, overrides);

    validate(&config)?;
    Ok(config)
}

fn write_default_config(path: &PathBuf, defaults: &AppConfig) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let data = toml::to_string_pretty(defaults)?;
    std::fs::write(path, data)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }

    Ok(())
}

fn validate(config: &AppConfig) -> AppResult<()> {
    if config.polling.interval_ms == 0 {
        return Err(AppError::Config(
            "polling.interval_ms must be > 0".to_owned(),
        ));
    }

    if config.server.request_timeout_seconds == 0 {
        return Err(AppError::Config(
            "server.request_timeout_seconds must be > 0".to_owned(),
        ));
    }

    if let Err(error) = Url::parse(&config.server.base_url) {
        return Err(AppError::Config(format!(
            "server.base_url `{}` is not a valid url: {error}",
            config.server.base_url
        )));
    }

    if config
        .validation
        .accepted_hosts
        .iter()
        .all(|host| host.trim().is_empty())
    {
        return Err(AppError::Config(
            "validation.accepted_hosts must list at least one host".to_owned(),
        ));
    }

    Ok(())
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(value) = std::env::var("YT_SCRIBE_BASE_URL") {
        if !value.trim().is_empty() {
            config.server.base_url = value.trim().to_owned();
        }
    }
    if let Ok(value) = std::env::var("YT_SCRIBE_REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = value.trim().parse::<u64>() {
            config.server.request_timeout_seconds = parsed;
        }
    }
    if let Ok(value) = std::env::var("YT_SCRIBE_POLL_INTERVAL_MS") {
        if let Ok(parsed) = value.trim().parse::<u64>() {
            config.polling.interval_ms = parsed;
        }
    }
    if let Ok(value) = std::env::var("YT_SCRIBE_MAX_WAIT_SECONDS") {
        if let Ok(parsed) = value.trim().parse::<u64>() {
            config.polling.max_wait_seconds = parsed;
        }
    }
    if let Ok(value) = std::env::var("YT_SCRIBE_FORMAT") {
        if let Some(parsed) = parse_format(&value) {
            config.transcription.format = parsed;
        }
    }
    if let Ok(value) = std::env::var("YT_SCRIBE_METHOD") {
        if let Some(parsed) = parse_method(&value) {
            config.transcription.method = parsed;
        }
    }
    if let Ok(value) = std::env::var("YT_SCRIBE_MODEL") {
        if let Some(parsed) = parse_model(&value) {
            config.transcription.model = parsed;
        }
    }
    if let Ok(value) = std::env::var("YT_SCRIBE_SUMMARIES") {
        if let Some(parsed) = parse_bool(&value) {
            config.summaries.enabled = parsed;
        }
    }
    if let Ok(value) = std::env::var("YT_SCRIBE_SAVE_TRANSCRIPTS") {
        if let Some(parsed) = parse_bool(&value) {
            config.output.save_transcripts = parsed;
        }
    }
    if let Ok(value) = std::env::var("YT_SCRIBE_OUTPUT_DIR") {
        config.output.directory = if value.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(value))
        };
    }
    if let Ok(value) = std::env::var("YT_SCRIBE_NOTIFICATIONS") {
        if let Some(parsed) = parse_bool(&value) {
            config.output.enable_notifications = parsed;
        }
    }
    if let Ok(value) = std::env::var("YT_SCRIBE_LOG_LEVEL") {
        config.diagnostics.log_level = value;
    }
}

fn apply_cli_overrides(config: &mut AppConfig, overrides: &CliOverrides) {
    if let Some(value) = &overrides.base_url {
        config.server.base_url = value.clone();
    }
    if let Some(value) = overrides.request_timeout_seconds {
        config.server.request_timeout_seconds = value;
    }
    if let Some(value) = overrides.poll_interval_ms {
        config.polling.interval_ms = value;
    }
    if let Some(value) = overrides.max_wait_seconds {
        config.polling.max_wait_seconds = value;
    }
    if let Some(value) = overrides.enable_notifications {
        config.output.enable_notifications = value;
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_format(value: &str) -> Option<AudioFormat> {
    match value.trim().to_ascii_lowercase().as_str() {
        "mp3" => Some(AudioFormat::Mp3),
        "wav" => Some(AudioFormat::Wav),
        _ => None,
    }
}

fn parse_method(value: &str) -> Option<TranscriptionMethod> {
    match value.trim().to_ascii_lowercase().as_str() {
        "whisper" => Some(TranscriptionMethod::Whisper),
        "google" => Some(TranscriptionMethod::Google),
        "both" => Some(TranscriptionMethod::Both),
        _ => None,
    }
}

fn parse_model(value: &str) -> Option<WhisperModel> {
    match value.trim().to_ascii_lowercase().as_str() {
        "tiny" => Some(WhisperModel::Tiny),
        "base" => Some(WhisperModel::Base),
        "small" => Some(WhisperModel::Small),
        "medium" => Some(WhisperModel::Medium),
        "large" => Some(WhisperModel::Large),
        _ => None,
    }
}
