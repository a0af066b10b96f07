use std::path::PathBuf;

use directories::ProjectDirs;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub transcripts_dir: PathBuf,
    pub config_file: PathBuf,
}

impl AppPaths {
    pub fn resolve() -> AppResult<Self> {
        let project_dirs = ProjectDirs::from("io", "yt-scribe", "yt-scribe")
            .ok_or_else(|| AppError::Config("unable to resolve project directories".to_owned()))?;

        let config_dir = project_dirs.config_dir().to_path_buf();
        let data_dir = project_dirs.data_local_dir().to_path_buf();
        let transcripts_dir = data_dir.join("transcripts");
        let config_file = config_dir.join("config.toml");

        Ok(Self {
            config_dir,
            data_dir,
            transcripts_dir,
            config_file,
        })
    }

    pub fn ensure_dirs(&self) -> AppResult<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.transcripts_dir)?;
        Ok(())
    }

    /// Directory saved transcripts land in, honouring `output.directory`.
    pub fn transcripts_dir_for(&self, config: &AppConfig) -> PathBuf {
        config
            .output
            .directory
            .clone()
            .unwrap_or_else(|| self.transcripts_dir.clone())
    }
}
