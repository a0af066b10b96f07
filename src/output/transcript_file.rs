use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::api::models::JobId;
use crate::error::{AppError, AppResult};

pub fn default_file_name(job_id: &JobId) -> String {
    let safe: String = job_id
        .as_str()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect();
    format!("{safe}_transcript.txt")
}

/// Writes `contents` next to `path` and renames it into place, so a reader
/// never sees a half-written transcript.
pub fn write_transcript(path: &Path, contents: &str) -> AppResult<PathBuf> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    let mut temp = NamedTempFile::new_in(&parent)?;
    temp.write_all(contents.as_bytes())?;
    temp.flush()?;
    temp.persist(path)
        .map_err(|error| AppError::Io(error.error))?;

    info!(path = %path.display(), "transcript saved");
    Ok(path.to_path_buf())
}
