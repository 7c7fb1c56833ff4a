use crate::error::AppError;
use crate::model::Task;
use crate::schema;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const STORE_PATH_ENV_VAR: &str = "TASKS_DATA_FILE";
const STORE_FILE_NAME: &str = "tasks.json";

/// Resolves the data file: explicit override, then `TASKS_DATA_FILE`, then
/// `tasks.json` in the working directory.
pub fn store_path(override_path: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(STORE_PATH_ENV_VAR)
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }

    PathBuf::from(STORE_FILE_NAME)
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "data file missing, starting empty");
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let tasks: Vec<Task> = serde_json::from_str(&content).map_err(|err| {
        AppError::data_corruption(format!("{}: {err}", path.display()))
    })?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for (index, task) in tasks.iter().enumerate() {
        schema::check_record(task).map_err(|err| {
            AppError::data_corruption(format!("{}: record {index}: {err}", path.display()))
        })?;
        if !seen.insert(task.id.to_lowercase()) {
            return Err(AppError::data_corruption(format!(
                "{}: record {index}: duplicate id \"{}\"",
                path.display(),
                task.id
            )));
        }
    }

    tracing::debug!(path = %path.display(), count = tasks.len(), "loaded tasks");
    Ok(tasks)
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let mut content = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
    tasks
        .serialize(&mut serializer)
        .map_err(|err| AppError::data_corruption(err.to_string()))?;
    write_private(path, &content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        if let Err(err) = std::fs::set_permissions(path, permissions) {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "could not restrict data file permissions"
            );
        }
    }

    tracing::debug!(path = %path.display(), count = tasks.len(), "saved tasks");
    Ok(())
}

/// Writes `content`, creating the file owner-only on Unix. Only an error here
/// means the file was not written.
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(content)?;
    file.flush()
}
