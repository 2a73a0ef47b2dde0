use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::modules::file_upload::storage::{
    get_alternative_name, get_valid_name, join_url, Storage, StorageError, StorageResult,
};

/// Attempts before giving up on finding a free name.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Local filesystem storage
#[derive(Clone)]
pub struct FileSystemStorage {
    location: PathBuf,
    base_url: String,
}

impl FileSystemStorage {
    /// `location` is the media root, `base_url` the prefix files are served under.
    pub async fn new(location: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let location = location.into();

        fs::create_dir_all(&location).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                location.display(),
                e
            ))
        })?;

        Ok(FileSystemStorage { location, base_url })
    }

    /// Resolve a relative name below the media root. Absolute names and
    /// parent-directory segments are refused.
    fn path(&self, name: &str) -> StorageResult<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || name.starts_with('/') {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.location.join(relative))
    }

    async fn create_new(&self, path: &Path) -> std::io::Result<fs::File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::OpenOptions::new().write(true).create_new(true).open(path).await
    }
}

/// Remove a partly written file so its name is free again.
async fn discard_on_error<T>(path: &Path, result: std::io::Result<T>) -> StorageResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) => {
            if let Err(remove_err) = fs::remove_file(path).await {
                tracing::warn!(path = %path.display(), error = %remove_err, "Failed to remove partial file");
            }
            Err(StorageError::SaveFailed(format!("Failed to write file {}: {}", path.display(), e)))
        }
    }
}

#[async_trait::async_trait]
impl Storage for FileSystemStorage {
    async fn save(&self, name: &str, content: &[u8]) -> StorageResult<String> {
        let mut name = get_valid_name(name)?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let path = self.path(&name)?;
            let mut file = match self.create_new(&path).await {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    tracing::debug!(name = %name, "Storage name taken, picking an alternative");
                    name = get_alternative_name(&name);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let written = async {
                file.write_all(content).await?;
                file.sync_all().await
            }
            .await;
            drop(file);
            discard_on_error(&path, written).await?;

            tracing::info!(
                path = %path.display(),
                name = %name,
                size_bytes = content.len(),
                "Local storage save successful"
            );
            return Ok(name);
        }

        Err(StorageError::SaveFailed(format!("No free name found for {name}")))
    }

    fn url(&self, name: &str) -> String {
        join_url(&self.base_url, name)
    }
}
