//! Storage abstraction for uploaded files.
//!
//! A backend persists bytes under a relative, `/`-separated name and turns the
//! stored name into a public URL. Which backend the process uses is decided
//! once at startup by [`resolve_storage_backend`] and never changes afterwards.

use rand::{distributions::Alphanumeric, Rng};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use crate::api::error::ConfigError;
use crate::modules::file_upload::{storage_fs::FileSystemStorage, storage_memory::InMemoryStorage};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid file name: {0:?}")]
    InvalidName(String),

    #[error("Save failed: {0}")]
    SaveFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Persist `content` under `name` and return the name actually used.
    ///
    /// Backends sanitize the last path segment and pick an alternative name
    /// when the requested one is taken, so the result may differ from `name`.
    async fn save(&self, name: &str, content: &[u8]) -> StorageResult<String>;

    /// Public URL of a stored name.
    fn url(&self, name: &str) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    FileSystem,
    InMemory,
}

impl StorageBackend {
    /// Map a configured backend name to a known backend.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "filesystem" | "filesystemstorage" => Some(Self::FileSystem),
            "memory" | "inmemorystorage" => Some(Self::InMemory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageDeclaration {
    #[serde(rename = "BACKEND")]
    pub backend: Option<String>,
}

/// Structured storage declaration, e.g. `{"default": {"BACKEND": "filesystem"}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoragesSetting {
    pub default: Option<StorageDeclaration>,
}

#[derive(Debug, Clone, Default)]
pub struct StorageSettings {
    /// `CKEDITOR_5_FILE_STORAGE`
    pub upload_storage: Option<String>,
    /// `DEFAULT_FILE_STORAGE`
    pub default_file_storage: Option<String>,
    /// `STORAGES`
    pub storages: StoragesSetting,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Pick the storage backend: explicit upload storage, then the legacy default,
/// then the structured default. Missing everything is an error.
pub fn resolve_storage_backend(settings: &StorageSettings) -> Result<StorageBackend, ConfigError> {
    if let Some(name) = non_empty(&settings.upload_storage) {
        return StorageBackend::from_name(name)
            .ok_or_else(|| ConfigError::InvalidUploadStorage(name.to_string()));
    }

    if let Some(name) = non_empty(&settings.default_file_storage) {
        return StorageBackend::from_name(name)
            .ok_or_else(|| ConfigError::InvalidDefaultStorage(name.to_string()));
    }

    let structured = settings.storages.default.as_ref().map(|d| &d.backend);
    if let Some(name) = structured.and_then(non_empty) {
        return StorageBackend::from_name(name)
            .ok_or_else(|| ConfigError::InvalidDefaultStorage(name.to_string()));
    }

    Err(ConfigError::StorageRequired)
}

#[derive(Debug, Clone)]
pub struct MediaSettings {
    pub root: String,
    pub base_url: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self { root: "./media".to_string(), base_url: "/media/".to_string() }
    }
}

pub async fn create_storage(
    backend: StorageBackend,
    media: &MediaSettings,
) -> StorageResult<Arc<dyn Storage>> {
    match backend {
        StorageBackend::FileSystem => {
            let storage = FileSystemStorage::new(&media.root, media.base_url.clone()).await?;
            Ok(Arc::new(storage))
        }
        StorageBackend::InMemory => Ok(Arc::new(InMemoryStorage::new(media.base_url.clone()))),
    }
}

/// Clean a single file name: spaces become underscores, anything other than
/// alphanumerics, `-`, `_` and `.` is dropped.
pub fn get_valid_filename(name: &str) -> StorageResult<String> {
    let cleaned: String = name
        .trim()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(cleaned)
}

/// Split `dir/name.ext` into the directory prefix and the last segment.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('/') {
        Some(idx) => (&name[..idx], &name[idx + 1..]),
        None => ("", name),
    }
}

pub fn join_name(dir: &str, file: &str) -> String {
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{dir}/{file}")
    }
}

/// Sanitize the last segment of a relative storage name.
pub fn get_valid_name(name: &str) -> StorageResult<String> {
    let (dir, file) = split_name(name);
    Ok(join_name(dir, &get_valid_filename(file)?))
}

/// Insert `_` and seven random alphanumerics before the extension.
pub fn get_alternative_name(name: &str) -> String {
    let (dir, file) = split_name(name);
    let (root, ext) = match file.rfind('.') {
        Some(idx) if idx > 0 => file.split_at(idx),
        _ => (file, ""),
    };
    let suffix: String =
        rand::thread_rng().sample_iter(&Alphanumeric).take(7).map(char::from).collect();
    join_name(dir, &format!("{root}_{suffix}{ext}"))
}

pub fn join_url(base_url: &str, name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), name.trim_start_matches('/'))
}
