use serde::Serialize;
use std::borrow::Cow;
use std::path::Path;

use validator::{Validate, ValidationError, ValidationErrors};

pub const DEFAULT_UPLOAD_FILE_TYPES: [&str; 7] =
    ["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff"];

/// File upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Prefix stored paths with the uploader's username.
    pub path_from_username: bool,
    /// Insert a `YYYY/MM/DD` segment into stored paths.
    pub restrict_by_date: bool,
    /// Skip image verification.
    pub allow_all_file_types: bool,
    /// Upload limit in megabytes; `None` means unlimited.
    pub max_file_size_mb: Option<f64>,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path_from_username: false,
            restrict_by_date: true,
            allow_all_file_types: false,
            max_file_size_mb: None,
            allowed_extensions: DEFAULT_UPLOAD_FILE_TYPES.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl UploadConfig {
    pub fn max_file_size_bytes(&self) -> Option<f64> {
        self.max_file_size_mb.map(|mb| mb * 1024.0 * 1024.0)
    }
}

/// Last segment of a client supplied file name. Browsers on some platforms
/// send the full local path.
pub fn base_name(filename: &str) -> &str {
    filename.rsplit(['/', '\\']).next().unwrap_or(filename)
}

/// Message for an upload over `limit_mb`.
pub fn size_limit_message(limit_mb: f64) -> String {
    format!("File should be at most {limit_mb} MB.")
}

/// File received in the `upload` form field. `name` is already reduced to
/// its last path segment.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl AsRef<str>, content_type: Option<String>, content: Vec<u8>) -> Self {
        let name = base_name(name.as_ref()).to_string();
        let content_type = content_type.unwrap_or_else(|| {
            mime_guess::from_path(&name).first_or_octet_stream().essence_str().to_string()
        });
        Self { name, content_type, content }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Lower-cased suffix after the last dot, empty when there is none.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default()
    }
}

#[derive(Debug, Validate)]
#[validate(context = UploadConfig)]
pub struct UploadFileForm {
    #[validate(custom(function = "validate_upload", use_context))]
    pub upload: UploadedFile,
}

fn validate_upload(upload: &UploadedFile, config: &UploadConfig) -> Result<(), ValidationError> {
    if let (Some(limit_mb), Some(limit_bytes)) =
        (config.max_file_size_mb, config.max_file_size_bytes())
    {
        if upload.size() as f64 > limit_bytes {
            return Err(ValidationError::new("max_size")
                .with_message(size_limit_message(limit_mb).into()));
        }
    }

    let extension = upload.extension();
    if !config.allowed_extensions.iter().any(|allowed| allowed == &extension) {
        return Err(ValidationError::new("invalid_extension").with_message(
            format!(
                "File extension “{}” is not allowed. Allowed extensions are: {}.",
                extension,
                config.allowed_extensions.join(", ")
            )
            .into(),
        ));
    }

    Ok(())
}

/// First message recorded for `field`, if any.
pub fn first_error_message(errors: &ValidationErrors, field: &str) -> Option<Cow<'static, str>> {
    errors
        .field_errors()
        .get(field)
        .and_then(|errs| errs.first())
        .map(|err| err.message.clone().unwrap_or_else(|| err.code.clone()))
}
