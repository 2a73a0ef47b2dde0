use std::str::FromStr;

use crate::api::error::ConfigError;
use crate::modules::file_upload::{
    model::{UploadConfig, DEFAULT_UPLOAD_FILE_TYPES},
    storage::{MediaSettings, StorageSettings, StoragesSetting},
    UploadPermission,
};

pub const DEFAULT_UPLOAD_PATH: &str = "/ckeditor5/image_upload/";

pub struct Env {
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub upload_path: String,
    pub upload_permission: UploadPermission,
    pub storage: StorageSettings,
    pub media: MediaSettings,
    pub upload: UploadConfig,
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { name, value: value.to_string() }),
    }
}

impl Env {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the settings from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let flag = |key: &'static str, default: bool| match var(key) {
            Some(v) => parse_flag(key, &v),
            None => Ok(default),
        };

        let jwt_secret = var("SECRET_KEY").ok_or(ConfigError::Missing("SECRET_KEY"))?;

        let port = match var("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue { name: "PORT", value: v })?,
            None => 8080,
        };

        let upload_permission = match var("CKEDITOR_5_UPLOAD_PERMISSION") {
            Some(v) => UploadPermission::from_str(&v)?,
            None => UploadPermission::default(),
        };

        let storages = match var("STORAGES") {
            Some(v) => serde_json::from_str::<StoragesSetting>(&v)
                .map_err(ConfigError::InvalidStorages)?,
            None => StoragesSetting::default(),
        };

        let max_file_size_mb = match var("CKEDITOR_5_MAX_FILE_SIZE") {
            Some(v) => {
                let mb = v.trim().parse::<f64>().ok().filter(|mb| mb.is_finite() && *mb >= 0.0);
                let mb = mb.ok_or(ConfigError::InvalidValue {
                    name: "CKEDITOR_5_MAX_FILE_SIZE",
                    value: v,
                })?;
                Some(mb).filter(|mb| *mb > 0.0)
            }
            None => None,
        };

        let allowed_extensions = match var("CKEDITOR_5_UPLOAD_FILE_TYPES") {
            Some(v) => v
                .split(',')
                .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
            None => DEFAULT_UPLOAD_FILE_TYPES.iter().map(|e| e.to_string()).collect(),
        };

        let media_defaults = MediaSettings::default();

        Ok(Env {
            jwt_secret,
            database_url: var("DATABASE_URL"),
            frontend_url: var("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            ip: var("IP").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            upload_path: var("CKEDITOR_5_UPLOAD_PATH")
                .unwrap_or_else(|| DEFAULT_UPLOAD_PATH.to_string()),
            upload_permission,
            storage: StorageSettings {
                upload_storage: var("CKEDITOR_5_FILE_STORAGE"),
                default_file_storage: var("DEFAULT_FILE_STORAGE"),
                storages,
            },
            media: MediaSettings {
                root: var("MEDIA_ROOT").unwrap_or(media_defaults.root),
                base_url: var("MEDIA_URL").unwrap_or(media_defaults.base_url),
            },
            upload: UploadConfig {
                path_from_username: flag("CKEDITOR_5_PATH_FROM_USERNAME", false)?,
                restrict_by_date: flag("CKEDITOR5_RESTRICT_BY_DATE", true)?,
                allow_all_file_types: flag("CKEDITOR_5_ALLOW_ALL_FILE_TYPES", false)?,
                max_file_size_mb,
                allowed_extensions,
            },
        })
    }
}
