use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::borrow::Cow;

use crate::modules::file_upload::storage::StorageError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Internal Server Error")]
    InternalServer,
}

#[derive(serde::Serialize)]
pub struct ErrorMessage {
    pub message: Cow<'static, str>,
}

/// Error payload understood by the editor's upload adapter.
#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub error: ErrorMessage,
}

impl Error {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn page_not_found() -> Self {
        Self::not_found("Page not found.")
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Error::BadRequest(msg) | Error::NotFound(msg) => msg.clone(),
            Error::InternalServer => "Internal Server Error".into(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { error: ErrorMessage { message } })
    }
}

/// Startup configuration failures. Always fatal.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set in .env file or environment variable")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("STORAGES must be a JSON object: {0}")]
    InvalidStorages(#[source] serde_json::Error),
    #[error("Invalid upload storage class: {0}")]
    InvalidUploadStorage(String),
    #[error("Invalid default storage class: {0}")]
    InvalidDefaultStorage(String),
    #[error(
        "Either CKEDITOR_5_FILE_STORAGE, DEFAULT_FILE_STORAGE, or STORAGES['default'] setting is required."
    )]
    StorageRequired,
    #[error("CKEDITOR_5_UPLOAD_PERMISSION={0} requires DATABASE_URL")]
    PermissionRequiresDatabase(String),
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    #[error("JWT Error")]
    JwtError(#[from] jsonwebtoken::errors::Error),
    #[error("Database Error : {0}")]
    DatabaseError(Cow<'static, str>),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("Upload a valid image. The file you uploaded was either not an image or a corrupted image.")]
    NotAnImage,
    #[error("{0}")]
    InvalidForm(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::NotAnImage => Error::BadRequest(value.to_string().into()),
            SystemError::InvalidForm(msg) => Error::BadRequest(msg),
            SystemError::NotFound(msg) => Error::NotFound(msg),
            _ => {
                log::error!("Internal Server Error: {:?}", value);
                Error::InternalServer
            }
        }
    }
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        log::error!("{:?}", err);
        if let sqlx::Error::Database(db_err) = &err {
            return SystemError::DatabaseError(db_err.message().to_string().into());
        }
        SystemError::InternalError(Box::new(err))
    }
}

impl SystemError {
    pub fn invalid_form(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidForm(msg.into())
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: Error) -> (StatusCode, serde_json::Value) {
        let res = err.error_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_bad_request_body_shape() {
        let (status, body) = body_json(Error::bad_request("nope")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": { "message": "nope" } }));
    }

    #[actix_web::test]
    async fn test_internal_error_hides_cause() {
        let err: Error = SystemError::DatabaseError("connection reset".into()).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Internal Server Error");
    }

    #[test]
    fn test_not_an_image_maps_to_bad_request() {
        let err: Error = SystemError::NotAnImage.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("Upload a valid image."));
    }

    #[test]
    fn test_storage_required_names_all_settings() {
        let msg = ConfigError::StorageRequired.to_string();
        assert!(msg.contains("CKEDITOR_5_FILE_STORAGE"));
        assert!(msg.contains("DEFAULT_FILE_STORAGE"));
        assert!(msg.contains("STORAGES['default']"));
    }
}
