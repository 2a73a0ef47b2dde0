use chrono::NaiveDate;
use image::ImageReader;
use log::{debug, info};
use std::io::Cursor;
use std::sync::Arc;
use validator::ValidateArgs;

use crate::api::error;
use crate::modules::file_upload::{
    authorizer::Authorizer,
    model::{first_error_message, UploadConfig, UploadFileForm},
    path::build_upload_path,
    schema::{FileUploadResponse, UploadUser},
    storage::Storage,
};

/// Check that `bytes` decode as an image of a supported format.
pub fn verify_image(bytes: &[u8]) -> Result<(), error::SystemError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|_| error::SystemError::NotAnImage)?;
    reader.decode().map_err(|e| {
        debug!("Image verification failed: {}", e);
        error::SystemError::NotAnImage
    })?;
    Ok(())
}

#[derive(Clone)]
pub struct FileUploadService {
    storage: Arc<dyn Storage>,
    authorizer: Arc<dyn Authorizer>,
    config: UploadConfig,
}

impl FileUploadService {
    pub fn new(
        storage: Arc<dyn Storage>,
        authorizer: Arc<dyn Authorizer>,
        config: UploadConfig,
    ) -> Self {
        info!("FileUploadService initialized with dependencies");
        Self { storage, authorizer, config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Fails with `NotFound` for anonymous callers and callers without upload
    /// permission, so the endpoint looks absent to them.
    pub async fn authorize(
        &self,
        user: Option<UploadUser>,
    ) -> Result<UploadUser, error::SystemError> {
        let Some(user) = user else {
            return Err(error::SystemError::not_found("Page not found."));
        };
        if !self.authorizer.can_upload(&user).await? {
            debug!("User {} is not allowed to upload", user.username);
            return Err(error::SystemError::not_found("Page not found."));
        }
        Ok(user)
    }

    /// Validate the submitted form: image check unless all types are allowed,
    /// then the size and extension checks.
    pub fn validate(&self, form: &UploadFileForm) -> Result<(), error::SystemError> {
        if !self.config.allow_all_file_types {
            verify_image(&form.upload.content)?;
        }

        form.validate_with_args(&self.config).map_err(|errors| {
            let message = first_error_message(&errors, "upload")
                .unwrap_or_else(|| errors.to_string().into());
            error::SystemError::invalid_form(message)
        })
    }

    /// Store the file and return its public URL.
    pub async fn handle_uploaded_file(
        &self,
        user: &UploadUser,
        form: &UploadFileForm,
        today: NaiveDate,
    ) -> Result<String, error::SystemError> {
        let path = build_upload_path(&self.config, &user.username, today, &form.upload.name);
        let stored = self.storage.save(&path, &form.upload.content).await?;
        info!(
            "User {} uploaded {} ({}, {} bytes)",
            user.username,
            stored,
            form.upload.content_type,
            form.upload.size()
        );
        Ok(self.storage.url(&stored))
    }

    /// Validate and persist an upload from an already authorized caller.
    pub async fn upload_file(
        &self,
        user: &UploadUser,
        form: UploadFileForm,
    ) -> Result<FileUploadResponse, error::SystemError> {
        self.validate(&form)?;
        let today = chrono::Local::now().date_naive();
        let url = self.handle_uploaded_file(user, &form, today).await?;
        Ok(FileUploadResponse { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::file_upload::{
        authorizer::StaffAuthorizer, model::UploadedFile, storage_memory::InMemoryStorage,
    };
    use crate::test::png_bytes;
    use uuid::Uuid;

    fn staff() -> UploadUser {
        UploadUser { id: Uuid::now_v7(), username: "alice".into(), is_staff: true }
    }

    fn form(name: &str, content: Vec<u8>) -> UploadFileForm {
        UploadFileForm { upload: UploadedFile::new(name, None, content) }
    }

    fn service(storage: Arc<InMemoryStorage>, config: UploadConfig) -> FileUploadService {
        FileUploadService::new(storage, Arc::new(StaffAuthorizer), config)
    }

    #[test]
    fn test_verify_image_accepts_png() {
        assert!(verify_image(&png_bytes(8, 8)).is_ok());
    }

    #[test]
    fn test_verify_image_rejects_garbage_and_truncated() {
        assert!(matches!(verify_image(b"hello world"), Err(error::SystemError::NotAnImage)));
        let png = png_bytes(8, 8);
        assert!(matches!(verify_image(&png[..png.len() / 2]), Err(error::SystemError::NotAnImage)));
        assert!(matches!(verify_image(&[]), Err(error::SystemError::NotAnImage)));
    }

    #[actix_web::test]
    async fn test_authorize() {
        let svc = service(Arc::new(InMemoryStorage::new("/media/".into())), UploadConfig::default());
        assert_eq!(svc.authorize(Some(staff())).await.unwrap().username, "alice");

        let visitor = UploadUser { is_staff: false, ..staff() };
        assert!(matches!(
            svc.authorize(Some(visitor)).await,
            Err(error::SystemError::NotFound(_))
        ));
        assert!(matches!(svc.authorize(None).await, Err(error::SystemError::NotFound(_))));
    }

    #[test]
    fn test_image_check_runs_before_form_validation() {
        let svc = service(Arc::new(InMemoryStorage::new("/media/".into())), UploadConfig::default());
        let result = svc.validate(&form("notes.dat", b"plain text".to_vec()));
        assert!(matches!(result, Err(error::SystemError::NotAnImage)));
    }

    #[test]
    fn test_allow_all_skips_image_check() {
        let config = UploadConfig { allow_all_file_types: true, ..Default::default() };
        let svc = service(Arc::new(InMemoryStorage::new("/media/".into())), config);
        assert!(svc.validate(&form("notes.png", b"plain text".to_vec())).is_ok());
        assert!(matches!(
            svc.validate(&form("notes.txt", b"plain text".to_vec())),
            Err(error::SystemError::InvalidForm(_))
        ));
    }

    #[actix_web::test]
    async fn test_handle_uploaded_file_uses_namespaced_path() {
        let storage = Arc::new(InMemoryStorage::new("/media/".into()));
        let config = UploadConfig { path_from_username: true, ..Default::default() };
        let svc = service(storage.clone(), config);
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        let url = svc.handle_uploaded_file(&staff(), &form("x.png", png_bytes(4, 4)), today).await.unwrap();

        assert_eq!(url, "/media/alice/2024/03/05/x.png");
        assert!(storage.get("alice/2024/03/05/x.png").await.is_some());
    }

    #[actix_web::test]
    async fn test_rejected_upload_is_not_stored() {
        let storage = Arc::new(InMemoryStorage::new("/media/".into()));
        let config = UploadConfig { max_file_size_mb: Some(0.0001), ..Default::default() };
        let svc = service(storage.clone(), config);

        let result = svc.upload_file(&staff(), form("big.png", png_bytes(64, 64))).await;

        assert!(matches!(result, Err(error::SystemError::InvalidForm(_))));
        assert_eq!(storage.file_count().await, 0);
    }
}
