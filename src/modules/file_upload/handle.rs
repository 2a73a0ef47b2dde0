use actix_multipart::Multipart;
use actix_web::{mime, web, HttpMessage, HttpRequest};
use futures_util::TryStreamExt;

use crate::api::{error, success::Success};
use crate::middlewares::get_claims;
use crate::modules::file_upload::{
    model::{size_limit_message, UploadConfig, UploadFileForm, UploadedFile},
    schema::{FileUploadResponse, UploadUser},
    service::FileUploadService,
};

const UPLOAD_FIELD: &str = "upload";

/// Read the multipart payload and keep the `upload` file. Other parts are
/// drained and ignored. Reading stops as soon as the file outgrows the
/// configured size limit.
async fn read_upload_form(
    mut payload: Multipart,
    config: &UploadConfig,
) -> Result<UploadFileForm, error::Error> {
    let mut upload = None;

    while let Some(mut field) =
        payload.try_next().await.map_err(|_| error::Error::bad_request("Invalid multipart payload"))?
    {
        let filename = field
            .content_disposition()
            .filter(|cd| cd.get_name() == Some(UPLOAD_FIELD))
            .and_then(|cd| cd.get_filename())
            .map(|name| name.to_string())
            .filter(|_| upload.is_none());
        let content_type = field.content_type().map(|m| m.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) =
            field.try_next().await.map_err(|_| error::Error::bad_request("Upload read error"))?
        {
            if filename.is_none() {
                continue;
            }
            bytes.extend_from_slice(&chunk);
            if let (Some(limit_mb), Some(limit_bytes)) =
                (config.max_file_size_mb, config.max_file_size_bytes())
            {
                if bytes.len() as f64 > limit_bytes {
                    return Err(error::Error::bad_request(size_limit_message(limit_mb)));
                }
            }
        }

        if let Some(name) = filename {
            upload = Some(UploadedFile::new(name, content_type, bytes));
        }
    }

    let upload = upload.ok_or_else(|| error::Error::bad_request("This field is required."))?;
    Ok(UploadFileForm { upload })
}

/// Editor upload endpoint
pub async fn upload_file(
    req: HttpRequest,
    payload: Multipart,
    service: web::Data<FileUploadService>,
) -> Result<Success<FileUploadResponse>, error::Error> {
    let is_form_data = matches!(
        req.mime_type(),
        Ok(Some(m)) if m.type_() == mime::MULTIPART && m.subtype() == mime::FORM_DATA
    );
    if !is_form_data {
        return Err(error::Error::page_not_found());
    }

    let user = service.authorize(get_claims(&req).map(UploadUser::from)).await?;

    let form = read_upload_form(payload, service.config()).await?;
    let result = service.upload_file(&user, form).await?;
    Ok(Success::ok(result))
}

/// Any other method on the upload resource.
pub async fn not_found() -> Result<Success<()>, error::Error> {
    Err(error::Error::page_not_found())
}
