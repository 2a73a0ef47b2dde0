use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::Claims;

/// Caller identity as seen by the upload endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadUser {
    pub id: Uuid,
    pub username: String,
    pub is_staff: bool,
}

impl From<Claims> for UploadUser {
    fn from(claims: Claims) -> Self {
        UploadUser { id: claims.sub, username: claims.username, is_staff: claims.is_staff }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileUploadResponse {
    pub url: String,
}
