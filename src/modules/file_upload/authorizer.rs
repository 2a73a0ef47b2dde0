use std::str::FromStr;
use std::sync::Arc;

use crate::api::error::{self, ConfigError};
use crate::modules::file_upload::schema::UploadUser;
use crate::modules::organisation::repository::OrganisationRepository;

/// Decides whether a caller may upload files.
#[async_trait::async_trait]
pub trait Authorizer: Send + Sync {
    async fn can_upload(&self, user: &UploadUser) -> Result<bool, error::SystemError>;
}

pub struct StaffAuthorizer;

#[async_trait::async_trait]
impl Authorizer for StaffAuthorizer {
    async fn can_upload(&self, user: &UploadUser) -> Result<bool, error::SystemError> {
        Ok(user.is_staff)
    }
}

/// Staff, or anyone who is a member of at least one organisation.
pub struct StaffOrOrganisationAuthorizer {
    organisations: Arc<dyn OrganisationRepository + Send + Sync>,
}

impl StaffOrOrganisationAuthorizer {
    pub fn new(organisations: Arc<dyn OrganisationRepository + Send + Sync>) -> Self {
        Self { organisations }
    }
}

#[async_trait::async_trait]
impl Authorizer for StaffOrOrganisationAuthorizer {
    async fn can_upload(&self, user: &UploadUser) -> Result<bool, error::SystemError> {
        if user.is_staff {
            return Ok(true);
        }
        self.organisations.has_membership(&user.id).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPermission {
    #[default]
    Staff,
    StaffOrOrganisation,
}

impl FromStr for UploadPermission {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "staff" => Ok(Self::Staff),
            "staff_or_organisation" | "staff_or_organization" => Ok(Self::StaffOrOrganisation),
            _ => Err(ConfigError::InvalidValue {
                name: "CKEDITOR_5_UPLOAD_PERMISSION",
                value: value.to_string(),
            }),
        }
    }
}
