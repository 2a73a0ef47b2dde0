use uuid::Uuid;

use crate::api::error;

#[async_trait::async_trait]
pub trait OrganisationRepository {
    /// Whether the user belongs to at least one organisation.
    async fn has_membership(&self, user_id: &Uuid) -> Result<bool, error::SystemError>;
}
