use uuid::Uuid;

use crate::{api::error, modules::organisation::repository::OrganisationRepository};

#[derive(Clone)]
pub struct OrganisationRepositoryPg {
    pool: sqlx::PgPool,
}

impl OrganisationRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OrganisationRepository for OrganisationRepositoryPg {
    async fn has_membership(&self, user_id: &Uuid) -> Result<bool, error::SystemError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM organisation_members WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
