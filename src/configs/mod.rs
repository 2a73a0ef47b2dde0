use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;

use crate::{
    api::error::{self, ConfigError},
    constants::Env,
    modules::{
        file_upload::{Authorizer, StaffAuthorizer, StaffOrOrganisationAuthorizer, UploadPermission},
        organisation::OrganisationRepositoryPg,
    },
};

pub async fn connect_database(database_url: &str) -> Result<PgPool, error::SystemError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Build the configured upload permission check. The organisation variant
/// needs a database to look memberships up.
pub async fn build_authorizer(env: &Env) -> Result<Arc<dyn Authorizer>, error::SystemError> {
    match env.upload_permission {
        UploadPermission::Staff => Ok(Arc::new(StaffAuthorizer)),
        UploadPermission::StaffOrOrganisation => {
            let database_url = env.database_url.as_deref().ok_or_else(|| {
                ConfigError::PermissionRequiresDatabase("staff_or_organisation".to_string())
            })?;
            let pool = connect_database(database_url).await?;
            log::info!("Organisation membership lookups enabled");
            Ok(Arc::new(StaffOrOrganisationAuthorizer::new(Arc::new(
                OrganisationRepositoryPg::new(pool),
            ))))
        }
    }
}
