pub mod repository;
pub mod repository_pg;

pub use repository_pg::OrganisationRepositoryPg;
