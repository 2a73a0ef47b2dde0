pub mod authorizer;
pub mod handle;
pub mod model;
pub mod path;
pub mod route;
pub mod schema;
pub mod service;
pub mod storage;
pub mod storage_fs;
pub mod storage_memory;

pub use authorizer::{Authorizer, StaffAuthorizer, StaffOrOrganisationAuthorizer, UploadPermission};
pub use service::FileUploadService;
pub use storage::{create_storage, resolve_storage_backend};
