use actix_web::web;

use crate::modules::file_upload::handle::{not_found, upload_file};

/// Mount the upload endpoint at `path`. Only POST is served; every other
/// method answers like an unknown route.
pub fn configure(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(
        web::resource(path)
            .route(web::post().to(upload_file))
            .default_service(web::route().to(not_found)),
    );
}
