use actix_cors::Cors;
use actix_web::{
    self,
    middleware::{from_fn, Logger},
    web, App, HttpServer,
};

use crate::{
    configs::build_authorizer,
    constants::Env,
    middlewares::identify,
    modules::file_upload::{create_storage, resolve_storage_backend, FileUploadService},
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Environment variables loaded from .env file");

    let env = Env::from_env().map_err(std::io::Error::other)?;

    let backend = resolve_storage_backend(&env.storage).map_err(std::io::Error::other)?;
    log::info!("Using {:?} storage", backend);
    let storage = create_storage(backend, &env.media).await.map_err(std::io::Error::other)?;

    let authorizer = build_authorizer(&env).await.map_err(std::io::Error::other)?;

    let upload_service = FileUploadService::new(storage, authorizer, env.upload.clone());

    let secret = env.jwt_secret.clone();
    let frontend_url = env.frontend_url.clone();
    let upload_path = env.upload_path.clone();

    println!("Starting server at http://{}:{}", env.ip.as_str(), env.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_methods(vec!["POST"])
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(from_fn(identify(secret.clone())))
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(upload_service.clone()))
            .service(health_check)
            .configure(|cfg| modules::file_upload::route::configure(cfg, &upload_path))
    })
    .bind((env.ip.as_str(), env.port))?
    .workers(2)
    .run()
    .await
}
