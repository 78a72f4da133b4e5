use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::connect_database,
    middlewares::authentication,
    modules::{
        file::{model::StorageConfig, repository_pg::FileRepositoryPg, service::FileService},
        user::{repository_pg::UserRepositoryPg, service::AuthService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    sqlx::migrate!()
        .run(&db_pool)
        .await
        .map_err(|_| std::io::Error::other("Database migration error"))?;

    let user_repo = UserRepositoryPg::new(db_pool.clone());
    let file_repo = FileRepositoryPg::new(db_pool.clone());

    let auth_service = AuthService::with_dependencies(
        Arc::new(user_repo),
        ENV.jwt_secret.clone(),
        ENV.token_expiration,
    );

    let storage_config =
        StorageConfig { upload_dir: ENV.upload_dir.clone().into(), ..StorageConfig::default() };
    let file_service = FileService::with_dependencies(Arc::new(file_repo), storage_config);

    println!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(file_service.clone()))
            .service(health_check)
            .service(
                web::scope("/api").configure(modules::user::route::public_api_configure).service(
                    web::scope("")
                        .wrap(from_fn(authentication))
                        .configure(modules::file::route::configure),
                ),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
