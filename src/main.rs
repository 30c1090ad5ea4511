use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{RedisCache, connect_database},
    middlewares::authentication,
    modules::{
        comment::{repository_pg::CommentRepositoryPg, service::CommentService},
        post::{repository_pg::PostRepositoryPg, service::PostService},
        relationship::{repository_pg::RelationshipRepositoryPg, service::RelationshipService},
        user::{repository_pg::UserRepositoryPg, service::UserService},
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

    let redis_pool =
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?;

    let user_repo = UserRepositoryPg::new(db_pool.clone());
    let relationship_repo = RelationshipRepositoryPg::new(db_pool.clone());
    let post_repo = Arc::new(PostRepositoryPg::new(db_pool.clone()));
    let comment_repo = CommentRepositoryPg::new(db_pool.clone());

    let user_service =
        UserService::with_dependencies(Arc::new(user_repo), Arc::new(redis_pool));
    let relationship_service =
        RelationshipService::with_dependencies(Arc::new(relationship_repo));
    let post_service = PostService::with_dependencies(post_repo.clone());
    let comment_service = CommentService::with_dependencies(Arc::new(comment_repo), post_repo);

    println!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(relationship_service.clone()))
            .app_data(web::Data::new(post_service.clone()))
            .app_data(web::Data::new(comment_service.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .service(health_check)
            .service(
                web::scope("/api").configure(modules::user::route::public_api_configure).service(
                    web::scope("")
                        .wrap(from_fn(authentication))
                        .configure(modules::user::route::configure)
                        .configure(modules::relationship::route::configure)
                        .configure(modules::post::route::configure),
                ),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
