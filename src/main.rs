use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use dotenvy::dotenv;
use tera::Tera;

use club_groups::db::establish_connection_pool;
use club_groups::models::config::ServerConfig;
use club_groups::repository::DieselRepository;
use club_groups::repository::cache::GroupCache;
use club_groups::routes::api::{api_v1_group_children, api_v1_groups, api_v1_profile_groups};
use club_groups::routes::groups::{add_group, delete_group, rename_group, show_groups};
use club_groups::routes::main::{index, not_assigned};
use club_groups::routes::profile::{show_profile, toggle_membership, update_profile};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());
    let server_config = match ServerConfig::load(&app_env) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let tera = match Tera::new(&server_config.templates_dir) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to load templates: {e}");
            std::process::exit(1);
        }
    };

    let repo = DieselRepository::new(pool);
    let groups = web::Data::new(GroupCache::new(repo.clone(), repo.feed()));
    let repo = web::Data::new(repo);
    let tera = web::Data::new(tera);

    let secret_key = Key::from(server_config.secret.as_bytes());
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let bind_address = (server_config.address.clone(), server_config.port);
    let server_config = web::Data::new(server_config);

    log::info!("Starting club groups on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .cookie_domain(Some(server_config.domain.clone()))
                    .build(),
            )
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(
                web::scope("/api")
                    .service(api_v1_groups)
                    .service(api_v1_group_children)
                    .service(api_v1_profile_groups),
            )
            .service(index)
            .service(not_assigned)
            .service(show_groups)
            .service(add_group)
            .service(rename_group)
            .service(delete_group)
            .service(show_profile)
            .service(update_profile)
            .service(toggle_membership)
            .app_data(groups.clone())
            .app_data(repo.clone())
            .app_data(tera.clone())
            .app_data(server_config.clone())
    })
    .bind(bind_address)?
    .run()
    .await
}
