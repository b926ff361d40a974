mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;
mod validation;

use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{Config, StorageKind};
use crate::database::Store;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().unwrap_or_else(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::process::exit(1);
    });

    log::info!("🚀 Starting DevConnector Service...");

    let store: Arc<dyn Store> = match config.storage() {
        StorageKind::Memory => {
            log::warn!("⚠️  Using in-memory storage, data is lost on restart");
            Arc::new(database::MemoryStore::new())
        }
        StorageKind::MongoDB => {
            let db = database::MongoDB::new(&config.database_url)
                .await
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
            log::info!("✅ MongoDB connected successfully");
            Arc::new(db)
        }
    };

    let host = config.host.clone();
    let port = config.port;
    let cors_origins = config.cors_origins.clone();
    let state = api::AppState::new(config, store);

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();
        let state = state.clone();

        App::new()
            .wrap(cors)
            .wrap(middleware::security_headers())
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(|cfg| state.configure(cfg))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
