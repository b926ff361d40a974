pub mod health;
pub mod profile;
pub mod swagger;
pub mod users;

use actix_web::web;
use std::sync::Arc;

use crate::config::Config;
use crate::database::Store;
use crate::middleware::AuthMiddleware;
use crate::services::auth_service::{Authenticator, JwtStrategy, TokenIssuer};
use crate::utils::json_error;

/// Everything the handlers pull out of app data, built once at startup and
/// cloned into each worker.
#[derive(Clone)]
pub struct AppState {
    pub store: web::Data<dyn Store>,
    pub authenticator: web::Data<dyn Authenticator>,
    pub issuer: web::Data<TokenIssuer>,
    pub config: web::Data<Config>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        let issuer = TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs);
        let authenticator: Arc<dyn Authenticator> =
            Arc::new(JwtStrategy::new(issuer.clone(), store.clone()));

        Self {
            store: web::Data::from(store),
            authenticator: web::Data::from(authenticator),
            issuer: web::Data::new(issuer),
            config: web::Data::new(config),
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.store.clone())
            .app_data(self.authenticator.clone())
            .app_data(self.issuer.clone())
            .app_data(self.config.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error));
        routes(cfg);
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Accounts
        .service(
            web::scope("/api/users")
                .route("/test", web::get().to(users::test_route))
                .route("/register", web::post().to(users::register))
                .route("/login", web::post().to(users::login))
                .service(
                    web::resource("/current")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(users::current)),
                ),
        )
        // Profiles: reads are public, writes act on the caller's own profile
        .service(
            web::scope("/api/profile")
                .route("/test", web::get().to(profile::test_route))
                .route("/all", web::get().to(profile::get_all))
                .route("/handle/{handle}", web::get().to(profile::get_by_handle))
                .route("/user/{user_id}", web::get().to(profile::get_by_user))
                .service(
                    web::resource(["", "/"])
                        .wrap(AuthMiddleware)
                        .route(web::get().to(profile::get_own))
                        .route(web::post().to(profile::upsert))
                        .route(web::delete().to(profile::delete_account)),
                )
                .service(
                    web::resource("/experience")
                        .wrap(AuthMiddleware)
                        .route(web::post().to(profile::add_experience)),
                )
                .service(
                    web::resource("/experience/{exp_id}")
                        .wrap(AuthMiddleware)
                        .route(web::delete().to(profile::remove_experience)),
                )
                .service(
                    web::resource("/education")
                        .wrap(AuthMiddleware)
                        .route(web::post().to(profile::add_education)),
                )
                .service(
                    web::resource("/education/{edu_id}")
                        .wrap(AuthMiddleware)
                        .route(web::delete().to(profile::remove_education)),
                ),
        );
}
