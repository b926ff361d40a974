use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::config::{Config, StorageKind};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// `mongodb` or `memory`
    pub storage: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(config: web::Data<Config>) -> HttpResponse {
    let storage = match config.storage() {
        StorageKind::MongoDB => "mongodb",
        StorageKind::Memory => "memory",
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: storage.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
