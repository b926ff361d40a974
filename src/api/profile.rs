use actix_web::{web, HttpResponse};

use crate::database::Store;
use crate::models::{EducationRequest, ExperienceRequest, Identity, ProfileRequest, ProfileView};
use crate::services::profile_service::{self, DeleteAccountResponse};
use crate::utils::{AppError, FieldErrors};

/// GET /api/profile/test - liveness stub
pub async fn test_route() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "msg": "Profile works" }))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Caller's profile", body = ProfileView),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "Caller has no profile", body = FieldErrors)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_own(
    db: web::Data<dyn Store>,
    identity: web::ReqData<Identity>,
) -> Result<HttpResponse, AppError> {
    log::info!("📄 GET /profile - user: {}", identity.id);
    let profile = profile_service::get_own_profile(db.get_ref(), &identity).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    post,
    path = "/api/profile",
    tag = "Profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile created or updated", body = ProfileView),
        (status = 400, description = "Validation errors or handle taken", body = FieldErrors),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upsert(
    db: web::Data<dyn Store>,
    identity: web::ReqData<Identity>,
    request: web::Json<ProfileRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "✏️  POST /profile - user: {}, handle: {}",
        identity.id,
        request.handle.as_deref().unwrap_or("N/A")
    );

    match profile_service::upsert_profile(db.get_ref(), &identity, &request).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(profile)),
        Err(e) => {
            log::warn!("❌ Profile save failed for {}: {}", identity.id, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Profile and account deleted", body = DeleteAccountResponse),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_account(
    db: web::Data<dyn Store>,
    identity: web::ReqData<Identity>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️  DELETE /profile - user: {}", identity.id);
    let response = profile_service::delete_account(db.get_ref(), &identity).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    get,
    path = "/api/profile/all",
    tag = "Profile",
    responses(
        (status = 200, description = "Every profile with its owner", body = Vec<ProfileView>),
        (status = 404, description = "No profiles exist", body = FieldErrors)
    )
)]
pub async fn get_all(db: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /profile/all");
    let profiles = profile_service::list_profiles(db.get_ref()).await?;
    log::info!("✅ Returning {} profiles", profiles.len());
    Ok(HttpResponse::Ok().json(profiles))
}

#[utoipa::path(
    get,
    path = "/api/profile/handle/{handle}",
    tag = "Profile",
    params(
        ("handle" = String, Path, description = "Public profile handle")
    ),
    responses(
        (status = 200, description = "Profile found", body = ProfileView),
        (status = 404, description = "No profile with this handle", body = FieldErrors)
    )
)]
pub async fn get_by_handle(
    db: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let handle = path.into_inner();
    log::info!("🔍 GET /profile/handle/{}", handle);
    let profile = profile_service::get_profile_by_handle(db.get_ref(), &handle).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    get,
    path = "/api/profile/user/{user_id}",
    tag = "Profile",
    params(
        ("user_id" = String, Path, description = "Owning account id")
    ),
    responses(
        (status = 200, description = "Profile found", body = ProfileView),
        (status = 404, description = "No profile for this account", body = FieldErrors)
    )
)]
pub async fn get_by_user(
    db: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    log::info!("🔍 GET /profile/user/{}", user_id);
    let profile = profile_service::get_profile_by_user(db.get_ref(), &user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    post,
    path = "/api/profile/experience",
    tag = "Profile",
    request_body = ExperienceRequest,
    responses(
        (status = 200, description = "Entry added at the front of the list", body = ProfileView),
        (status = 400, description = "Validation errors", body = FieldErrors),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "Caller has no profile", body = FieldErrors)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_experience(
    db: web::Data<dyn Store>,
    identity: web::ReqData<Identity>,
    request: web::Json<ExperienceRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("➕ POST /profile/experience - user: {}", identity.id);
    let profile = profile_service::add_experience(db.get_ref(), &identity, &request).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    delete,
    path = "/api/profile/experience/{exp_id}",
    tag = "Profile",
    params(
        ("exp_id" = String, Path, description = "Experience entry id")
    ),
    responses(
        (status = 200, description = "Entry removed (unknown ids are ignored)", body = ProfileView),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "Caller has no profile", body = FieldErrors)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_experience(
    db: web::Data<dyn Store>,
    identity: web::ReqData<Identity>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let exp_id = path.into_inner();
    log::info!("➖ DELETE /profile/experience/{} - user: {}", exp_id, identity.id);
    let profile = profile_service::remove_experience(db.get_ref(), &identity, &exp_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    post,
    path = "/api/profile/education",
    tag = "Profile",
    request_body = EducationRequest,
    responses(
        (status = 200, description = "Entry added at the front of the list", body = ProfileView),
        (status = 400, description = "Validation errors", body = FieldErrors),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "Caller has no profile", body = FieldErrors)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_education(
    db: web::Data<dyn Store>,
    identity: web::ReqData<Identity>,
    request: web::Json<EducationRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("➕ POST /profile/education - user: {}", identity.id);
    let profile = profile_service::add_education(db.get_ref(), &identity, &request).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    delete,
    path = "/api/profile/education/{edu_id}",
    tag = "Profile",
    params(
        ("edu_id" = String, Path, description = "Education entry id")
    ),
    responses(
        (status = 200, description = "Entry removed (unknown ids are ignored)", body = ProfileView),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "Caller has no profile", body = FieldErrors)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_education(
    db: web::Data<dyn Store>,
    identity: web::ReqData<Identity>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let edu_id = path.into_inner();
    log::info!("➖ DELETE /profile/education/{} - user: {}", edu_id, identity.id);
    let profile = profile_service::remove_education(db.get_ref(), &identity, &edu_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}
