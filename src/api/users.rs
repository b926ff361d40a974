use actix_web::{web, HttpResponse};

use crate::config::Config;
use crate::database::Store;
use crate::models::{Identity, LoginRequest, RegisterRequest, UserResponse};
use crate::services::auth_service::{self, CurrentUserResponse, LoginResponse, TokenIssuer};
use crate::utils::{AppError, FieldErrors};

/// GET /api/users/test - liveness stub
pub async fn test_route() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "msg": "Users works" }))
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation errors or email already registered", body = FieldErrors)
    )
)]
pub async fn register(
    db: web::Data<dyn Store>,
    config: web::Data<Config>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("📝 POST /users/register - email: {}", email);

    match auth_service::register(db.get_ref(), &request, config.bcrypt_cost).await {
        Ok(user) => Ok(HttpResponse::Ok().json(user)),
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation errors or wrong password", body = FieldErrors),
        (status = 404, description = "No account for this email", body = FieldErrors)
    )
)]
pub async fn login(
    db: web::Data<dyn Store>,
    issuer: web::Data<TokenIssuer>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("🔐 POST /users/login - email: {}", email);

    match auth_service::login(db.get_ref(), &issuer, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", email);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/users/current",
    tag = "Users",
    responses(
        (status = 200, description = "Authenticated account", body = CurrentUserResponse),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn current(identity: web::ReqData<Identity>) -> HttpResponse {
    log::info!("👤 GET /users/current - user: {}", identity.id);
    HttpResponse::Ok().json(auth_service::current_user(&identity))
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{login_token, register_account, test_state};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_liveness() {
        let state = test_state();
        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

        let req = test::TestRequest::get().uri("/api/users/test").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "msg": "Users works" }));
    }

    #[actix_web::test]
    async fn test_register_response_excludes_password() {
        let state = test_state();
        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "password": "secret1",
                "password2": "secret1"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["email"], "jane@example.com");
        assert!(body["_id"].is_string());
        assert!(body.get("password").is_none());
    }

    #[actix_web::test]
    async fn test_register_conflict_and_validation() {
        let state = test_state();
        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
        register_account(&state, "Jane Doe", "jane@example.com", "secret1").await;

        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(json!({
                "name": "Impostor",
                "email": "jane@example.com",
                "password": "secret2",
                "password2": "secret2"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "email": "Email already exists" }));

        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(json!({ "email": "bad" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["email"], "Email is invalid");
        assert_eq!(body["name"], "Name field is required");
    }

    #[actix_web::test]
    async fn test_unreadable_bodies_answer_with_field_errors() {
        let state = test_state();
        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers().get("content-type").unwrap(), "application/json");
        let body: Value = test::read_body_json(resp).await;
        assert!(body["body"].is_string());

        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .set_payload("name=Jane&email=jane%40example.com")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "body": "Request body must be JSON" }));
    }

    #[actix_web::test]
    async fn test_login_errors() {
        let state = test_state();
        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
        register_account(&state, "Jane Doe", "jane@example.com", "secret1").await;

        let req = test::TestRequest::post()
            .uri("/api/users/login")
            .set_json(json!({ "email": "nobody@example.com", "password": "secret1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/users/login")
            .set_json(json!({ "email": "jane@example.com", "password": "wrong-pass" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "password": "Password incorrect" }));
    }

    #[actix_web::test]
    async fn test_current_user_with_token() {
        let state = test_state();
        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
        let user = register_account(&state, "Jane Doe", "jane@example.com", "secret1").await;
        let token = login_token(&state, "jane@example.com", "secret1").await;

        let req = test::TestRequest::get()
            .uri("/api/users/current")
            .insert_header(("Authorization", token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({ "id": user.id, "name": "Jane Doe", "email": "jane@example.com" })
        );
    }

    #[actix_web::test]
    async fn test_current_user_requires_token() {
        let state = test_state();
        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

        let req = test::TestRequest::get().uri("/api/users/current").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/users/current")
            .insert_header(("Authorization", "Bearer garbage"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
