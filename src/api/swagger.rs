use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DevConnector API",
        version = "1.0.0",
        description = "Developer network backend: accounts and public developer profiles.\n\n**Authentication:** register, then log in to get a `Bearer <jwt>` token. Send it back in the `Authorization` header on protected endpoints."
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Users
        crate::api::users::register,
        crate::api::users::login,
        crate::api::users::current,

        // Profiles
        crate::api::profile::get_own,
        crate::api::profile::upsert,
        crate::api::profile::delete_account,
        crate::api::profile::get_all,
        crate::api::profile::get_by_handle,
        crate::api::profile::get_by_user,
        crate::api::profile::add_experience,
        crate::api::profile::remove_experience,
        crate::api::profile::add_education,
        crate::api::profile::remove_education,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,

            // Users
            crate::models::RegisterRequest,
            crate::models::LoginRequest,
            crate::models::UserResponse,
            crate::models::UserSummary,
            crate::services::auth_service::LoginResponse,
            crate::services::auth_service::CurrentUserResponse,

            // Profiles
            crate::models::ProfileRequest,
            crate::models::ExperienceRequest,
            crate::models::EducationRequest,
            crate::models::ProfileView,
            crate::models::Social,
            crate::models::Experience,
            crate::models::Education,
            crate::services::profile_service::DeleteAccountResponse,

            crate::utils::FieldErrors,
        )
    ),
    tags(
        (name = "Health", description = "Service health check."),
        (name = "Users", description = "Registration, login and the authenticated account."),
        (name = "Profile", description = "Developer profiles. Reads are public; writes act on the caller's own profile."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Paste the token returned by /api/users/login, without the `Bearer ` prefix"))
                        .build()
                ),
            );
        }
    }
}
