use actix_web::middleware::DefaultHeaders;

/// Hardening headers added to every response. Headers a handler already set
/// are left alone.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
}
