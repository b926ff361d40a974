/// Gravatar URL for an email: 200px, "pg" rating, mystery-man fallback.
pub fn gravatar_url(email: &str) -> String {
    let digest = md5::compute(email.trim().to_lowercase().as_bytes());
    format!("//www.gravatar.com/avatar/{:x}?s=200&r=pg&d=mm", digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravatar_is_case_insensitive() {
        assert_eq!(gravatar_url("Jane@Example.com "), gravatar_url("jane@example.com"));
    }

    #[test]
    fn test_gravatar_known_hash() {
        // md5("test@example.com")
        assert_eq!(
            gravatar_url("test@example.com"),
            "//www.gravatar.com/avatar/55502f40dc8b7c769880b10874abc9d0?s=200&r=pg&d=mm"
        );
    }
}
