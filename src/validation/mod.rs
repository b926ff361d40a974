//! Request input rules.
//!
//! Each validator is a pure function from raw request input to either the
//! cleaned value the services work with or the full map of field errors.

pub mod education;
pub mod experience;
pub mod login;
pub mod profile;
pub mod register;

pub use education::validate_education;
pub use experience::validate_experience;
pub use login::validate_login;
pub use profile::validate_profile;
pub use register::validate_register;

use chrono::{DateTime, NaiveDate, Utc};

use crate::utils::FieldErrors;

/// Trimmed, non-blank value of an optional input.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn length_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

pub(crate) fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains("..")
        }
        None => false,
    }
}

/// Accepts `http(s)://` and scheme-less addresses with a dotted host.
pub(crate) fn is_url(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value);
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = host.rsplit('@').next().unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();

    let labels: Vec<&str> = host.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
        && labels
            .last()
            .map(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
            .unwrap_or(false)
}

/// `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub(crate) fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Shared `from`/`to` rules of experience and education entries.
pub(crate) fn date_range(
    from: &Option<String>,
    to: &Option<String>,
    errors: &mut FieldErrors,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let from = match present(from) {
        None => {
            errors.insert("from", "From date field is required");
            None
        }
        Some(raw) => {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                errors.insert("from", "From date is invalid");
            }
            parsed
        }
    };

    let to = present(to).and_then(|raw| {
        let parsed = parse_date(raw);
        if parsed.is_none() {
            errors.insert("to", "To date is invalid");
        }
        parsed
    });

    (from, to)
}
