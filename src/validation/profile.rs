use super::{is_url, length_between, present};
use crate::models::{Field, ProfileRequest, ProfileUpdate, SocialUpdate};
use crate::utils::FieldErrors;

pub fn validate_profile(input: &ProfileRequest) -> Result<ProfileUpdate, FieldErrors> {
    let mut errors = FieldErrors::new();

    match present(&input.handle) {
        None => errors.insert("handle", "Profile handle is required"),
        Some(handle) if !length_between(handle, 2, 40) => {
            errors.insert("handle", "Handle needs to be between 2 and 40 characters")
        }
        Some(_) => {}
    }

    if present(&input.status).is_none() {
        errors.insert("status", "Status field is required");
    }

    let skills = present(&input.skills).map(split_skills).unwrap_or_default();
    if skills.is_empty() {
        errors.insert("skills", "Skills field is required");
    }

    let links = [
        ("website", &input.website),
        ("youtube", &input.youtube),
        ("twitter", &input.twitter),
        ("facebook", &input.facebook),
        ("linkedin", &input.linkedin),
        ("instagram", &input.instagram),
    ];
    for (field, value) in links {
        if let Some(url) = present(value) {
            if !is_url(url) {
                errors.insert(field, "Not a valid URL");
            }
        }
    }

    let field = |value: &Option<String>| Field::from_input(value.as_deref());

    errors.into_result(ProfileUpdate {
        handle: field(&input.handle),
        company: field(&input.company),
        website: field(&input.website),
        location: field(&input.location),
        status: field(&input.status),
        bio: field(&input.bio),
        githubusername: field(&input.githubusername),
        skills: Field::Set(skills),
        social: SocialUpdate {
            youtube: field(&input.youtube),
            twitter: field(&input.twitter),
            facebook: field(&input.facebook),
            linkedin: field(&input.linkedin),
            instagram: field(&input.instagram),
        },
    })
}

fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(String::from)
        .collect()
}
