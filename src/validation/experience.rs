use super::{date_range, present};
use crate::models::{ExperienceRequest, NewExperience};
use crate::utils::FieldErrors;

pub fn validate_experience(input: &ExperienceRequest) -> Result<NewExperience, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = present(&input.title);
    if title.is_none() {
        errors.insert("title", "Job title field is required");
    }
    let company = present(&input.company);
    if company.is_none() {
        errors.insert("company", "Company field is required");
    }
    let (from, to) = date_range(&input.from, &input.to, &mut errors);

    match (title, company, from) {
        (Some(title), Some(company), Some(from)) if errors.is_valid() => Ok(NewExperience {
            title: title.to_string(),
            company: company.to_string(),
            location: present(&input.location).map(String::from),
            from,
            to,
            current: input.current.unwrap_or(false),
            description: present(&input.description).map(String::from),
        }),
        _ => Err(errors),
    }
}
