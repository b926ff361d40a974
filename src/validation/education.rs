use super::{date_range, present};
use crate::models::{EducationRequest, NewEducation};
use crate::utils::FieldErrors;

pub fn validate_education(input: &EducationRequest) -> Result<NewEducation, FieldErrors> {
    let mut errors = FieldErrors::new();

    let school = present(&input.school);
    if school.is_none() {
        errors.insert("school", "School field is required");
    }
    let degree = present(&input.degree);
    if degree.is_none() {
        errors.insert("degree", "Degree field is required");
    }
    let fieldofstudy = present(&input.fieldofstudy);
    if fieldofstudy.is_none() {
        errors.insert("fieldofstudy", "Field of study field is required");
    }
    let (from, to) = date_range(&input.from, &input.to, &mut errors);

    match (school, degree, fieldofstudy, from) {
        (Some(school), Some(degree), Some(fieldofstudy), Some(from)) if errors.is_valid() => {
            Ok(NewEducation {
                school: school.to_string(),
                degree: degree.to_string(),
                fieldofstudy: fieldofstudy.to_string(),
                from,
                to,
                current: input.current.unwrap_or(false),
                description: present(&input.description).map(String::from),
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_education() {
        let entry = validate_education(&EducationRequest {
            school: Some("MIT".to_string()),
            degree: Some("BSc".to_string()),
            fieldofstudy: Some("Computer Science".to_string()),
            from: Some("2010-09-01".to_string()),
            to: Some("2014-06-30".to_string()),
            description: Some("  ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(entry.school, "MIT");
        assert!(entry.to.is_some());
        assert!(!entry.current);
        assert!(entry.description.is_none());
    }

    #[test]
    fn test_required_fields() {
        let errors = validate_education(&EducationRequest::default()).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("fieldofstudy"), Some("Field of study field is required"));
    }
}
