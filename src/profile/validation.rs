//! Client-side validation of profile form fields.
//!
//! The contract stores fields as fixed-length `string-ascii` values and
//! bounded lists; validating here surfaces friendly per-field messages
//! instead of an opaque on-chain abort.

use super::ProfileForm;
use serde::Serialize;
use std::fmt;

/// Field length and count limits mirroring the contract schema.
#[derive(Debug, Clone, Copy)]
pub struct ValidationLimits {
    pub display_name_max: usize,
    pub bio_max: usize,
    pub location_max: usize,
    pub website_max: usize,
    pub username_max: usize,
    pub skills_max: usize,
    pub specialties_max: usize,
    pub tag_max: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            display_name_max: 50,
            bio_max: 500,
            location_max: 100,
            website_max: 255,
            username_max: 50,
            skills_max: 20,
            specialties_max: 10,
            tag_max: 50,
        }
    }
}

/// A single field-specific validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a form against the default limits. All failures are
/// collected rather than stopping at the first one.
pub fn validate_form(form: &ProfileForm) -> Result<(), Vec<FieldError>> {
    validate_form_with(form, &ValidationLimits::default())
}

pub fn validate_form_with(
    form: &ProfileForm,
    limits: &ValidationLimits,
) -> Result<(), Vec<FieldError>> {
    let form = form.trimmed();
    let mut errors = Vec::new();

    if form.display_name.is_empty() {
        errors.push(FieldError::new("display_name", "Display name is required"));
    }
    check_ascii_max(&mut errors, "display_name", &form.display_name, limits.display_name_max);

    if form.bio.is_empty() {
        errors.push(FieldError::new("bio", "Bio is required"));
    }
    check_ascii_max(&mut errors, "bio", &form.bio, limits.bio_max);

    check_ascii_max(&mut errors, "location", &form.location, limits.location_max);
    check_ascii_max(&mut errors, "website", &form.website, limits.website_max);
    check_ascii_max(&mut errors, "github_username", &form.github_username, limits.username_max);
    check_ascii_max(&mut errors, "twitter_username", &form.twitter_username, limits.username_max);
    check_ascii_max(&mut errors, "linkedin_username", &form.linkedin_username, limits.username_max);

    if form.skills.is_empty() {
        errors.push(FieldError::new("skills", "Select at least one skill"));
    }
    if form.skills.len() > limits.skills_max {
        errors.push(FieldError::new(
            "skills",
            format!("At most {} skills allowed", limits.skills_max),
        ));
    }
    if form.specialties.len() > limits.specialties_max {
        errors.push(FieldError::new(
            "specialties",
            format!("At most {} specialties allowed", limits.specialties_max),
        ));
    }

    for (field, entries) in [("skills", &form.skills), ("specialties", &form.specialties)] {
        for entry in entries {
            check_ascii_max(&mut errors, field, entry, limits.tag_max);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_ascii_max(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) {
    if !value.is_ascii() {
        errors.push(FieldError::new(
            field,
            "Only ASCII characters are supported on-chain",
        ));
        return;
    }
    if value.len() > max {
        errors.push(FieldError::new(
            field,
            format!("Exceeds maximum length of {max} characters"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ProfileForm {
        ProfileForm {
            display_name: "Alice".to_string(),
            bio: "Clarity developer".to_string(),
            skills: vec!["Clarity Smart Contracts".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate_form(&valid_form()).is_ok());
    }

    #[test]
    fn test_display_name_at_limit_accepted() {
        let form = ProfileForm {
            display_name: "a".repeat(50),
            ..valid_form()
        };
        assert!(validate_form(&form).is_ok());
    }

    #[test]
    fn test_display_name_over_limit_rejected() {
        let form = ProfileForm {
            display_name: "a".repeat(51),
            ..valid_form()
        };
        let errors = validate_form(&form).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "display_name"));
    }

    #[test]
    fn test_bio_at_limit_accepted() {
        let form = ProfileForm {
            bio: "b".repeat(500),
            ..valid_form()
        };
        assert!(validate_form(&form).is_ok());
    }

    #[test]
    fn test_bio_over_limit_rejected() {
        let form = ProfileForm {
            bio: "b".repeat(501),
            ..valid_form()
        };
        assert!(validate_form(&form).is_err());
    }

    #[test]
    fn test_missing_required_fields_collected() {
        let errors = validate_form(&ProfileForm::default()).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"display_name"));
        assert!(fields.contains(&"bio"));
        assert!(fields.contains(&"skills"));
    }

    #[test]
    fn test_too_many_skills_rejected() {
        let form = ProfileForm {
            skills: (0..21).map(|i| format!("skill-{i}")).collect(),
            ..valid_form()
        };
        let errors = validate_form(&form).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "skills"));
    }

    #[test]
    fn test_too_many_specialties_rejected() {
        let form = ProfileForm {
            specialties: (0..11).map(|i| format!("area-{i}")).collect(),
            ..valid_form()
        };
        assert!(validate_form(&form).is_err());
    }

    #[test]
    fn test_non_ascii_rejected() {
        let form = ProfileForm {
            display_name: "Ålice".to_string(),
            ..valid_form()
        };
        let errors = validate_form(&form).unwrap_err();
        assert!(errors[0].message.contains("ASCII"));
    }

    #[test]
    fn test_trailing_whitespace_does_not_break_limit() {
        // 50 chars of content plus surrounding whitespace still passes
        let form = ProfileForm {
            display_name: format!("  {}  ", "a".repeat(50)),
            ..valid_form()
        };
        assert!(validate_form(&form).is_ok());
    }
}
