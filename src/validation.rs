use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{LoginRequest, ProfileRequest, RegisterRequest};

/// Field-keyed validation messages, e.g. `{"text": "Text field is required"}`.
/// Serialized verbatim as the 400 response body when validation fails.
pub type FieldErrors = BTreeMap<&'static str, String>;

// Deliberately loose: one non-space run, an '@', a dot somewhere in the
// domain. Real verification happens out of band; this only catches typos.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// ValidationOutcome
///
/// The result of checking one incoming payload: a mapping of field name to
/// error message plus a validity flag. An empty map means the payload passed.
#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub errors: FieldErrors,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// validate_post_input
///
/// Shared by post creation and comment creation: both carry a free-text body
/// with the same constraints. The required check wins over the length check
/// so an empty submission reports a single, actionable message.
pub fn validate_post_input(text: &str) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    let trimmed = text.trim();

    if trimmed.is_empty() {
        outcome
            .errors
            .insert("text", "Text field is required".to_string());
    } else if !(10..=300).contains(&trimmed.chars().count()) {
        outcome.errors.insert(
            "text",
            "Post must be between 10 and 300 characters".to_string(),
        );
    }

    outcome
}

/// validate_register_input
///
/// Shape checks for new-user registration. Uniqueness of the email is a
/// repository concern and checked separately by the handler.
pub fn validate_register_input(req: &RegisterRequest) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    let name = req.name.trim();
    if name.is_empty() {
        outcome
            .errors
            .insert("name", "Name field is required".to_string());
    } else if !(2..=30).contains(&name.chars().count()) {
        outcome.errors.insert(
            "name",
            "Name must be between 2 and 30 characters".to_string(),
        );
    }

    check_email(&mut outcome, &req.email);

    let password = req.password.trim();
    if password.is_empty() {
        outcome
            .errors
            .insert("password", "Password field is required".to_string());
    } else if !(6..=30).contains(&password.chars().count()) {
        outcome.errors.insert(
            "password",
            "Password must be between 6 and 30 characters".to_string(),
        );
    }

    outcome
}

/// validate_login_input
pub fn validate_login_input(req: &LoginRequest) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    check_email(&mut outcome, &req.email);

    if req.password.trim().is_empty() {
        outcome
            .errors
            .insert("password", "Password field is required".to_string());
    }

    outcome
}

/// validate_profile_input
///
/// The handle, status, and skills fields are mandatory; everything else on
/// the profile is optional.
pub fn validate_profile_input(req: &ProfileRequest) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    let handle = req.handle.trim();
    if handle.is_empty() {
        outcome
            .errors
            .insert("handle", "Profile handle is required".to_string());
    } else if !(2..=40).contains(&handle.chars().count()) {
        outcome.errors.insert(
            "handle",
            "Handle must be between 2 and 40 characters".to_string(),
        );
    }

    if req.status.trim().is_empty() {
        outcome
            .errors
            .insert("status", "Status field is required".to_string());
    }

    if req.skills_list().is_empty() {
        outcome
            .errors
            .insert("skills", "Skills field is required".to_string());
    }

    outcome
}

fn check_email(outcome: &mut ValidationOutcome, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        outcome
            .errors
            .insert("email", "Email field is required".to_string());
    } else if !EMAIL_RE.is_match(email) {
        outcome
            .errors
            .insert("email", "Email is invalid".to_string());
    }
}
