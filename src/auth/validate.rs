//! Structural validation of operator-supplied input.
//!
//! These checks guard the login and admin-config endpoints. They are not a
//! substitute for the content validator: `sanitize_string` is a best-effort
//! display sanitizer for short config fields, nothing more.

use regex::Regex;
use std::sync::OnceLock;

/// Case-insensitive deny-list of common weak passwords.
const COMMON_PASSWORDS: [&str; 5] = ["password", "12345678", "qwerty", "admin", "root"];

const MIN_PASSWORD_CHARS: usize = 8;
const MAX_PASSWORD_CHARS: usize = 100;

/// Accumulated result of a multi-check validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl FieldValidation {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate a candidate password. Every applicable violation is reported,
/// not just the first.
#[must_use]
pub fn validate_password(password: &str) -> FieldValidation {
    if password.is_empty() {
        return FieldValidation::from_errors(vec!["Password is required".to_string()]);
    }

    let mut errors = Vec::new();
    let chars = password.chars().count();
    if chars < MIN_PASSWORD_CHARS {
        errors.push("Password must be at least 8 characters long".to_string());
    }
    if chars > MAX_PASSWORD_CHARS {
        errors.push("Password must be less than 100 characters".to_string());
    }
    if COMMON_PASSWORDS.contains(&password.to_lowercase().as_str()) {
        errors.push("Password is too common".to_string());
    }

    FieldValidation::from_errors(errors)
}

/// Validate a GitHub repository URL (`https://github.com/<owner>/<repo>`).
///
/// # Errors
/// Returns a single message describing why the URL was rejected.
pub fn validate_github_repo(repo: &str) -> Result<(), String> {
    if repo.is_empty() {
        return Err("Repository URL is required".to_string());
    }

    static GITHUB_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = GITHUB_REGEX.get_or_init(|| {
        Regex::new(r"^https://github\.com/[^/]+/[^/]+/?$")
            .expect("Failed to compile GitHub repository regex")
    });

    if !regex.is_match(repo) {
        return Err("Invalid GitHub repository URL format".to_string());
    }

    Ok(())
}

/// Validate a list of content folder names. An empty list is itself invalid;
/// entries must be non-empty and free of path traversal and separators.
#[must_use]
pub fn validate_folders(folders: &[String]) -> FieldValidation {
    if folders.is_empty() {
        return FieldValidation::from_errors(vec!["At least one folder is required".to_string()]);
    }

    let mut errors = Vec::new();
    for folder in folders {
        if folder.is_empty() {
            errors.push("Invalid folder name".to_string());
            continue;
        }
        if folder.contains("..") || folder.contains('/') || folder.contains('\\') {
            errors.push(format!("Invalid folder name: {folder}"));
        }
    }

    FieldValidation::from_errors(errors)
}

/// Trim, truncate to `max_length` characters, and strip the minimal
/// XSS-relevant character set for display fields.
#[must_use]
pub fn sanitize_string(input: &str, max_length: usize) -> String {
    input
        .trim()
        .chars()
        .take(max_length)
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | '&'))
        .collect()
}
