//! Client-side credential validation
//!
//! Mirrors the rules the authentication API enforces so that obviously bad
//! input never leaves the client.

use crate::form::Credentials;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

// local@domain.tld, no whitespace, at least one dot after the '@'.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_REGEX: invalid regex pattern")
});

// ============================================================================
// Fields
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Password,
    General,
}

impl Field {
    /// Maps a server-reported field name. Unknown names yield `None`.
    pub fn from_server_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "email" => Some(Field::Email),
            "password" => Some(Field::Password),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::General => "general",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to user-facing message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn general(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(Field::General, message);
        errors
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Appends to an existing message instead of replacing it.
    pub fn append(&mut self, field: Field, message: &str) {
        self.0
            .entry(field)
            .and_modify(|existing| {
                existing.push_str("; ");
                existing.push_str(message);
            })
            .or_insert_with(|| message.to_string());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

// ============================================================================
// Rules
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    pub email_max_len: usize,
    pub password_min_len: usize,
    pub password_max_len: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            email_max_len: 255,
            // The demo account's password is 7 characters and the API accepts it.
            password_min_len: 6,
            password_max_len: 128,
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Returns an empty mapping when the credentials pass every rule.
pub fn validate(credentials: &Credentials, rules: &ValidationRules) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let email = credentials.email.trim();
    if email.is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !is_valid_email(email) {
        errors.insert(Field::Email, "Please enter a valid email address");
    } else if email.chars().count() > rules.email_max_len {
        errors.insert(
            Field::Email,
            format!("Email must be at most {} characters", rules.email_max_len),
        );
    }

    let password_len = credentials.password.chars().count();
    if credentials.password.is_empty() {
        errors.insert(Field::Password, "Password is required");
    } else if password_len < rules.password_min_len {
        errors.insert(
            Field::Password,
            format!(
                "Password must be at least {} characters",
                rules.password_min_len
            ),
        );
    } else if password_len > rules.password_max_len {
        errors.insert(
            Field::Password,
            format!(
                "Password must be at most {} characters",
                rules.password_max_len
            ),
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
            remember_me: false,
        }
    }

    #[test]
    fn test_empty_email_is_required() {
        let rules = ValidationRules::default();
        for email in ["", "   ", "\t\n"] {
            let errors = validate(&creds(email, "secret123"), &rules);
            assert_eq!(errors.get(Field::Email), Some("Email is required"));
            assert!(!errors.contains(Field::Password));
        }
    }

    #[test]
    fn test_malformed_email() {
        let rules = ValidationRules::default();
        for email in ["plain", "no-at.example.com", "a@b", "a b@c.com", "@x.io"] {
            let errors = validate(&creds(email, "secret123"), &rules);
            assert_eq!(
                errors.get(Field::Email),
                Some("Please enter a valid email address"),
                "{email}"
            );
        }
    }

    #[test]
    fn test_email_is_trimmed_before_matching() {
        let errors = validate(
            &creds("  ops@energygrid.com  ", "secret123"),
            &ValidationRules::default(),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_email_too_long() {
        let rules = ValidationRules {
            email_max_len: 10,
            ..Default::default()
        };
        let errors = validate(&creds("someone@energygrid.com", "secret123"), &rules);
        assert!(errors.get(Field::Email).unwrap().contains("at most 10"));
    }

    #[test]
    fn test_short_passwords_rejected() {
        let rules = ValidationRules::default();
        for password in ["a", "abc", "abcde"] {
            let errors = validate(&creds("ops@energygrid.com", password), &rules);
            assert_eq!(
                errors.get(Field::Password),
                Some("Password must be at least 6 characters")
            );
        }
    }

    #[test]
    fn test_min_length_follows_rules() {
        let rules = ValidationRules {
            password_min_len: 8,
            ..Default::default()
        };
        let errors = validate(&creds("ops@energygrid.com", "demo123"), &rules);
        assert_eq!(
            errors.get(Field::Password),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn test_password_required_and_max_len() {
        let rules = ValidationRules::default();
        let errors = validate(&creds("ops@energygrid.com", ""), &rules);
        assert_eq!(errors.get(Field::Password), Some("Password is required"));

        let long = "x".repeat(129);
        let errors = validate(&creds("ops@energygrid.com", &long), &rules);
        assert!(errors.get(Field::Password).unwrap().contains("at most 128"));
    }

    #[test]
    fn test_well_formed_input_is_valid() {
        let errors = validate(
            &creds("ops@energygrid.com", "correct horse"),
            &ValidationRules::default(),
        );
        assert!(errors.is_empty());
        assert_eq!(errors.len(), 0);
    }

    #[test]
    fn test_field_errors_append() {
        let mut errors = FieldErrors::new();
        errors.append(Field::General, "first");
        errors.append(Field::General, "second");
        assert_eq!(errors.get(Field::General), Some("first; second"));
    }

    #[test]
    fn test_server_field_names() {
        assert_eq!(Field::from_server_name("Email"), Some(Field::Email));
        assert_eq!(Field::from_server_name("password"), Some(Field::Password));
        assert_eq!(Field::from_server_name("username"), None);
        assert_eq!(Field::from_server_name("general"), None);
    }
}
