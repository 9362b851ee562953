//! Maps authentication failures to user-facing field errors

use crate::network::AuthFailure;
use crate::validation::{Field, FieldErrors};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ACCOUNT_INACTIVE: &str = "Account suspended or inactive";
pub const TOO_MANY_ATTEMPTS: &str = "Too many login attempts. Please try again later.";
pub const SERVER_ERROR: &str = "Server error. Please try again later.";
pub const NETWORK_ERROR: &str =
    "Unable to connect to the server. Please check your internet connection.";
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    RateLimit,
    Server,
    Network,
    Unknown,
}

impl ErrorKind {
    pub fn of(failure: &AuthFailure) -> Self {
        match failure {
            AuthFailure::Response { status, .. } => match *status {
                401 => ErrorKind::Authentication,
                403 => ErrorKind::Authorization,
                400 | 422 => ErrorKind::Validation,
                429 => ErrorKind::RateLimit,
                s if s >= 500 => ErrorKind::Server,
                _ => ErrorKind::Unknown,
            },
            AuthFailure::Network(_) => ErrorKind::Network,
            AuthFailure::Client(_) => ErrorKind::Unknown,
        }
    }
}

/// Never returns an empty mapping.
pub fn classify(failure: &AuthFailure) -> FieldErrors {
    match failure {
        AuthFailure::Response { status, body } => {
            let server_message = body
                .message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty());

            match *status {
                401 => FieldErrors::general(INVALID_CREDENTIALS),
                403 => FieldErrors::general(ACCOUNT_INACTIVE),
                429 => FieldErrors::general(TOO_MANY_ATTEMPTS),
                400 | 422 => {
                    let issues = body.errors.as_deref().unwrap_or_default();
                    let mut errors = FieldErrors::new();
                    for issue in issues.iter().filter(|i| !i.message.trim().is_empty()) {
                        let field = Field::from_server_name(&issue.field).unwrap_or(Field::General);
                        errors.append(field, issue.message.trim());
                    }
                    if errors.is_empty() {
                        FieldErrors::general(server_message.unwrap_or(LOGIN_FAILED))
                    } else {
                        errors
                    }
                }
                s if s >= 500 => FieldErrors::general(SERVER_ERROR),
                _ => FieldErrors::general(server_message.unwrap_or(LOGIN_FAILED)),
            }
        }
        AuthFailure::Network(_) => FieldErrors::general(NETWORK_ERROR),
        AuthFailure::Client(message) => {
            let message = message.trim();
            if message.is_empty() {
                FieldErrors::general(UNEXPECTED_ERROR)
            } else {
                FieldErrors::general(message)
            }
        }
    }
}
