//! Sign-in form state and submission handling
//!
//! The form never performs I/O itself. `submit` and `demo` hand out an
//! [`Attempt`] describing the request to send; the caller runs it against
//! [`AuthContext::login`](crate::auth::AuthContext::login) and feeds the result
//! back through [`LoginForm::complete`].

use crate::classify::{classify, ErrorKind, LOGIN_FAILED};
use crate::models::{LoginOutcome, LoginRequest, User};
use crate::network::AuthFailure;
use crate::validation::{validate, Field, FieldErrors, ValidationRules};

pub const DEMO_EMAIL: &str = "demo@energygrid.com";
pub const DEMO_PASSWORD: &str = "demo123";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl Credentials {
    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            remember_me: self.remember_me,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPath {
    Manual,
    Demo,
}

/// One dispatched login. `id` ties the eventual result back to this form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub id: u64,
    pub path: SubmitPath,
    pub request: LoginRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Authenticated(User),
    Failed,
    /// The result belonged to an attempt this form no longer tracks.
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    credentials: Credentials,
    errors: FieldErrors,
    manual_loading: bool,
    demo_loading: bool,
    attempt: u64,
    rules: ValidationRules,
}

impl LoginForm {
    pub fn new(rules: ValidationRules) -> Self {
        Self {
            rules,
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.credentials.email = email.into();
        self.credentials.remember_me = true;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn is_loading(&self) -> bool {
        self.manual_loading || self.demo_loading
    }

    pub fn is_loading_for(&self, path: SubmitPath) -> bool {
        match path {
            SubmitPath::Manual => self.manual_loading,
            SubmitPath::Demo => self.demo_loading,
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Editing a field drops that field's error.
    pub fn set_email(&mut self, email: String) {
        self.credentials.email = email;
        self.errors.remove(Field::Email);
    }

    pub fn set_password(&mut self, password: String) {
        self.credentials.password = password;
        self.errors.remove(Field::Password);
    }

    pub fn set_remember_me(&mut self, remember_me: bool) {
        self.credentials.remember_me = remember_me;
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Manual submit. `None` when busy or when validation failed; in the
    /// latter case the validation errors are now on the form.
    pub fn submit(&mut self) -> Option<Attempt> {
        if self.is_loading() {
            tracing::debug!("Submit ignored, login already in flight");
            return None;
        }

        let errors = validate(&self.credentials, &self.rules);
        if !errors.is_empty() {
            tracing::debug!(fields = errors.len(), "Sign-in form failed validation");
            self.errors = errors;
            return None;
        }

        Some(self.dispatch(SubmitPath::Manual))
    }

    /// Demo shortcut: fixed credentials, same dispatch and completion.
    pub fn demo(&mut self) -> Option<Attempt> {
        if self.is_loading() {
            tracing::debug!("Demo login ignored, login already in flight");
            return None;
        }

        self.credentials.email = DEMO_EMAIL.to_string();
        self.credentials.password = DEMO_PASSWORD.to_string();

        Some(self.dispatch(SubmitPath::Demo))
    }

    fn dispatch(&mut self, path: SubmitPath) -> Attempt {
        self.errors.clear();
        match path {
            SubmitPath::Manual => self.manual_loading = true,
            SubmitPath::Demo => self.demo_loading = true,
        }
        self.attempt += 1;

        tracing::info!(attempt = self.attempt, ?path, "Dispatching sign-in");

        Attempt {
            id: self.attempt,
            path,
            request: self.credentials.to_request(),
        }
    }

    /// Applies the result of `attempt`. The loading flag of its path is
    /// cleared on every branch.
    pub fn complete(
        &mut self,
        attempt_id: u64,
        path: SubmitPath,
        result: Result<LoginOutcome, AuthFailure>,
    ) -> Completion {
        if attempt_id != self.attempt || !self.is_loading_for(path) {
            tracing::debug!(attempt_id, "Discarding result of stale sign-in attempt");
            return Completion::Ignored;
        }

        match path {
            SubmitPath::Manual => self.manual_loading = false,
            SubmitPath::Demo => self.demo_loading = false,
        }

        match result {
            Ok(LoginOutcome::Authenticated(user)) => {
                self.credentials.password.clear();
                Completion::Authenticated(user)
            }
            Ok(LoginOutcome::Declined(message)) => {
                let message = message
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| LOGIN_FAILED.to_string());
                tracing::warn!("Sign-in declined: {}", message);
                self.errors = FieldErrors::general(message);
                Completion::Failed
            }
            Err(failure) => {
                tracing::warn!(kind = ?ErrorKind::of(&failure), "Sign-in failed: {}", failure);
                self.errors = classify(&failure);
                Completion::Failed
            }
        }
    }

    /// Forgets in-flight attempts, e.g. when the page is left.
    pub fn reset(&mut self) {
        self.manual_loading = false;
        self.demo_loading = false;
        self.attempt += 1;
        self.credentials.password.clear();
        self.errors.clear();
    }
}
