//! EnergyGrid Core Library
//!
//! Sign-in logic shared by the EnergyGrid admin clients.
//! Provides: credential validation, the authentication API client, error
//! classification, form state, session storage and the post-login redirect.

pub mod auth;
pub mod classify;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod navigation;
pub mod network;
pub mod storage;
pub mod validation;

pub use auth::AuthContext;
pub use classify::{classify, ErrorKind};
pub use config::ApiConfig;
pub use error::*;
pub use form::{Attempt, Completion, Credentials, LoginForm, SubmitPath, DEMO_EMAIL, DEMO_PASSWORD};
pub use models::*;
pub use navigation::{RedirectGuard, Route};
pub use network::{ApiClient, AuthApi, AuthFailure};
pub use storage::{LocalStorage, MemoryStore, SessionStore};
pub use validation::{validate, Field, FieldErrors, ValidationRules};
