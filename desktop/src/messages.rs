//! Application messages (events)

use energygrid_core::{AuthFailure, LoginOutcome, Route, SubmitPath, User};

#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    NavigateTo(Route),

    // Login form
    EmailChanged(String),
    PasswordChanged(String),
    RememberMeToggled(bool),
    Submit,
    DemoLogin,
    LoginFinished {
        attempt: u64,
        path: SubmitPath,
        result: Result<LoginOutcome, AuthFailure>,
    },

    // Session
    SessionRestored(Option<User>),
    AuthStateChanged(bool),
    Logout,
    LoggedOut,

    // Settings
    ThemeToggled(bool),
}
