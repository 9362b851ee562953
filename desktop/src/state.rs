//! Application state management

use crate::config::AppConfig;
use energygrid_core::{LoginForm, Route, User};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Admin,
}

impl From<Route> for Screen {
    fn from(route: Route) -> Self {
        match route {
            Route::Login => Screen::Login,
            Route::Admin => Screen::Admin,
        }
    }
}

pub struct AppState {
    // Paths
    pub data_dir: PathBuf,
    pub config: AppConfig,

    // Navigation
    pub current_screen: Screen,

    // Auth
    pub form: LoginForm,
    pub user: Option<User>,
    pub is_restoring: bool,
}

impl AppState {
    pub fn new(data_dir: PathBuf, config: AppConfig, form: LoginForm) -> Self {
        Self {
            data_dir,
            config,
            current_screen: Screen::Login,
            form,
            user: None,
            is_restoring: false,
        }
    }
}
