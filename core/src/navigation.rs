//! Routes and the post-sign-in redirect

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Admin,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Admin => "/admin",
        }
    }
}

/// Turns the authenticated signal into at most one redirect per
/// authentication event. Re-arms when the signal drops back to false.
#[derive(Debug, Default)]
pub struct RedirectGuard {
    issued: bool,
}

impl RedirectGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, is_authenticated: bool) -> Option<Route> {
        if !is_authenticated {
            self.issued = false;
            return None;
        }
        if self.issued {
            return None;
        }
        self.issued = true;
        tracing::info!("Redirecting to {}", Route::Admin.path());
        Some(Route::Admin)
    }
}
