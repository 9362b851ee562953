//! Authentication context shared by the sign-in page and the admin area

use crate::models::{AuthSession, LoginOutcome, LoginRequest, User};
use crate::network::{AuthApi, AuthFailure};
use crate::storage::SessionStore;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Explicit authentication state: current user, the "is authenticated"
/// signal and the login/logout operations.
pub struct AuthContext {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn SessionStore>,
    session: RwLock<Option<AuthSession>>,
    /// Bumped by every login and logout; a restore started under an older
    /// generation must not overwrite the session.
    generation: AtomicU64,
    authenticated: watch::Sender<bool>,
}

impl AuthContext {
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn SessionStore>) -> Self {
        let (authenticated, _) = watch::channel(false);
        Self {
            api,
            store,
            session: RwLock::new(None),
            generation: AtomicU64::new(0),
            authenticated,
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.read().as_ref().map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    pub fn remembered_email(&self) -> Option<String> {
        match self.store.remembered_email() {
            Ok(email) => email,
            Err(e) => {
                tracing::warn!("Could not read remembered email: {}", e);
                None
            }
        }
    }

    /// Returns once the session has been handed to the store, so callers can
    /// navigate immediately on `Authenticated`.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AuthFailure> {
        let response = self.api.login(&request).await?;
        let data = response.data.unwrap_or_default();

        let (user, token) = match (response.success, data.user, data.token) {
            (true, Some(user), Some(token)) if !token.is_empty() => (user, token),
            _ => return Ok(LoginOutcome::Declined(response.message)),
        };

        let session = AuthSession {
            token,
            user: user.clone(),
            expires_at: data.expires_at,
        };

        self.persist(&session, &request)?;

        tracing::info!("Signed in as {}", user.email);
        {
            let mut current = self.session.write();
            self.generation.fetch_add(1, Ordering::SeqCst);
            *current = Some(session);
        }
        self.authenticated.send_replace(true);

        Ok(LoginOutcome::Authenticated(user))
    }

    fn persist(&self, session: &AuthSession, request: &LoginRequest) -> Result<(), AuthFailure> {
        if !request.remember_me {
            // Nothing to save, so a failed clear is not a failed sign-in
            if let Err(e) = self
                .store
                .clear_session()
                .and_then(|_| self.store.forget_email())
            {
                tracing::warn!("Could not clear remembered sign-in: {}", e);
            }
            return Ok(());
        }

        self.store
            .save_session(session)
            .and_then(|_| self.store.remember_email(&request.email))
            .map_err(|e| AuthFailure::Client(format!("Failed to save session: {}", e)))
    }

    /// Revalidates a stored session with the API.
    ///
    /// Yields `None` without touching state when a login or logout happened
    /// while the check was in flight.
    pub async fn restore(&self) -> Option<User> {
        let started = self.generation.load(Ordering::SeqCst);
        let stored = match self.store.load_session() {
            Ok(Some(session)) => session,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Could not load stored session: {}", e);
                return None;
            }
        };

        if stored.is_expired(chrono::Utc::now().timestamp()) {
            tracing::info!("Stored session expired");
            self.discard_stored_session();
            return None;
        }

        match self.api.current_user(&stored.token).await {
            Ok(user) => {
                {
                    let mut current = self.session.write();
                    if self.generation.load(Ordering::SeqCst) != started {
                        tracing::debug!("Discarding restore superseded by a newer sign-in");
                        return None;
                    }
                    *current = Some(AuthSession {
                        user: user.clone(),
                        ..stored
                    });
                }
                tracing::info!("Restored session for {}", user.email);
                self.authenticated.send_replace(true);
                Some(user)
            }
            Err(AuthFailure::Response { status, .. }) if status == 401 || status == 403 => {
                tracing::info!("Stored session rejected with status {}", status);
                // A sign-in meanwhile may already have stored a fresh session
                if self.generation.load(Ordering::SeqCst) == started {
                    self.discard_stored_session();
                }
                None
            }
            Err(e) => {
                tracing::warn!("Could not verify stored session: {}", e);
                None
            }
        }
    }

    pub async fn logout(&self) {
        let session = {
            let mut current = self.session.write();
            self.generation.fetch_add(1, Ordering::SeqCst);
            current.take()
        };

        if let Some(session) = session {
            if let Err(e) = self.api.logout(&session.token).await {
                tracing::warn!("Logout request failed: {}", e);
            }
        }

        self.discard_stored_session();
        self.authenticated.send_replace(false);
    }

    fn discard_stored_session(&self) {
        if let Err(e) = self.store.clear_session() {
            tracing::warn!("Could not clear stored session: {}", e);
        }
    }
}
