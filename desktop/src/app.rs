//! Main application module for EnergyGrid Admin

use crate::config::AppConfig;
use crate::messages::Message;
use crate::screens::{admin::AdminScreen, login::LoginScreen};
use crate::state::{AppState, Screen};

use energygrid_core::{Attempt, AuthContext, Completion, LoginForm, RedirectGuard, Route};
use iced::widget::container;
use iced::{executor, Application, Command, Element, Length, Subscription};
use std::path::PathBuf;
use std::sync::Arc;

pub struct Flags {
    pub data_dir: PathBuf,
    pub config: AppConfig,
    pub auth: Arc<AuthContext>,
}

pub struct EnergyGridAdmin {
    state: AppState,
    auth: Arc<AuthContext>,
    redirect: RedirectGuard,
}

impl Application for EnergyGridAdmin {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = iced::Theme;
    type Flags = Flags;

    fn new(flags: Self::Flags) -> (Self, Command<Self::Message>) {
        let mut form = LoginForm::new(flags.config.validation.clone());
        if let Some(email) = flags.auth.remembered_email() {
            form = form.with_email(email);
        }

        let mut state = AppState::new(flags.data_dir, flags.config, form);
        state.is_restoring = true;

        let auth = flags.auth.clone();
        let command = Command::perform(
            async move { auth.restore().await },
            Message::SessionRestored,
        );

        (
            Self {
                state,
                auth: flags.auth,
                redirect: RedirectGuard::new(),
            },
            command,
        )
    }

    fn title(&self) -> String {
        match self.state.current_screen {
            Screen::Login => "EnergyGrid - Sign In".to_string(),
            Screen::Admin => "EnergyGrid Admin".to_string(),
        }
    }

    fn update(&mut self, message: Self::Message) -> Command<Self::Message> {
        match message {
            // ============= Navigation =============
            Message::NavigateTo(route) => {
                let screen = Screen::from(route);
                if self.state.current_screen == Screen::Login && screen != Screen::Login {
                    // Leaving the sign-in page: late results must not touch it
                    self.state.form.reset();
                }
                self.state.current_screen = screen;
                Command::none()
            }

            // ============= Login form =============
            Message::EmailChanged(email) => {
                self.state.form.set_email(email);
                Command::none()
            }

            Message::PasswordChanged(password) => {
                self.state.form.set_password(password);
                Command::none()
            }

            Message::RememberMeToggled(remember_me) => {
                self.state.form.set_remember_me(remember_me);
                Command::none()
            }

            Message::Submit => match self.state.form.submit() {
                Some(attempt) => self.perform_login(attempt),
                None => Command::none(),
            },

            Message::DemoLogin => match self.state.form.demo() {
                Some(attempt) => self.perform_login(attempt),
                None => Command::none(),
            },

            Message::LoginFinished {
                attempt,
                path,
                result,
            } => match self.state.form.complete(attempt, path, result) {
                Completion::Authenticated(user) => {
                    self.state.user = Some(user);
                    self.redirect_if_authenticated()
                }
                Completion::Failed | Completion::Ignored => Command::none(),
            },

            // ============= Session =============
            Message::SessionRestored(user) => {
                self.state.is_restoring = false;
                // Only adopt the account the context actually holds
                if user.is_some() && user == self.auth.current_user() {
                    self.state.user = user;
                }
                self.redirect_if_authenticated()
            }

            Message::AuthStateChanged(authenticated) => {
                tracing::debug!("Authenticated signal: {}", authenticated);
                if authenticated {
                    if let Some(user) = self.auth.current_user() {
                        self.state.user = Some(user);
                    }
                }
                self.redirect_if_authenticated()
            }

            Message::Logout => {
                let auth = self.auth.clone();
                Command::perform(async move { auth.logout().await }, |_| Message::LoggedOut)
            }

            Message::LoggedOut => {
                tracing::info!("Signed out");
                self.state.user = None;
                self.state.form.reset();
                self.redirect.observe(false);
                self.update(Message::NavigateTo(Route::Login))
            }

            // ============= Settings =============
            Message::ThemeToggled(dark) => {
                self.state.config.ui.theme = if dark { "dark" } else { "light" }.to_string();
                if let Err(e) = self.state.config.save(&self.state.data_dir) {
                    tracing::warn!("Could not save config: {}", e);
                }
                Command::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Self::Message> {
        let content = match self.state.current_screen {
            Screen::Login => LoginScreen::view(&self.state),
            Screen::Admin => AdminScreen::view(&self.state),
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Self::Message> {
        iced::subscription::unfold(
            "auth-state",
            self.auth.subscribe(),
            |mut rx| async move {
                if rx.changed().await.is_err() {
                    // Context dropped, nothing more will arrive
                    futures::future::pending::<()>().await;
                }
                let authenticated = *rx.borrow_and_update();
                (Message::AuthStateChanged(authenticated), rx)
            },
        )
    }

    fn theme(&self) -> iced::Theme {
        if self.state.config.is_dark() {
            iced::Theme::Dark
        } else {
            iced::Theme::Light
        }
    }
}

impl EnergyGridAdmin {
    fn perform_login(&self, attempt: Attempt) -> Command<Message> {
        let auth = self.auth.clone();
        let Attempt { id, path, request } = attempt;

        Command::perform(
            async move { auth.login(request).await },
            move |result| Message::LoginFinished {
                attempt: id,
                path,
                result,
            },
        )
    }

    fn redirect_if_authenticated(&mut self) -> Command<Message> {
        match self.redirect.observe(self.auth.is_authenticated()) {
            Some(route) => self.update(Message::NavigateTo(route)),
            None => Command::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use energygrid_core::{
        AuthApi, AuthFailure, ErrorBody, Field, LoginData, LoginRequest, LoginResponse,
        MemoryStore, SubmitPath, User, DEMO_EMAIL,
    };
    use std::sync::Mutex;

    struct StubApi {
        requests: Mutex<Vec<LoginRequest>>,
    }

    #[async_trait]
    impl AuthApi for StubApi {
        async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthFailure> {
            self.requests.lock().unwrap().push(request.clone());
            if request.email != DEMO_EMAIL {
                return Err(AuthFailure::Response {
                    status: 401,
                    body: ErrorBody::default(),
                });
            }
            Ok(LoginResponse {
                success: true,
                data: Some(LoginData {
                    user: Some(User {
                        id: "demo".to_string(),
                        email: request.email.clone(),
                        name: Some("Demo Operator".to_string()),
                        role: Some("viewer".to_string()),
                    }),
                    token: Some("demo-token".to_string()),
                    expires_at: None,
                }),
                message: None,
            })
        }

        async fn current_user(&self, _token: &str) -> Result<User, AuthFailure> {
            Err(AuthFailure::Network("offline".to_string()))
        }

        async fn logout(&self, _token: &str) -> Result<(), AuthFailure> {
            Ok(())
        }
    }

    fn app() -> (EnergyGridAdmin, Arc<StubApi>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(StubApi {
            requests: Mutex::new(Vec::new()),
        });
        let auth = Arc::new(AuthContext::new(api.clone(), Arc::new(MemoryStore::new())));
        let (app, _) = EnergyGridAdmin::new(Flags {
            data_dir: dir.path().to_path_buf(),
            config: AppConfig::default(),
            auth,
        });
        (app, api, dir)
    }

    #[test]
    fn test_invalid_form_never_reaches_api() {
        let (mut app, api, _dir) = app();
        app.update(Message::EmailChanged("not-an-email".to_string()));
        app.update(Message::PasswordChanged("secret123".to_string()));
        app.update(Message::Submit);

        assert!(app.state.form.error(Field::Email).is_some());
        assert!(!app.state.form.is_loading());
        assert!(api.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_demo_login_navigates_once() {
        let (mut app, _api, _dir) = app();
        app.update(Message::SessionRestored(None));
        assert_eq!(app.state.current_screen, Screen::Login);

        app.update(Message::EmailChanged("typed@elsewhere.org".to_string()));
        app.update(Message::DemoLogin);
        assert!(app.state.form.is_loading_for(SubmitPath::Demo));
        assert_eq!(app.state.form.credentials().email, DEMO_EMAIL);

        // Run the request the command would have run
        let request = app.state.form.credentials().to_request();
        let result = app.auth.login(request).await;
        app.update(Message::LoginFinished {
            attempt: 1,
            path: SubmitPath::Demo,
            result,
        });

        assert_eq!(app.state.current_screen, Screen::Admin);
        assert_eq!(app.state.user.as_ref().unwrap().email, DEMO_EMAIL);
        assert!(!app.state.form.is_loading());

        // The auth signal arrives afterwards and must not navigate again
        app.update(Message::NavigateTo(Route::Login));
        app.update(Message::AuthStateChanged(true));
        assert_eq!(app.state.current_screen, Screen::Login);
    }

    async fn run_demo(app: &mut EnergyGridAdmin) {
        let attempt = app.state.form.demo().unwrap();
        let result = app.auth.login(attempt.request.clone()).await;
        app.update(Message::LoginFinished {
            attempt: attempt.id,
            path: attempt.path,
            result,
        });
    }

    #[tokio::test]
    async fn test_logout_rearms_redirect() {
        let (mut app, _api, _dir) = app();
        run_demo(&mut app).await;
        assert_eq!(app.state.current_screen, Screen::Admin);

        app.auth.logout().await;
        app.update(Message::LoggedOut);
        assert_eq!(app.state.current_screen, Screen::Login);
        assert!(app.state.user.is_none());

        run_demo(&mut app).await;
        assert_eq!(app.state.current_screen, Screen::Admin);
    }

    #[tokio::test]
    async fn test_restore_after_sign_in_keeps_signed_in_user() {
        let (mut app, _api, _dir) = app();
        run_demo(&mut app).await;
        assert_eq!(app.state.current_screen, Screen::Admin);

        app.update(Message::SessionRestored(Some(User {
            id: "1".to_string(),
            email: "old@energygrid.com".to_string(),
            name: None,
            role: None,
        })));

        assert!(!app.state.is_restoring);
        assert_eq!(app.state.user.as_ref().unwrap().email, DEMO_EMAIL);
        assert_eq!(app.state.current_screen, Screen::Admin);
    }

    #[tokio::test]
    async fn test_wrong_password_stays_on_login() {
        let (mut app, api, _dir) = app();
        app.update(Message::EmailChanged("ops@energygrid.com".to_string()));
        app.update(Message::PasswordChanged("secret123".to_string()));

        let attempt = app.state.form.submit().unwrap();
        let result = app.auth.login(attempt.request.clone()).await;
        app.update(Message::LoginFinished {
            attempt: attempt.id,
            path: attempt.path,
            result,
        });

        assert_eq!(app.state.current_screen, Screen::Login);
        assert_eq!(
            app.state.form.error(Field::General),
            Some("Invalid email or password")
        );
        assert_eq!(api.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_result_after_leaving_page_is_ignored() {
        let (mut app, _api, _dir) = app();
        app.update(Message::EmailChanged("ops@energygrid.com".to_string()));
        app.update(Message::PasswordChanged("secret123".to_string()));
        let attempt = app.state.form.submit().unwrap();

        app.update(Message::NavigateTo(Route::Admin));
        app.update(Message::LoginFinished {
            attempt: attempt.id,
            path: attempt.path,
            result: Err(AuthFailure::Network("late".to_string())),
        });

        assert!(app.state.form.errors().is_empty());
        assert!(!app.state.form.is_loading());
    }

    #[test]
    fn test_theme_toggle_is_saved() {
        let (mut app, _api, dir) = app();
        app.update(Message::ThemeToggled(false));
        assert!(matches!(app.theme(), iced::Theme::Light));
        assert_eq!(AppConfig::load(dir.path()).unwrap().ui.theme, "light");
    }
}
