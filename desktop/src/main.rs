//! EnergyGrid Admin Desktop Client
//!
//! Sign-in and administration console for EnergyGrid.
//! Built with iced GUI framework.

mod app;
mod config;
mod messages;
mod screens;
mod state;
mod theme;

use energygrid_core::{ApiClient, AuthContext, LocalStorage};
use iced::{Application, Settings, Size};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "energygrid_desktop=info,energygrid_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting EnergyGrid Admin v{}", env!("CARGO_PKG_VERSION"));

    // Get data directory
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("energygrid");

    std::fs::create_dir_all(&data_dir)?;

    tracing::info!("Data directory: {:?}", data_dir);

    // Load or create config
    let mut config = config::AppConfig::load(&data_dir).unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable config: {}", e);
        config::AppConfig::default()
    });
    config.api = config.api.with_env_override();

    tracing::info!("Authentication API: {}", config.api.base_url);

    let api = Arc::new(ApiClient::new(&config.api)?);
    let storage = Arc::new(LocalStorage::new(&data_dir)?);
    let auth = Arc::new(AuthContext::new(api, storage));

    let mut settings = Settings::with_flags(app::Flags {
        data_dir,
        config,
        auth,
    });
    settings.window = iced::window::Settings {
        size: Size::new(520.0, 760.0),
        min_size: Some(Size::new(420.0, 640.0)),
        position: iced::window::Position::Centered,
        ..Default::default()
    };
    settings.default_text_size = iced::Pixels(14.0);
    settings.antialiasing = true;

    // Run application
    app::EnergyGridAdmin::run(settings).map_err(|e| anyhow::anyhow!("UI error: {}", e))
}
