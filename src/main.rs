mod config;
mod error;
mod game;
mod ui;

use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use game::assets::AssetCatalog;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::log_filter(config::debug_mode_enabled())));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    init_tracing();
    let config = GameConfig::from_env();

    // Startup errors end the process before any window exists.
    let catalog = match AssetCatalog::load(&config.asset_dir) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!(%err, "cannot start");
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    ui::app::run(config, catalog)
}
