//! Notification listener
//!
//! Connects to the backend's push endpoint and renders every notification
//! as a log event until Ctrl+C.
//!
//! Usage:
//!   cargo run --bin notification_listener [config/notifier.yaml]
//!
//! Optional environment variables:
//!   NOTIFIER_CONFIG_PATH - Config file used when no argument is given
//!   NOTIFIER_BASE_URL    - Overrides `server.base_url`
//!   NOTIFIER_LOG_LEVEL   - Overrides `log_level` (RUST_LOG wins over both)

use anyhow::{Context, Result};
use shelf_notifier::app::NotifierApp;
use shelf_notifier::bin_common::{parse_args, resolve_config_path, BinaryRunner};
use shelf_notifier::config::NotifierConfig;
use shelf_notifier::logging::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv::dotenv().ok();

    let config_path = resolve_config_path(&parse_args());
    let config = NotifierConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    init_tracing(&config.log_level);

    if config_path.exists() {
        info!("Loaded config from {}", config_path.display());
    } else {
        warn!(
            "Config file {} not found, using defaults",
            config_path.display()
        );
    }
    config.log();

    let mut app = NotifierApp::from_config(&config)?;
    app.execute().await
}
