//! vidshare API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p vidshare-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` if present).

use tracing::{error, info};
use vidshare_common::{try_init_tracing_with_config, AppConfig, TracingConfig};

#[tokio::main]
async fn main() {
    // Load configuration before tracing so the log format follows APP_ENV
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let tracing_config = if config.app.env.is_production() {
        TracingConfig::production()
    } else {
        TracingConfig::development()
    };
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.api.port,
        "Configuration loaded"
    );

    if let Err(e) = vidshare_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
