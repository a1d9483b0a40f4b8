//! SoftSell site server
//!
//! Entry point: loads configuration, sets up logging and serves the site.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use softsell_site::config::{AppConfig, load_llm_settings};
use softsell_site::server::start_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before anything reads the environment
    let _ = dotenv();

    init_tracing();

    let config = AppConfig::load().context("failed to load configuration")?;
    let settings = load_llm_settings(&config).map_err(anyhow::Error::msg)?;

    start_server(Arc::new(config), settings).await
}

/// Initialize tracing (M-LOG-STRUCTURED). `LOG_FORMAT=json` switches to
/// JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}
