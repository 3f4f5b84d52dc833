/*
newspost - main.rs
This binary loads configuration, resolves the API keys and starts the Rocket HTTP server.
*/

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use common::{Config, Secrets};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use newspost::generator::Generator;
use newspost::server::{launch_rocket, AppState};

#[derive(Parser, Debug)]
#[command(name = "newspost", about = "Generate ready-to-post articles from recent news")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI args
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // A missing .env is fine; the variables may come from the real environment
    if let Ok(path) = dotenv::dotenv() {
        info!(path = %path.display(), "loaded .env file");
    }

    let config = load_config(args.config).await?;

    // Fail fast before binding anything if a key is missing
    let secrets = match Secrets::from_env(&config) {
        Ok(s) => s,
        Err(e) => {
            error!(%e, "missing API keys");
            return Err(e);
        }
    };

    let generator = Generator::from_config(&config, &secrets)?;
    info!(
        model = %config.llm.model,
        locale = ?config.content.locale,
        news_api = %config.news.api_url,
        "content generator initialized"
    );

    let state = AppState {
        generator: Arc::new(generator),
    };

    if let Err(e) = launch_rocket(state, &config.server).await {
        error!(%e, "Rocket server failed");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}

/// Resolve config paths: `config.default.toml`, then `--config FILE` or `./config.toml`,
/// then environment overrides.
async fn load_config(explicit: Option<PathBuf>) -> anyhow::Result<Config> {
    let default_path = Path::new("config.default.toml");

    let config = match Config::resolve(default_path, explicit.as_deref(), |name| {
        std::env::var(name).ok()
    })
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };

    info!(default = ?default_path, explicit = ?explicit, port = config.server.port, "configuration loaded");
    Ok(config)
}
