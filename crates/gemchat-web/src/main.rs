use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use gemchat_core::{ChatConfig, Secrets, Settings};
use gemchat_web::{serve, AppState};

#[derive(Parser)]
#[command(name = "gemchat")]
#[command(about = "gemchat - browser chat with Google Gemini")]
#[command(version)]
struct Cli {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Gemini model (overrides GEMINI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Settings file (defaults to the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Secrets file holding GEMINI_API_KEY / GEMINI_MODEL
    #[arg(long)]
    secrets: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut settings = match cli.config {
        Some(ref path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    if let Some(host) = cli.host {
        settings.server.host = host;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    let secrets_path = cli.secrets.unwrap_or_else(Secrets::default_path);
    let secrets = Secrets::load(&secrets_path)?;

    let state = match ChatConfig::resolve(&secrets) {
        Ok(mut config) => {
            if let Some(model) = cli.model {
                config.model = model;
            }
            // A model that fails under both naming conventions is fatal.
            let client = settings.build_client(&config)?.resolve_model().await?;
            let model = client.model().to_string();
            AppState::ready(
                settings.server.title.clone(),
                model,
                Arc::new(client),
                settings.chat.on_failure,
            )
        }
        Err(e) => {
            tracing::error!("{}", e);
            AppState::halted(settings.server.title.clone(), e.to_string())
        }
    };

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    serve(&addr, state).await
}
